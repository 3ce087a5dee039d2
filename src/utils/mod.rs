//! Utility modules

pub mod file_storage;
pub mod memory_storage;
pub mod money;
pub mod validation;

pub use file_storage::*;
pub use memory_storage::*;
pub use money::*;
pub use validation::*;
