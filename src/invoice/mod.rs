//! Invoice pipeline: intake, allocation, reconciliation, assembly and words

pub mod allocator;
pub mod assembler;
pub mod numbering;
pub mod order;
pub mod reconcile;
pub mod request;
pub mod service;
pub mod words;

pub use allocator::*;
pub use assembler::*;
pub use order::*;
pub use reconcile::*;
pub use request::*;
pub use service::*;
pub use words::*;
