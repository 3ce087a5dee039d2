//! Renderers consuming finished invoice records

pub mod text;

pub use text::*;
