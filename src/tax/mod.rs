//! GST classification and inclusive tax calculation

pub mod classifier;
pub mod gst;

pub use classifier::*;
pub use gst::*;
