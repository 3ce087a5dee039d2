//! Traits for storage abstraction and rendering

use async_trait::async_trait;

use crate::types::*;

/// Storage abstraction for the per-location invoice sequence counter
///
/// Implementations must make `next_sequence` atomic: two concurrent calls
/// for the same location never observe the same value. Counters only ever
/// move forward.
#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Increment the counter for a location and return the new value
    ///
    /// The first call for an unseen location returns 1.
    async fn next_sequence(&self, location_key: &str) -> InvoiceResult<u64>;

    /// Read the last issued value without incrementing (0 if none)
    async fn current_sequence(&self, location_key: &str) -> InvoiceResult<u64>;
}

/// A document renderer consuming finished invoice records
///
/// Renderers only place already computed values; they never recompute
/// tax, discounts or words.
pub trait InvoiceRenderer: Send + Sync {
    type Output;

    /// Render a record into the renderer's output format
    fn render(&self, record: &InvoiceRecord) -> InvoiceResult<Self::Output>;
}
