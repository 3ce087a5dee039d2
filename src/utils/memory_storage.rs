//! In-memory sequence store for testing and single-process use

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::*;
use crate::types::*;

/// In-memory sequence counters; clones share the same counters
#[derive(Debug, Clone, Default)]
pub struct MemorySequenceStore {
    counters: Arc<Mutex<HashMap<String, u64>>>,
}

impl MemorySequenceStore {
    /// Create a new memory store instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a location's counter at a given value
    pub fn seed(&self, location_key: &str, value: u64) -> InvoiceResult<()> {
        let mut counters = self.lock()?;
        let current = counters.entry(location_key.to_string()).or_insert(0);
        if value < *current {
            return Err(InvoiceError::Storage(format!(
                "Cannot move sequence for '{}' back from {} to {}",
                location_key, current, value
            )));
        }
        *current = value;
        Ok(())
    }

    fn lock(&self) -> InvoiceResult<std::sync::MutexGuard<'_, HashMap<String, u64>>> {
        self.counters
            .lock()
            .map_err(|_| InvoiceError::Storage("sequence counter lock poisoned".to_string()))
    }
}

#[async_trait]
impl SequenceStore for MemorySequenceStore {
    async fn next_sequence(&self, location_key: &str) -> InvoiceResult<u64> {
        let mut counters = self.lock()?;
        let counter = counters.entry(location_key.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn current_sequence(&self, location_key: &str) -> InvoiceResult<u64> {
        Ok(self.lock()?.get(location_key).copied().unwrap_or(0))
    }
}
