//! JSON-file backed sequence store

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::traits::*;
use crate::types::*;

/// Sequence counters persisted as a JSON object `{location: last_value}`
///
/// Each increment reads, bumps and rewrites the file while holding one
/// async mutex, and the file is replaced through a temporary sibling plus
/// rename so a crash never leaves a half-written counter file. The file
/// I/O runs on tokio's blocking pool, so callers must be inside a tokio
/// runtime. Clones share the mutex; separate processes must not share the
/// file.
#[derive(Debug, Clone)]
pub struct FileSequenceStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileSequenceStore {
    /// Use the counter file at `path`; it is created on first increment
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn with_counters<T, F>(&self, operation: F) -> InvoiceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> InvoiceResult<T> + Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || operation(&path))
            .await
            .map_err(|e| InvoiceError::Storage(format!("Sequence file task failed: {}", e)))?
    }
}

fn read_counters(path: &Path) -> InvoiceResult<HashMap<String, u64>> {
    match fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
        Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
            InvoiceError::Storage(format!("Corrupt sequence file {}: {}", path.display(), e))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(InvoiceError::Storage(format!(
            "Cannot read sequence file {}: {}",
            path.display(),
            e
        ))),
    }
}

fn write_counters(path: &Path, counters: &HashMap<String, u64>) -> InvoiceResult<()> {
    let json = serde_json::to_string_pretty(counters)
        .map_err(|e| InvoiceError::Storage(e.to_string()))?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)
        .map_err(|e| InvoiceError::Storage(format!("Cannot write {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path)
        .map_err(|e| InvoiceError::Storage(format!("Cannot replace {}: {}", path.display(), e)))
}

#[async_trait]
impl SequenceStore for FileSequenceStore {
    async fn next_sequence(&self, location_key: &str) -> InvoiceResult<u64> {
        let key = location_key.to_string();
        let next = self
            .with_counters(move |path| {
                let mut counters = read_counters(path)?;
                let next = counters.get(&key).copied().unwrap_or(0) + 1;
                counters.insert(key, next);
                write_counters(path, &counters)?;
                Ok(next)
            })
            .await?;

        debug!(location = location_key, sequence = next, "Issued invoice sequence");
        Ok(next)
    }

    async fn current_sequence(&self, location_key: &str) -> InvoiceResult<u64> {
        let key = location_key.to_string();
        self.with_counters(move |path| Ok(read_counters(path)?.get(&key).copied().unwrap_or(0)))
            .await
    }
}
