//! # Memory Storage
//!
//! Documents kept in a `HashMap`. Used by tests, and by the CLI's `memory`
//! backend for dry runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::DocumentStorage;
use crate::error::{StoreError, StoreResult};

/// In-process document storage.
///
/// Can be told to fail writes, to exercise persistence-failure handling.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage that already holds `document` under `key`.
    pub fn with_document(key: impl Into<String>, document: impl Into<String>) -> Self {
        let documents: HashMap<String, String> = HashMap::from([(key.into(), document.into())]);
        MemoryStorage {
            documents: Mutex::new(documents),
            ..Self::default()
        }
    }

    /// Makes every following write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStorage for MemoryStorage {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.documents.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, document: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other(
                "simulated write failure",
            )));
        }

        self.documents
            .lock()
            .await
            .insert(key.to_string(), document.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
