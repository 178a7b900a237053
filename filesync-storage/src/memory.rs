//! In-memory key-value backend with fault injection.

use crate::backend::{KvBackend, StorageEstimate};
use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Volatile backend. Writes and estimates can be made to fail on demand so
/// callers can exercise their failure paths.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
    fail_estimate: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `estimate` fail (or succeed again).
    pub fn fail_estimate(&self, fail: bool) {
        self.fail_estimate.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed(format!("injected failure writing {key}")));
        }
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn estimate(&self) -> StorageResult<StorageEstimate> {
        if self.fail_estimate.load(Ordering::SeqCst) {
            return Err(StorageError::EstimateUnavailable("injected failure".into()));
        }
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        let usage_bytes = entries
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum();
        Ok(StorageEstimate {
            usage_bytes,
            quota_bytes: None,
        })
    }
}
