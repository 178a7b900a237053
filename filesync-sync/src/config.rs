//! Sync engine configuration.

use serde::{Deserialize, Serialize};

/// Default number of identifiers sent per trash or purge request.
pub const REQUEST_BATCH_SIZE: usize = 1000;

/// Configuration for the sync engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum identifiers per batched mutation request.
    pub request_batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_batch_size: REQUEST_BATCH_SIZE,
        }
    }
}

impl SyncConfig {
    /// Batch size clamped to at least one.
    pub fn batch_size(&self) -> usize {
        self.request_batch_size.max(1)
    }
}
