//! Key-value backend contract.

use crate::error::StorageResult;
use serde::{Deserialize, Serialize};

/// How much space the local store uses, and how much it may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEstimate {
    pub usage_bytes: u64,
    /// `None` when the backend has no fixed limit.
    pub quota_bytes: Option<u64>,
}

/// Durable key-value persistence.
///
/// Calls are blocking; [`crate::FileStore`] moves them onto the blocking
/// thread pool.
pub trait KvBackend: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Reports current usage and quota.
    fn estimate(&self) -> StorageResult<StorageEstimate>;
}
