//! Error types for the sync layer.

use filesync_cloud::CloudError;
use filesync_crypto::CryptoError;
use filesync_storage::StorageError;
use filesync_types::FileId;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
///
/// A missing auth token is not an error; see [`crate::AuthState`].
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote log rejected a request or could not be reached.
    #[error("network error: {0}")]
    Network(#[from] CloudError),

    /// A diff entry could not be decrypted or a payload could not be sealed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The local store failed to read or persist.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A metadata update targeted a record with no decrypted file key.
    #[error("file {0} has no decrypted key")]
    MissingFileKey(FileId),

    /// A metadata update carried a version that cannot be advanced.
    #[error("magic metadata version of file {0} cannot be advanced")]
    VersionOverflow(FileId),
}
