//! Incremental end-to-end encrypted file sync engine.
//!
//! The local cache holds decrypted file records in two tables, normal and
//! hidden. A sync pass reconciles a table with the server's per-collection
//! change log:
//!
//! 1. **Prune**: drop files whose collection is no longer listed.
//! 2. **Skip**: leave collections whose `updationTime` matches the stored
//!    cursor untouched.
//! 3. **Fetch**: page through the diff of each changed collection,
//!    decrypting live entries and pushing progress to a live sink.
//! 4. **Merge & persist**: keep the newest record per file id, save the
//!    table and advance the collection's cursor.
//!
//! Magic metadata updates and trash operations are submitted separately
//! through [`MagicMetadataService`] and [`TrashService`].
//!
//! A missing auth token is never an error: passes degrade to pruning and
//! mutations return without touching the network.
//!
//! # Example
//!
//! ```no_run
//! use filesync_cloud::{ApiConfig, HttpRemoteLog};
//! use filesync_crypto::LocalCryptoProvider;
//! use filesync_storage::{FileStore, SqliteBackend};
//! use filesync_sync::{FileSyncer, LiveFiles, SharedToken, SyncConfig};
//! use filesync_types::{Collection, CollectionId, Timestamp};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileStore::new(Arc::new(SqliteBackend::open("files.db")?));
//! let remote = Arc::new(HttpRemoteLog::new(ApiConfig::default())?);
//! let tokens = Arc::new(SharedToken::with_token("session-token"));
//!
//! let syncer = FileSyncer::new(
//!     store,
//!     remote,
//!     Arc::new(LocalCryptoProvider::new()),
//!     tokens,
//!     SyncConfig::default(),
//! );
//!
//! let collections = vec![Collection::new(
//!     CollectionId::new(1),
//!     "base64-collection-key",
//!     Timestamp::from_micros(1_700_000_000_000_000),
//! )];
//! let live = LiveFiles::new();
//! let files = syncer.sync_files(&collections, &live).await?;
//! println!("{} files", files.len());
//! # Ok(())
//! # }
//! ```

mod auth;
mod config;
mod diff;
mod display;
mod error;
mod merge;
mod metadata;
mod sink;
mod syncer;
mod trash;

pub use auth::{AuthState, SharedToken, TokenProvider};
pub use config::{SyncConfig, REQUEST_BATCH_SIZE};
pub use diff::{DiffFetcher, DiffOutcome};
pub use display::{merge_metadata, prepare_for_display, sort_files};
pub use error::{SyncError, SyncResult};
pub use merge::{merge_by_latest_version, prune_to_known_collections};
pub use metadata::MagicMetadataService;
pub use sink::{LiveFiles, SetFiles};
pub use syncer::FileSyncer;
pub use trash::TrashService;
