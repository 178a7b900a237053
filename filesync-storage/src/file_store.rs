//! File table adapter over a [`KvBackend`].

use crate::backend::{KvBackend, StorageEstimate};
use crate::error::{StorageError, StorageResult};
use crate::events::LocalFilesEvents;
use filesync_types::{CollectionId, FileRecord, SyncKind, Timestamp};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Key of the normal file table.
pub const FILES_TABLE: &str = "files";

/// Key of the hidden file table.
pub const HIDDEN_FILES_TABLE: &str = "hidden-files";

/// Returns the table key for a sync kind.
pub fn table_name(kind: SyncKind) -> &'static str {
    match kind {
        SyncKind::Normal => FILES_TABLE,
        SyncKind::Hidden => HIDDEN_FILES_TABLE,
    }
}

/// Returns the key under which a collection's cursor is stored.
pub fn cursor_key(kind: SyncKind, collection_id: CollectionId) -> String {
    match kind {
        SyncKind::Normal => format!("{collection_id}-time"),
        SyncKind::Hidden => format!("hidden-{collection_id}-time"),
    }
}

/// The local file tables and sync cursors.
///
/// Exclusively owns the durable file arrays. Writes to the normal table
/// notify [`LocalFilesEvents`]; writes to the hidden table do not.
#[derive(Clone)]
pub struct FileStore {
    backend: Arc<dyn KvBackend>,
    events: Arc<LocalFilesEvents>,
}

impl FileStore {
    /// Creates a store with its own event registry.
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self::with_events(backend, Arc::new(LocalFilesEvents::new()))
    }

    /// Creates a store that notifies an existing event registry.
    pub fn with_events(backend: Arc<dyn KvBackend>, events: Arc<LocalFilesEvents>) -> Self {
        Self { backend, events }
    }

    /// The registry notified after normal-table saves.
    pub fn events(&self) -> &Arc<LocalFilesEvents> {
        &self.events
    }

    /// Loads a file table. A table that was never written is empty.
    pub async fn load_files(&self, kind: SyncKind) -> StorageResult<Vec<FileRecord>> {
        let raw = self
            .blocking(move |backend| backend.get(table_name(kind)))
            .await?;
        match raw {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces a file table.
    ///
    /// On failure the storage estimate is logged next to the error (a failing
    /// estimate is logged and dropped) and the original error is returned.
    pub async fn save_files(&self, kind: SyncKind, files: &[FileRecord]) -> StorageResult<()> {
        if let Err(e) = self.write_table(kind, files).await {
            self.log_save_failure(kind, &e).await;
            return Err(e);
        }
        debug!(%kind, count = files.len(), "saved local files");

        if kind == SyncKind::Normal {
            self.events.emit_local_files_updated();
        }
        Ok(())
    }

    /// Returns the collection's cursor, or [`Timestamp::ZERO`] if it was
    /// never synced.
    pub async fn last_sync_time(
        &self,
        kind: SyncKind,
        collection_id: CollectionId,
    ) -> StorageResult<Timestamp> {
        let key = cursor_key(kind, collection_id);
        let raw = self.blocking(move |backend| backend.get(&key)).await?;
        match raw {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Timestamp::ZERO),
        }
    }

    /// Stores the collection's cursor.
    pub async fn set_last_sync_time(
        &self,
        kind: SyncKind,
        collection_id: CollectionId,
        time: Timestamp,
    ) -> StorageResult<()> {
        let key = cursor_key(kind, collection_id);
        let bytes = serde_json::to_vec(&time)?;
        self.blocking(move |backend| backend.set(&key, &bytes)).await
    }

    /// Reports the backend's usage and quota.
    pub async fn storage_estimate(&self) -> StorageResult<StorageEstimate> {
        self.blocking(|backend| backend.estimate()).await
    }

    async fn write_table(&self, kind: SyncKind, files: &[FileRecord]) -> StorageResult<()> {
        let bytes = serde_json::to_vec(files)?;
        self.blocking(move |backend| backend.set(table_name(kind), &bytes))
            .await
    }

    async fn log_save_failure(&self, kind: SyncKind, err: &StorageError) {
        match self.storage_estimate().await {
            Ok(estimate) => {
                error!(%kind, error = %err, ?estimate, "failed to save files to local store");
                info!(
                    usage_bytes = estimate.usage_bytes,
                    quota_bytes = ?estimate.quota_bytes,
                    "storage estimate"
                );
            }
            Err(diag) => {
                error!(%kind, error = %err, "failed to save files to local store");
                error!(error = %diag, "failed to get storage stats");
            }
        }
    }

    async fn blocking<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&dyn KvBackend) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || f(backend.as_ref()))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?
    }
}
