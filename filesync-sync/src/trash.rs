//! Trash and permanent delete in fixed-size batches.
//!
//! Batches are sent one after another in input order. The first failing
//! batch stops the operation and its error is returned; batches already
//! accepted stay applied on the server. Neither call is atomic.

use crate::auth::{AuthState, TokenProvider};
use crate::config::SyncConfig;
use crate::error::SyncResult;
use filesync_cloud::{DeleteFromTrashRequest, RemoteLogClient, TrashItem, TrashRequest};
use filesync_types::{FileId, FileRecord};
use std::sync::Arc;
use tracing::{debug, error};

/// Moves files to the trash and purges them from it.
#[derive(Clone)]
pub struct TrashService {
    remote: Arc<dyn RemoteLogClient>,
    tokens: Arc<dyn TokenProvider>,
    config: SyncConfig,
}

impl TrashService {
    pub fn new(
        remote: Arc<dyn RemoteLogClient>,
        tokens: Arc<dyn TokenProvider>,
        config: SyncConfig,
    ) -> Self {
        Self {
            remote,
            tokens,
            config,
        }
    }

    /// Moves `files` to the trash, each from its own collection.
    /// No-op when not logged in.
    pub async fn trash_files(&self, files: &[FileRecord]) -> SyncResult<()> {
        let AuthState::Authenticated(token) = AuthState::check(self.tokens.as_ref()) else {
            return Ok(());
        };

        for (seq, batch) in files.chunks(self.config.batch_size()).enumerate() {
            let request = TrashRequest {
                items: batch
                    .iter()
                    .map(|f| TrashItem {
                        file_id: f.id,
                        collection_id: f.collection_id,
                    })
                    .collect(),
            };
            debug!(batch = seq, count = batch.len(), "submitting trash batch");
            if let Err(e) = self.remote.trash(&token, &request).await {
                error!(batch = seq, error = %e, "trash file failed");
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Permanently deletes trashed files. No-op when not logged in.
    pub async fn delete_from_trash(&self, file_ids: &[FileId]) -> SyncResult<()> {
        let AuthState::Authenticated(token) = AuthState::check(self.tokens.as_ref()) else {
            return Ok(());
        };

        for (seq, batch) in file_ids.chunks(self.config.batch_size()).enumerate() {
            let request = DeleteFromTrashRequest {
                file_ids: batch.to_vec(),
            };
            debug!(batch = seq, count = batch.len(), "submitting delete batch");
            if let Err(e) = self.remote.delete_from_trash(&token, &request).await {
                error!(batch = seq, error = %e, "delete from trash failed");
                return Err(e.into());
            }
        }
        Ok(())
    }
}
