//! Paginated diff fetch for a single collection.
//!
//! Pages depend on each other (every request starts where the previous
//! page ended), so they are fetched strictly in sequence. Entries within a
//! page are decrypted concurrently and reassembled in page order before the
//! live sink sees them.

use crate::auth::{AuthState, TokenProvider};
use crate::display::prepare_for_display;
use crate::error::SyncResult;
use crate::merge::merge_by_latest_version;
use crate::sink::SetFiles;
use filesync_cloud::RemoteLogClient;
use filesync_crypto::CryptoProvider;
use filesync_types::{Collection, EncryptedFileRecord, FileRecord, Timestamp};
use futures::future::try_join_all;
use tracing::{debug, error, info};

/// How a collection diff ended.
#[derive(Debug)]
pub enum DiffOutcome {
    /// Every page was fetched; holds the decrypted entries of all pages.
    Complete(Vec<FileRecord>),
    /// The token disappeared at a page boundary. Nothing fetched so far
    /// should be persisted.
    LoggedOut,
}

/// Collaborators a diff fetch runs against.
pub struct DiffFetcher<'a> {
    pub remote: &'a dyn RemoteLogClient,
    pub crypto: &'a dyn CryptoProvider,
    pub tokens: &'a dyn TokenProvider,
}

struct DiffCursor {
    since_time: Timestamp,
    accumulated: Vec<FileRecord>,
    has_more: bool,
}

impl DiffFetcher<'_> {
    /// Fetches every record of `collection` changed after `since_time`,
    /// pushing the running result to `sink` after each page.
    pub async fn fetch(
        &self,
        collection: &Collection,
        since_time: Timestamp,
        sink: &dyn SetFiles,
    ) -> SyncResult<DiffOutcome> {
        match self.fetch_pages(collection, since_time, sink).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(collection_id = %collection.id, error = %e, "get files failed");
                Err(e)
            }
        }
    }

    async fn fetch_pages(
        &self,
        collection: &Collection,
        since_time: Timestamp,
        sink: &dyn SetFiles,
    ) -> SyncResult<DiffOutcome> {
        let mut cursor = DiffCursor {
            since_time,
            accumulated: Vec::new(),
            has_more: true,
        };

        while cursor.has_more {
            let AuthState::Authenticated(token) = AuthState::check(self.tokens) else {
                info!(collection_id = %collection.id, "token missing mid-diff, stopping");
                return Ok(DiffOutcome::LoggedOut);
            };

            let page = self
                .remote
                .diff(&token, collection.id, cursor.since_time)
                .await?;
            debug!(
                collection_id = %collection.id,
                since_time = %cursor.since_time,
                count = page.diff.len(),
                has_more = page.has_more,
                "fetched diff page"
            );

            let decrypted = self.decrypt_page(page.diff, &collection.key).await?;
            if let Some(last) = decrypted.last() {
                cursor.since_time = last.updation_time;
            }
            cursor.accumulated.extend(decrypted);
            cursor.has_more = page.has_more;

            let accumulated = &cursor.accumulated;
            sink.set_files(&|current| {
                prepare_for_display(merge_by_latest_version(
                    current.iter().cloned().chain(accumulated.iter().cloned()),
                ))
            });
        }

        Ok(DiffOutcome::Complete(cursor.accumulated))
    }

    /// Decrypts live entries; tombstones pass through untouched.
    async fn decrypt_page(
        &self,
        entries: Vec<EncryptedFileRecord>,
        collection_key: &str,
    ) -> SyncResult<Vec<FileRecord>> {
        let crypto = self.crypto;
        let files = try_join_all(entries.into_iter().map(move |entry| async move {
            if entry.is_deleted {
                Ok(FileRecord::from_tombstone(entry))
            } else {
                crypto.decrypt_file(entry, collection_key).await
            }
        }))
        .await?;
        Ok(files)
    }
}
