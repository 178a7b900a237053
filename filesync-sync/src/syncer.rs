//! Sync orchestrator: reconciles the local file tables with the remote log.

use crate::auth::{AuthState, TokenProvider};
use crate::config::SyncConfig;
use crate::diff::{DiffFetcher, DiffOutcome};
use crate::display::prepare_for_display;
use crate::error::SyncResult;
use crate::merge::{merge_by_latest_version, prune_to_known_collections};
use crate::metadata::MagicMetadataService;
use crate::sink::SetFiles;
use crate::trash::TrashService;
use filesync_cloud::RemoteLogClient;
use filesync_crypto::CryptoProvider;
use filesync_storage::FileStore;
use filesync_types::{Collection, CollectionId, FileRecord, SyncKind};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Drives sync passes over a set of collections.
///
/// Passes of the same [`SyncKind`] are serialized; a normal and a hidden
/// pass may run side by side since they touch disjoint tables and cursors.
pub struct FileSyncer {
    store: FileStore,
    remote: Arc<dyn RemoteLogClient>,
    crypto: Arc<dyn CryptoProvider>,
    tokens: Arc<dyn TokenProvider>,
    config: SyncConfig,
    normal_lock: Mutex<()>,
    hidden_lock: Mutex<()>,
}

impl FileSyncer {
    pub fn new(
        store: FileStore,
        remote: Arc<dyn RemoteLogClient>,
        crypto: Arc<dyn CryptoProvider>,
        tokens: Arc<dyn TokenProvider>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            remote,
            crypto,
            tokens,
            config,
            normal_lock: Mutex::new(()),
            hidden_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Trash and purge against the same remote and token source.
    pub fn trash(&self) -> TrashService {
        TrashService::new(self.remote.clone(), self.tokens.clone(), self.config.clone())
    }

    /// Magic metadata updates against the same remote, crypto and token source.
    pub fn metadata(&self) -> MagicMetadataService {
        MagicMetadataService::new(self.remote.clone(), self.crypto.clone(), self.tokens.clone())
    }

    /// Stored normal files.
    pub async fn local_files(&self) -> SyncResult<Vec<FileRecord>> {
        Ok(self.store.load_files(SyncKind::Normal).await?)
    }

    /// Stored hidden files.
    pub async fn local_hidden_files(&self) -> SyncResult<Vec<FileRecord>> {
        Ok(self.store.load_files(SyncKind::Hidden).await?)
    }

    pub async fn sync_files(
        &self,
        collections: &[Collection],
        sink: &dyn SetFiles,
    ) -> SyncResult<Vec<FileRecord>> {
        self.sync(SyncKind::Normal, collections, sink).await
    }

    pub async fn sync_hidden_files(
        &self,
        collections: &[Collection],
        sink: &dyn SetFiles,
    ) -> SyncResult<Vec<FileRecord>> {
        self.sync(SyncKind::Hidden, collections, sink).await
    }

    /// Runs one sync pass for `kind` over `collections`, in order.
    ///
    /// Files of collections missing from `collections` are dropped first.
    /// Each changed collection is then fetched, merged and saved before the
    /// next one starts, so an error in a later collection leaves earlier
    /// ones committed. Without a token the pass only prunes.
    pub async fn sync(
        &self,
        kind: SyncKind,
        collections: &[Collection],
        sink: &dyn SetFiles,
    ) -> SyncResult<Vec<FileRecord>> {
        let _guard = self.lock(kind).lock().await;

        let local = self.store.load_files(kind).await?;
        let loaded = local.len();
        let known: HashSet<CollectionId> = collections.iter().map(|c| c.id).collect();
        let mut files = prune_to_known_collections(local, &known);

        if files.len() != loaded {
            info!(%kind, removed = loaded - files.len(), "pruned files of unknown collections");
            self.store.save_files(kind, &files).await?;
            let pruned = prepare_for_display(files.clone());
            sink.set_files(&|_| pruned.clone());
        }

        let fetcher = DiffFetcher {
            remote: self.remote.as_ref(),
            crypto: self.crypto.as_ref(),
            tokens: self.tokens.as_ref(),
        };

        for collection in collections {
            if !AuthState::check(self.tokens.as_ref()).is_authenticated() {
                continue;
            }

            let last_sync_time = self.store.last_sync_time(kind, collection.id).await?;
            if collection.updation_time == last_sync_time {
                debug!(%kind, collection_id = %collection.id, "collection unchanged");
                continue;
            }

            let fetched = match fetcher.fetch(collection, last_sync_time, sink).await? {
                DiffOutcome::Complete(fetched) => fetched,
                DiffOutcome::LoggedOut => continue,
            };

            info!(
                %kind,
                collection_id = %collection.id,
                count = fetched.len(),
                "merging collection diff"
            );
            files = merge_by_latest_version(files.into_iter().chain(fetched));
            self.store.save_files(kind, &files).await?;
            self.store
                .set_last_sync_time(kind, collection.id, collection.updation_time)
                .await?;
        }

        Ok(files)
    }

    fn lock(&self, kind: SyncKind) -> &Mutex<()> {
        match kind {
            SyncKind::Normal => &self.normal_lock,
            SyncKind::Hidden => &self.hidden_lock,
        }
    }
}
