//! Shared fixtures for sync engine tests: a scripted remote log, a counting
//! crypto provider and a sink that records every push.

#![allow(dead_code)]

use async_trait::async_trait;
use filesync_cloud::{
    CloudError, CloudResult, DeleteFromTrashRequest, DiffPage, MetadataScope, RemoteLogClient,
    TrashRequest, UpdateMagicMetadataRequest,
};
use filesync_crypto::{CryptoError, CryptoProvider, CryptoResult};
use filesync_storage::{FileStore, MemoryBackend};
use filesync_sync::{FileSyncer, LiveFiles, SetFiles, SharedToken, SyncConfig};
use filesync_types::{
    Collection, CollectionId, EncryptedFileRecord, EncryptedMetadata, FileId, FileMetadata,
    FileRecord, Timestamp,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Builders ────────────────────────────────────────────────────

pub fn collection(id: i64, updation_time: i64) -> Collection {
    Collection::new(
        CollectionId::new(id),
        format!("collection-key-{id}"),
        Timestamp::from_micros(updation_time),
    )
}

pub fn entry(id: i64, collection: i64, updation_time: i64) -> EncryptedFileRecord {
    EncryptedFileRecord {
        id: FileId::new(id),
        collection_id: CollectionId::new(collection),
        owner_id: Some(1),
        encrypted_key: Some(format!("sealed-key-{id}")),
        key_decryption_nonce: Some("nonce".into()),
        file: None,
        thumbnail: None,
        metadata: None,
        magic_metadata: None,
        pub_magic_metadata: None,
        is_deleted: false,
        updation_time: Timestamp::from_micros(updation_time),
    }
}

pub fn tombstone(id: i64, collection: i64, updation_time: i64) -> EncryptedFileRecord {
    EncryptedFileRecord {
        encrypted_key: None,
        key_decryption_nonce: None,
        is_deleted: true,
        ..entry(id, collection, updation_time)
    }
}

/// A decrypted record as [`CountingCrypto`] would produce it.
pub fn record(id: i64, collection: i64, updation_time: i64) -> FileRecord {
    FileRecord {
        id: FileId::new(id),
        collection_id: CollectionId::new(collection),
        owner_id: Some(1),
        updation_time: Timestamp::from_micros(updation_time),
        is_deleted: false,
        key: Some(format!("file-key-{id}")),
        metadata: Some(FileMetadata {
            title: format!("file-{id}.jpg"),
            creation_time: Timestamp::from_micros(updation_time),
            ..Default::default()
        }),
        magic_metadata: None,
        pub_magic_metadata: None,
        file: None,
        thumbnail: None,
    }
}

pub fn page(diff: Vec<EncryptedFileRecord>, has_more: bool) -> DiffPage {
    DiffPage { diff, has_more }
}

pub fn ids(files: &[FileRecord]) -> Vec<i64> {
    let mut ids: Vec<i64> = files.iter().map(|f| f.id.get()).collect();
    ids.sort_unstable();
    ids
}

// ── Scripted remote log ─────────────────────────────────────────

enum Scripted {
    Page(DiffPage),
    Fail(String),
}

/// A remote log that replays scripted diff pages and records every call.
#[derive(Default)]
pub struct MockRemote {
    pages: Mutex<HashMap<CollectionId, VecDeque<Scripted>>>,
    pub diff_calls: Mutex<Vec<(CollectionId, Timestamp)>>,
    pub trash_requests: Mutex<Vec<TrashRequest>>,
    pub delete_requests: Mutex<Vec<DeleteFromTrashRequest>>,
    pub metadata_requests: Mutex<Vec<(MetadataScope, UpdateMagicMetadataRequest)>>,
    /// 1-based index of the mutation call that fails.
    fail_mutation_call: Mutex<Option<usize>>,
    mutation_calls: AtomicUsize,
    /// Clears this token once the given number of diff calls has been made.
    logout: Mutex<Option<(Arc<SharedToken>, usize)>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, collection: i64, page: DiffPage) {
        self.pages
            .lock()
            .unwrap()
            .entry(CollectionId::new(collection))
            .or_default()
            .push_back(Scripted::Page(page));
    }

    pub fn push_failure(&self, collection: i64, message: &str) {
        self.pages
            .lock()
            .unwrap()
            .entry(CollectionId::new(collection))
            .or_default()
            .push_back(Scripted::Fail(message.to_string()));
    }

    pub fn fail_mutation_call(&self, call: usize) {
        *self.fail_mutation_call.lock().unwrap() = Some(call);
    }

    pub fn logout_after_diff_calls(&self, token: Arc<SharedToken>, calls: usize) {
        *self.logout.lock().unwrap() = Some((token, calls));
    }

    pub fn diff_call_count(&self) -> usize {
        self.diff_calls.lock().unwrap().len()
    }

    pub fn diff_calls_for(&self, collection: i64) -> Vec<Timestamp> {
        self.diff_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c.get() == collection)
            .map(|(_, since)| *since)
            .collect()
    }

    pub fn total_requests(&self) -> usize {
        self.diff_call_count()
            + self.trash_requests.lock().unwrap().len()
            + self.delete_requests.lock().unwrap().len()
            + self.metadata_requests.lock().unwrap().len()
    }

    fn check_mutation(&self) -> CloudResult<()> {
        let call = self.mutation_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.fail_mutation_call.lock().unwrap() == Some(call) {
            return Err(CloudError::Api(format!("500: mutation {call} rejected")));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteLogClient for MockRemote {
    async fn diff(
        &self,
        _token: &str,
        collection_id: CollectionId,
        since_time: Timestamp,
    ) -> CloudResult<DiffPage> {
        let calls = {
            let mut calls = self.diff_calls.lock().unwrap();
            calls.push((collection_id, since_time));
            calls.len()
        };
        if let Some((token, after)) = self.logout.lock().unwrap().as_ref() {
            if calls >= *after {
                token.clear();
            }
        }

        let next = self
            .pages
            .lock()
            .unwrap()
            .get_mut(&collection_id)
            .and_then(|queue| queue.pop_front());
        match next {
            Some(Scripted::Page(page)) => Ok(page),
            Some(Scripted::Fail(message)) => Err(CloudError::Api(message)),
            None => Ok(page(Vec::new(), false)),
        }
    }

    async fn trash(&self, _token: &str, request: &TrashRequest) -> CloudResult<()> {
        self.trash_requests.lock().unwrap().push(request.clone());
        self.check_mutation()
    }

    async fn delete_from_trash(
        &self,
        _token: &str,
        request: &DeleteFromTrashRequest,
    ) -> CloudResult<()> {
        self.delete_requests.lock().unwrap().push(request.clone());
        self.check_mutation()
    }

    async fn update_magic_metadata(
        &self,
        _token: &str,
        scope: MetadataScope,
        request: &UpdateMagicMetadataRequest,
    ) -> CloudResult<()> {
        self.metadata_requests
            .lock()
            .unwrap()
            .push((scope, request.clone()));
        self.check_mutation()
    }
}

// ── Counting crypto provider ────────────────────────────────────

/// Fake crypto that "decrypts" an entry into [`record`] and counts calls.
#[derive(Default)]
pub struct CountingCrypto {
    pub decrypt_calls: AtomicUsize,
    pub encrypt_calls: AtomicUsize,
    fail_on: Mutex<Option<FileId>>,
}

impl CountingCrypto {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, id: i64) {
        *self.fail_on.lock().unwrap() = Some(FileId::new(id));
    }

    pub fn decrypts(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CryptoProvider for CountingCrypto {
    async fn decrypt_file(
        &self,
        file: EncryptedFileRecord,
        _collection_key: &str,
    ) -> CryptoResult<FileRecord> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_on.lock().unwrap() == Some(file.id) {
            return Err(CryptoError::Decryption(format!("bad entry {}", file.id)));
        }
        Ok(record(
            file.id.get(),
            file.collection_id.get(),
            file.updation_time.as_micros(),
        ))
    }

    async fn encrypt_metadata(
        &self,
        payload: &Value,
        file_key: &str,
    ) -> CryptoResult<EncryptedMetadata> {
        self.encrypt_calls.fetch_add(1, Ordering::SeqCst);
        Ok(EncryptedMetadata {
            encrypted_data: format!("sealed:{payload}"),
            decryption_header: format!("header:{file_key}"),
        })
    }

    async fn decrypt_metadata(
        &self,
        encrypted: &EncryptedMetadata,
        _file_key: &str,
    ) -> CryptoResult<Value> {
        let json = encrypted
            .encrypted_data
            .strip_prefix("sealed:")
            .ok_or_else(|| CryptoError::Decryption("not sealed".into()))?;
        Ok(serde_json::from_str(json)?)
    }
}

// ── Recording sink ──────────────────────────────────────────────

/// Live sink that keeps every pushed set in order.
#[derive(Default)]
pub struct RecordingSink {
    pub live: LiveFiles,
    pub history: Mutex<Vec<Vec<FileRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(files: Vec<FileRecord>) -> Self {
        Self {
            live: LiveFiles::with_files(files),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn pushes(&self) -> usize {
        self.history.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Vec<FileRecord>> {
        self.history.lock().unwrap().last().cloned()
    }
}

impl SetFiles for RecordingSink {
    fn set_files(&self, update: &dyn Fn(&[FileRecord]) -> Vec<FileRecord>) {
        self.live.set_files(update);
        self.history.lock().unwrap().push(self.live.snapshot());
    }
}

// ── Harness ─────────────────────────────────────────────────────

/// Routes engine logs to the test output; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Harness {
    pub backend: Arc<MemoryBackend>,
    pub store: FileStore,
    pub remote: Arc<MockRemote>,
    pub crypto: Arc<CountingCrypto>,
    pub tokens: Arc<SharedToken>,
    pub syncer: FileSyncer,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    pub fn with_config(config: SyncConfig) -> Self {
        init_tracing();
        let backend = Arc::new(MemoryBackend::new());
        let store = FileStore::new(backend.clone());
        let remote = Arc::new(MockRemote::new());
        let crypto = Arc::new(CountingCrypto::new());
        let tokens = Arc::new(SharedToken::with_token("token"));
        let syncer = FileSyncer::new(
            store.clone(),
            remote.clone(),
            crypto.clone(),
            tokens.clone(),
            config,
        );
        Self {
            backend,
            store,
            remote,
            crypto,
            tokens,
            syncer,
        }
    }
}
