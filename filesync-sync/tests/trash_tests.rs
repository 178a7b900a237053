mod common;

use common::{record, Harness};
use filesync_sync::{SyncConfig, SyncError, REQUEST_BATCH_SIZE};
use filesync_types::{CollectionId, FileId};
use pretty_assertions::assert_eq;

fn small_batches() -> Harness {
    Harness::with_config(SyncConfig {
        request_batch_size: 100,
    })
}

fn file_ids(n: i64) -> Vec<FileId> {
    (1..=n).map(FileId::new).collect()
}

#[test]
fn default_batch_size() {
    assert_eq!(REQUEST_BATCH_SIZE, 1000);
    assert_eq!(SyncConfig::default().request_batch_size, 1000);
    let cfg: SyncConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg.batch_size(), 1000);
    let zero = SyncConfig {
        request_batch_size: 0,
    };
    assert_eq!(zero.batch_size(), 1);
}

// ── Purge ───────────────────────────────────────────────────────

#[tokio::test]
async fn purge_is_split_into_sequential_batches() {
    let h = small_batches();

    h.syncer.trash().delete_from_trash(&file_ids(250)).await.unwrap();

    let requests = h.remote.delete_requests.lock().unwrap().clone();
    let sizes: Vec<usize> = requests.iter().map(|r| r.file_ids.len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
    assert_eq!(requests[0].file_ids[0], FileId::new(1));
    assert_eq!(requests[1].file_ids[0], FileId::new(101));
    assert_eq!(requests[2].file_ids[49], FileId::new(250));
}

#[tokio::test]
async fn purge_stops_at_the_first_failed_batch() {
    let h = small_batches();
    h.remote.fail_mutation_call(2);

    let err = h
        .syncer
        .trash()
        .delete_from_trash(&file_ids(250))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Network(_)));
    assert!(err.to_string().contains("mutation 2 rejected"));
    assert_eq!(h.remote.delete_requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn purge_without_token_is_a_no_op() {
    let h = small_batches();
    h.tokens.clear();

    h.syncer.trash().delete_from_trash(&file_ids(250)).await.unwrap();

    assert_eq!(h.remote.total_requests(), 0);
}

#[tokio::test]
async fn purge_of_nothing_sends_nothing() {
    let h = small_batches();
    h.syncer.trash().delete_from_trash(&[]).await.unwrap();
    assert_eq!(h.remote.total_requests(), 0);
}

// ── Trash ───────────────────────────────────────────────────────

#[tokio::test]
async fn trash_pairs_each_file_with_its_collection() {
    let h = small_batches();
    let files: Vec<_> = (1..=250).map(|id| record(id, id % 3, 10)).collect();

    h.syncer.trash().trash_files(&files).await.unwrap();

    let requests = h.remote.trash_requests.lock().unwrap().clone();
    let sizes: Vec<usize> = requests.iter().map(|r| r.items.len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
    let item = requests[2].items[0];
    assert_eq!(item.file_id, FileId::new(201));
    assert_eq!(item.collection_id, CollectionId::new(201 % 3));
}

#[tokio::test]
async fn trash_failure_keeps_earlier_batches_and_skips_the_rest() {
    let h = small_batches();
    h.remote.fail_mutation_call(2);
    let files: Vec<_> = (1..=250).map(|id| record(id, 1, 10)).collect();

    let result = h.syncer.trash().trash_files(&files).await;

    assert!(result.is_err());
    assert_eq!(h.remote.trash_requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn trash_without_token_is_a_no_op() {
    let h = Harness::new();
    h.tokens.clear();

    h.syncer.trash().trash_files(&[record(1, 1, 1)]).await.unwrap();

    assert_eq!(h.remote.total_requests(), 0);
}

#[tokio::test]
async fn default_batch_fits_in_one_request() {
    let h = Harness::new();
    h.syncer.trash().delete_from_trash(&file_ids(250)).await.unwrap();
    assert_eq!(h.remote.delete_requests.lock().unwrap().len(), 1);
}
