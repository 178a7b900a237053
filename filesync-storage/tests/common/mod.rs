//! Shared test helpers for storage tests.

#![allow(dead_code)]

use filesync_types::{CollectionId, FileId, FileMetadata, FileRecord, Timestamp};

/// A decrypted record with just enough fields set to be distinguishable.
pub fn record(id: i64, collection: i64, updation_time: i64) -> FileRecord {
    FileRecord {
        id: FileId::new(id),
        collection_id: CollectionId::new(collection),
        owner_id: Some(1),
        updation_time: Timestamp::from_micros(updation_time),
        is_deleted: false,
        key: Some("a2V5".into()),
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
