//! File records.
//!
//! A file is first seen as an [`EncryptedFileRecord`] in a collection diff.
//! Live entries are decrypted into a [`FileRecord`]; tombstones are carried
//! over as-is without touching their (usually absent) encrypted payloads.

use crate::ids::{CollectionId, FileId};
use crate::magic::{EncryptedMagicMetadata, FileMagicProps, FilePublicMagicProps, MagicMetadata};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Content-encryption fields of the file body or thumbnail.
///
/// Opaque to the sync engine: they are carried from the diff into the local
/// store for the download layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decryption_header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Any other content field the server sends.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A ciphertext sealed under a file key, with the header (nonce) needed to
/// open it. Both fields are base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedMetadata {
    pub encrypted_data: String,
    pub decryption_header: String,
}

/// Decrypted core metadata of a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub creation_time: Timestamp,
    #[serde(default)]
    pub modification_time: Timestamp,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire form of a file record, as returned by the collection diff.
///
/// Tombstones usually arrive with only the identifying fields set, so every
/// payload field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedFileRecord {
    pub id: FileId,
    #[serde(rename = "collectionID")]
    pub collection_id: CollectionId,
    #[serde(rename = "ownerID", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    /// File key sealed under the collection key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_decryption_nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<FileAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EncryptedMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic_metadata: Option<EncryptedMagicMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_magic_metadata: Option<EncryptedMagicMetadata>,
    #[serde(default)]
    pub is_deleted: bool,
    pub updation_time: Timestamp,
}

/// A file's decrypted metadata, as held in the local store and shown to the
/// presentation layer.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: FileId,
    #[serde(rename = "collectionID")]
    pub collection_id: CollectionId,
    #[serde(rename = "ownerID", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    pub updation_time: Timestamp,
    #[serde(default)]
    pub is_deleted: bool,
    /// Decrypted file key, base64 encoded. Absent on tombstones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic_metadata: Option<MagicMetadata<FileMagicProps>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_magic_metadata: Option<MagicMetadata<FilePublicMagicProps>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<FileAttributes>,
}

impl FileRecord {
    /// Carries a deleted diff entry into the local form without decrypting
    /// anything.
    pub fn from_tombstone(entry: EncryptedFileRecord) -> Self {
        Self {
            id: entry.id,
            collection_id: entry.collection_id,
            owner_id: entry.owner_id,
            updation_time: entry.updation_time,
            is_deleted: entry.is_deleted,
            key: None,
            metadata: None,
            magic_metadata: None,
            pub_magic_metadata: None,
            file: entry.file,
            thumbnail: entry.thumbnail,
        }
    }

    /// Creation time used for ordering in views.
    pub fn creation_time(&self) -> Timestamp {
        self.metadata
            .as_ref()
            .map(|m| m.creation_time)
            .unwrap_or_default()
    }

    /// Modification time used as a secondary ordering key in views.
    pub fn modification_time(&self) -> Timestamp {
        self.metadata
            .as_ref()
            .map(|m| m.modification_time)
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for FileRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRecord")
            .field("id", &self.id)
            .field("collection_id", &self.collection_id)
            .field("updation_time", &self.updation_time)
            .field("is_deleted", &self.is_deleted)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("metadata", &self.metadata)
            .field("magic_metadata", &self.magic_metadata)
            .field("pub_magic_metadata", &self.pub_magic_metadata)
            .finish_non_exhaustive()
    }
}
