//! Request and response bodies of the remote log API.

use filesync_types::{CollectionId, EncryptedFileRecord, EncryptedMagicMetadata, FileId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One page of a collection diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffPage {
    /// Changed records, ordered by `updationTime`.
    pub diff: Vec<EncryptedFileRecord>,
    /// Whether another page follows this one.
    #[serde(default)]
    pub has_more: bool,
}

/// A file to move to the trash, with the collection it is trashed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashItem {
    #[serde(rename = "fileID")]
    pub file_id: FileId,
    #[serde(rename = "collectionID")]
    pub collection_id: CollectionId,
}

/// Body of a trash request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashRequest {
    pub items: Vec<TrashItem>,
}

/// Body of a permanent-delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFromTrashRequest {
    #[serde(rename = "fileIDs")]
    pub file_ids: Vec<FileId>,
}

/// One file's new magic metadata envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicMetadataUpdate {
    pub id: FileId,
    pub magic_metadata: EncryptedMagicMetadata,
}

/// Body of a bulk magic metadata update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMagicMetadataRequest {
    pub metadata_list: Vec<MagicMetadataUpdate>,
}

/// Which magic metadata field an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataScope {
    /// Owner-only annotations.
    Private,
    /// Annotations shared with everyone who can see the collection.
    Public,
}

impl MetadataScope {
    /// API path of the bulk update endpoint for this scope.
    pub fn path(&self) -> &'static str {
        match self {
            MetadataScope::Private => "/files/magic-metadata",
            MetadataScope::Public => "/files/public-magic-metadata",
        }
    }
}

impl fmt::Display for MetadataScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataScope::Private => write!(f, "private"),
            MetadataScope::Public => write!(f, "public"),
        }
    }
}
