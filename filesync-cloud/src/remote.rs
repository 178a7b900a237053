//! Remote log contract.

use crate::api::{
    DeleteFromTrashRequest, DiffPage, MetadataScope, TrashRequest, UpdateMagicMetadataRequest,
};
use crate::error::CloudResult;
use async_trait::async_trait;
use filesync_types::{CollectionId, Timestamp};

/// The server-side log of file changes, plus the mutations the engine
/// submits against it. Every call is authenticated with `token`.
///
/// Implementations apply their own timeout policy; the engine does not
/// retry.
#[async_trait]
pub trait RemoteLogClient: Send + Sync {
    /// Fetches one page of records of `collection_id` changed after
    /// `since_time`.
    async fn diff(
        &self,
        token: &str,
        collection_id: CollectionId,
        since_time: Timestamp,
    ) -> CloudResult<DiffPage>;

    /// Moves one batch of files to the trash.
    async fn trash(&self, token: &str, request: &TrashRequest) -> CloudResult<()>;

    /// Permanently deletes one batch of trashed files.
    async fn delete_from_trash(
        &self,
        token: &str,
        request: &DeleteFromTrashRequest,
    ) -> CloudResult<()>;

    /// Replaces the private or public magic metadata of a batch of files.
    async fn update_magic_metadata(
        &self,
        token: &str,
        scope: MetadataScope,
        request: &UpdateMagicMetadataRequest,
    ) -> CloudResult<()>;
}
