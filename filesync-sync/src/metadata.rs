//! Optimistic magic metadata updates.
//!
//! The caller hands over each file with the envelope it wants stored. Every
//! payload is sealed under its file's key and the whole batch is submitted
//! in one request. On success the caller's records come back carrying the
//! new envelopes with `version + 1`, which is what the server stores for an
//! accepted update; nothing is re-fetched.

use crate::auth::{AuthState, TokenProvider};
use crate::error::{SyncError, SyncResult};
use filesync_cloud::{
    MagicMetadataUpdate, MetadataScope, RemoteLogClient, UpdateMagicMetadataRequest,
};
use filesync_crypto::CryptoProvider;
use filesync_types::{
    EncryptedMagicMetadata, FileMagicProps, FilePublicMagicProps, FileRecord, MagicMetadata,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// Submits private and public magic metadata updates.
#[derive(Clone)]
pub struct MagicMetadataService {
    remote: Arc<dyn RemoteLogClient>,
    crypto: Arc<dyn CryptoProvider>,
    tokens: Arc<dyn TokenProvider>,
}

impl MagicMetadataService {
    pub fn new(
        remote: Arc<dyn RemoteLogClient>,
        crypto: Arc<dyn CryptoProvider>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            remote,
            crypto,
            tokens,
        }
    }

    /// Replaces the private magic metadata of each file.
    ///
    /// Only the `data` props are sealed; `version` and `count` travel in
    /// clear beside them, as for the public variant. Clients that seal the
    /// whole private envelope as one payload cannot open what this writes.
    ///
    /// Returns `None` without touching the network when not logged in.
    pub async fn update_magic_metadata(
        &self,
        updates: Vec<(FileRecord, MagicMetadata<FileMagicProps>)>,
    ) -> SyncResult<Option<Vec<FileRecord>>> {
        let AuthState::Authenticated(token) = AuthState::check(self.tokens.as_ref()) else {
            return Ok(None);
        };
        self.submit(&token, MetadataScope::Private, &updates).await?;

        let updated = updates
            .into_iter()
            .map(|(mut file, magic)| {
                let id = file.id;
                file.magic_metadata =
                    Some(magic.accepted().map_err(|_| SyncError::VersionOverflow(id))?);
                Ok(file)
            })
            .collect::<SyncResult<Vec<_>>>()?;
        Ok(Some(updated))
    }

    /// Replaces the public magic metadata of each file.
    ///
    /// Returns `None` without touching the network when not logged in.
    pub async fn update_public_magic_metadata(
        &self,
        updates: Vec<(FileRecord, MagicMetadata<FilePublicMagicProps>)>,
    ) -> SyncResult<Option<Vec<FileRecord>>> {
        let AuthState::Authenticated(token) = AuthState::check(self.tokens.as_ref()) else {
            return Ok(None);
        };
        self.submit(&token, MetadataScope::Public, &updates).await?;

        let updated = updates
            .into_iter()
            .map(|(mut file, magic)| {
                let id = file.id;
                file.pub_magic_metadata =
                    Some(magic.accepted().map_err(|_| SyncError::VersionOverflow(id))?);
                Ok(file)
            })
            .collect::<SyncResult<Vec<_>>>()?;
        Ok(Some(updated))
    }

    async fn submit<T: Serialize>(
        &self,
        token: &str,
        scope: MetadataScope,
        updates: &[(FileRecord, MagicMetadata<T>)],
    ) -> SyncResult<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut request = UpdateMagicMetadataRequest {
            metadata_list: Vec::with_capacity(updates.len()),
        };
        for (file, magic) in updates {
            if magic.version.checked_add(1).is_none() {
                return Err(SyncError::VersionOverflow(file.id));
            }
            let file_key = file
                .key
                .as_deref()
                .ok_or(SyncError::MissingFileKey(file.id))?;
            let payload = serde_json::to_value(&magic.data)?;
            let sealed = self.crypto.encrypt_metadata(&payload, file_key).await?;
            request.metadata_list.push(MagicMetadataUpdate {
                id: file.id,
                magic_metadata: EncryptedMagicMetadata {
                    version: magic.version,
                    count: magic.count,
                    data: sealed.encrypted_data,
                    header: sealed.decryption_header,
                },
            });
        }

        if let Err(e) = self.remote.update_magic_metadata(token, scope, &request).await {
            error!(%scope, count = updates.len(), error = %e, "update magic metadata failed");
            return Err(e.into());
        }
        Ok(())
    }
}
