//! The crypto capability the sync engine depends on.
//!
//! The engine holds an `Arc<dyn CryptoProvider>` and never sees raw key
//! bytes. Implementations may run the work on another thread or process;
//! [`LocalCryptoProvider`] does it inline.

use crate::envelope::{open_file_key, open_json, seal_json};
use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKey;
use async_trait::async_trait;
use filesync_types::{
    EncryptedFileRecord, EncryptedMagicMetadata, EncryptedMetadata, FileMetadata, FileRecord,
    MagicMetadata,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decrypts file records and seals metadata payloads.
#[async_trait]
pub trait CryptoProvider: Send + Sync {
    /// Decrypts a live diff entry using its collection's key (base64).
    async fn decrypt_file(
        &self,
        file: EncryptedFileRecord,
        collection_key: &str,
    ) -> CryptoResult<FileRecord>;

    /// Seals an arbitrary JSON payload under a file key (base64).
    async fn encrypt_metadata(
        &self,
        payload: &Value,
        file_key: &str,
    ) -> CryptoResult<EncryptedMetadata>;

    /// Opens a payload sealed by [`CryptoProvider::encrypt_metadata`].
    async fn decrypt_metadata(
        &self,
        encrypted: &EncryptedMetadata,
        file_key: &str,
    ) -> CryptoResult<Value>;
}

/// In-process ChaCha20-Poly1305 provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCryptoProvider;

impl LocalCryptoProvider {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous body of [`CryptoProvider::decrypt_file`].
    pub fn decrypt_file_record(
        &self,
        file: EncryptedFileRecord,
        collection_key: &str,
    ) -> CryptoResult<FileRecord> {
        let file_id = file.id.get();
        let missing = |field| CryptoError::MissingField { file_id, field };

        let collection_key = SymmetricKey::from_base64(collection_key)?;
        let encrypted_key = file.encrypted_key.as_deref().ok_or(missing("encryptedKey"))?;
        let nonce = file
            .key_decryption_nonce
            .as_deref()
            .ok_or(missing("keyDecryptionNonce"))?;
        let file_key = open_file_key(encrypted_key, nonce, &collection_key)?;

        let metadata = match &file.metadata {
            Some(m) => Some(open_json::<FileMetadata>(
                &m.encrypted_data,
                &m.decryption_header,
                &file_key,
            )?),
            None => None,
        };
        let magic_metadata = open_magic(file.magic_metadata.as_ref(), &file_key)?;
        let pub_magic_metadata = open_magic(file.pub_magic_metadata.as_ref(), &file_key)?;

        Ok(FileRecord {
            id: file.id,
            collection_id: file.collection_id,
            owner_id: file.owner_id,
            updation_time: file.updation_time,
            is_deleted: file.is_deleted,
            key: Some(file_key.to_base64()),
            metadata,
            magic_metadata,
            pub_magic_metadata,
            file: file.file,
            thumbnail: file.thumbnail,
        })
    }
}

fn open_magic<T: DeserializeOwned>(
    envelope: Option<&EncryptedMagicMetadata>,
    file_key: &SymmetricKey,
) -> CryptoResult<Option<MagicMetadata<T>>> {
    envelope
        .map(|m| {
            let data = open_json::<T>(&m.data, &m.header, file_key)?;
            Ok(MagicMetadata::new(m.version, m.count, data))
        })
        .transpose()
}

#[async_trait]
impl CryptoProvider for LocalCryptoProvider {
    async fn decrypt_file(
        &self,
        file: EncryptedFileRecord,
        collection_key: &str,
    ) -> CryptoResult<FileRecord> {
        self.decrypt_file_record(file, collection_key)
    }

    async fn encrypt_metadata(
        &self,
        payload: &Value,
        file_key: &str,
    ) -> CryptoResult<EncryptedMetadata> {
        let key = SymmetricKey::from_base64(file_key)?;
        seal_json(payload, &key)
    }

    async fn decrypt_metadata(
        &self,
        encrypted: &EncryptedMetadata,
        file_key: &str,
    ) -> CryptoResult<Value> {
        let key = SymmetricKey::from_base64(file_key)?;
        open_json(&encrypted.encrypted_data, &encrypted.decryption_header, &key)
    }
}
