//! Key and payload envelopes.
//!
//! A file key is sealed under its collection key; the file's metadata and
//! magic metadata payloads are sealed under the file key as JSON. Each
//! sealed value is a base64 `(data, header)` pair.

use crate::cipher::{self, EncryptedData};
use crate::error::CryptoResult;
use crate::key::SymmetricKey;
use filesync_types::EncryptedMetadata;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A file key sealed under a collection key, in its wire form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedKey {
    pub encrypted_key: String,
    pub key_decryption_nonce: String,
}

/// Seals `file_key` under `collection_key`.
pub fn seal_file_key(file_key: &SymmetricKey, collection_key: &SymmetricKey) -> CryptoResult<SealedKey> {
    let sealed = cipher::encrypt(collection_key, file_key.as_bytes())?;
    Ok(SealedKey {
        encrypted_key: sealed.data_base64(),
        key_decryption_nonce: sealed.header_base64(),
    })
}

/// Opens a file key sealed by [`seal_file_key`].
pub fn open_file_key(
    encrypted_key: &str,
    key_decryption_nonce: &str,
    collection_key: &SymmetricKey,
) -> CryptoResult<SymmetricKey> {
    let sealed = EncryptedData::from_base64_parts(encrypted_key, key_decryption_nonce)?;
    let bytes = cipher::decrypt(collection_key, &sealed)?;
    SymmetricKey::from_slice(&bytes)
}

/// Serializes `value` as JSON and seals it under `key`.
pub fn seal_json<T: Serialize + ?Sized>(value: &T, key: &SymmetricKey) -> CryptoResult<EncryptedMetadata> {
    let plaintext = serde_json::to_vec(value)?;
    let sealed = cipher::encrypt(key, &plaintext)?;
    Ok(EncryptedMetadata {
        encrypted_data: sealed.data_base64(),
        decryption_header: sealed.header_base64(),
    })
}

/// Opens a JSON payload sealed by [`seal_json`].
pub fn open_json<T: DeserializeOwned>(data: &str, header: &str, key: &SymmetricKey) -> CryptoResult<T> {
    let sealed = EncryptedData::from_base64_parts(data, header)?;
    let plaintext = cipher::decrypt(key, &sealed)?;
    Ok(serde_json::from_slice(&plaintext)?)
}
