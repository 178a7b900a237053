//! Authenticated encryption using ChaCha20-Poly1305.
//!
//! The nonce doubles as the "header" that the server stores next to every
//! ciphertext, so sealed values split cleanly into `(data, header)` pairs.

use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKey;
use base64::{engine::general_purpose::STANDARD, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;

/// Size of nonce in bytes (96 bits for ChaCha20-Poly1305).
pub const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Encrypted data with the nonce needed for decryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedData {
    /// The nonce used for encryption (unique per encryption).
    pub nonce: [u8; NONCE_SIZE],
    /// The encrypted ciphertext (includes auth tag).
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    /// Returns the ciphertext as base64.
    pub fn data_base64(&self) -> String {
        STANDARD.encode(&self.ciphertext)
    }

    /// Returns the nonce as base64, in the form the server calls a header.
    pub fn header_base64(&self) -> String {
        STANDARD.encode(self.nonce)
    }

    /// Rebuilds encrypted data from its base64 `(data, header)` pair.
    pub fn from_base64_parts(data: &str, header: &str) -> CryptoResult<Self> {
        let ciphertext = STANDARD
            .decode(data)
            .map_err(|e| CryptoError::Encoding(format!("ciphertext: {e}")))?;
        let nonce_bytes = STANDARD
            .decode(header)
            .map_err(|e| CryptoError::Encoding(format!("header: {e}")))?;

        if nonce_bytes.len() != NONCE_SIZE {
            return Err(CryptoError::InvalidNonceLength {
                expected: NONCE_SIZE,
                actual: nonce_bytes.len(),
            });
        }
        if ciphertext.len() < TAG_SIZE {
            return Err(CryptoError::Decryption("data too short".to_string()));
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&nonce_bytes);
        Ok(Self { nonce, ciphertext })
    }
}

/// Encrypts plaintext under `key` with a fresh random nonce.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> CryptoResult<EncryptedData> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    Ok(EncryptedData {
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Decrypts ciphertext produced by [`encrypt`] under the same key.
pub fn decrypt(key: &SymmetricKey, encrypted: &EncryptedData) -> CryptoResult<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::from_slice(&encrypted.nonce);

    cipher
        .decrypt(nonce, encrypted.ciphertext.as_ref())
        .map_err(|_| {
            CryptoError::Decryption("decryption failed (wrong key or tampered data)".to_string())
        })
}
