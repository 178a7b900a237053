//! Encryption layer for the file sync engine.
//!
//! Files are end-to-end encrypted with a two-tier key layout:
//!
//! 1. Collection key: shared by everyone with access to the collection
//! 2. File key: random per file, sealed under the collection key
//!
//! The file key in turn seals the file's metadata and both magic metadata
//! payloads. Every ciphertext travels with a header (its nonce), and all
//! binary values are exchanged as standard base64.
//!
//! The sync engine only talks to the [`CryptoProvider`] trait;
//! [`LocalCryptoProvider`] is the in-process ChaCha20-Poly1305
//! implementation.

mod cipher;
mod envelope;
mod error;
mod key;
mod provider;

pub use cipher::{decrypt, encrypt, EncryptedData, NONCE_SIZE, TAG_SIZE};
pub use envelope::{open_file_key, open_json, seal_file_key, seal_json, SealedKey};
pub use error::{CryptoError, CryptoResult};
pub use key::{generate_random_key, SymmetricKey, KEY_SIZE};
pub use provider::{CryptoProvider, LocalCryptoProvider};
