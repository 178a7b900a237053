//! Core type definitions for the file sync engine.
//!
//! This crate defines the data model shared by every layer:
//! - File and collection identifiers
//! - Server-assigned `updationTime` timestamps
//! - File records, in their encrypted wire form and decrypted local form
//! - Versioned magic metadata envelopes
//!
//! Field names serialize in the server's camelCase form so the same types
//! are used on the wire and in the local store.

mod collection;
mod file;
mod ids;
mod magic;
mod timestamp;

pub use collection::{Collection, SyncKind};
pub use file::{EncryptedFileRecord, EncryptedMetadata, FileAttributes, FileMetadata, FileRecord};
pub use ids::{CollectionId, FileId};
pub use magic::{
    EncryptedMagicMetadata, FileMagicProps, FilePublicMagicProps, MagicMetadata, Visibility,
};
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid identifier: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("magic metadata version {0} cannot be advanced")]
    VersionOverflow(u32),
}
