//! Local storage for the file sync engine.
//!
//! Persists two file tables (normal and hidden) and one "last sync time"
//! cursor per collection per table, on top of a plain key-value backend.
//!
//! # Architecture
//!
//! - [`KvBackend`] is the durable key-value contract. [`SqliteBackend`] is
//!   the on-disk implementation; [`MemoryBackend`] backs tests and
//!   ephemeral sessions.
//! - [`FileStore`] is the table adapter the sync engine talks to. It
//!   serializes records, runs backend calls off the async executor, captures
//!   storage diagnostics when a write fails, and fires the
//!   "local files updated" notification after every normal-table save.
//! - [`LocalFilesEvents`] is the notification port. Listener failures are
//!   logged and isolated from the writer.

mod backend;
mod error;
mod events;
mod file_store;
mod memory;
mod sqlite;

pub use backend::{KvBackend, StorageEstimate};
pub use error::{StorageError, StorageResult};
pub use events::{ListenerId, LocalFilesEvents};
pub use file_store::{cursor_key, table_name, FileStore, FILES_TABLE, HIDDEN_FILES_TABLE};
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
