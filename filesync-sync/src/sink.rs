//! Live view sink fed with progressive sync results.

use filesync_types::FileRecord;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Receives a transformation of the currently displayed file set.
///
/// The engine never reads the displayed set directly; it hands the sink a
/// function from the current files to the new ones.
pub trait SetFiles: Send + Sync {
    fn set_files(&self, update: &dyn Fn(&[FileRecord]) -> Vec<FileRecord>);
}

/// A sink that holds the latest file set in memory.
#[derive(Debug, Default)]
pub struct LiveFiles {
    files: Mutex<Vec<FileRecord>>,
    updates: AtomicUsize,
}

impl LiveFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already displayed set.
    pub fn with_files(files: Vec<FileRecord>) -> Self {
        Self {
            files: Mutex::new(files),
            updates: AtomicUsize::new(0),
        }
    }

    /// Copy of the current set.
    pub fn snapshot(&self) -> Vec<FileRecord> {
        self.files.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of updates applied so far.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl SetFiles for LiveFiles {
    fn set_files(&self, update: &dyn Fn(&[FileRecord]) -> Vec<FileRecord>) {
        let mut files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        *files = update(&files);
        self.updates.fetch_add(1, Ordering::SeqCst);
    }
}
