//! "Local files updated" notification port.
//!
//! Listeners are stored as `Arc<dyn Fn>` so a snapshot can be taken before
//! emitting: a listener added or removed during an emission only affects the
//! next one. The registry lock is never held while a listener runs.
//!
//! A listener that returns an error or panics is logged and skipped; the
//! remaining listeners still run and the emitter never fails.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::error;

/// Handle returned by [`LocalFilesEvents::on`].
pub type ListenerId = u64;

type Listener = dyn Fn() -> anyhow::Result<()> + Send + Sync;

/// Registry of listeners notified after the normal file table is saved.
pub struct LocalFilesEvents {
    listeners: Mutex<Vec<(ListenerId, Arc<Listener>)>>,
    next_id: AtomicU64,
}

impl LocalFilesEvents {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers a listener.
    pub fn on(&self, listener: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, Arc::new(listener)));
        }
        id
    }

    /// Removes a listener. Unknown ids are ignored.
    pub fn off(&self, id: ListenerId) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|(lid, _)| *lid != id);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notifies every listener. Returns how many of them failed.
    pub fn emit_local_files_updated(&self) -> usize {
        let snapshot: Vec<Arc<Listener>> = match self.listeners.lock() {
            Ok(listeners) => listeners.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(_) => return 0,
        };

        let mut failures = 0;
        for listener in snapshot {
            match catch_unwind(AssertUnwindSafe(|| listener())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failures += 1;
                    error!(error = %e, "error in local files updated handler");
                }
                Err(_) => {
                    failures += 1;
                    error!("local files updated handler panicked");
                }
            }
        }
        failures
    }
}

impl Default for LocalFilesEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LocalFilesEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFilesEvents")
            .field("listeners", &self.len())
            .finish()
    }
}
