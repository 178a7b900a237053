//! Collections and the sync namespaces they are synced into.

use crate::ids::CollectionId;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A collection as supplied by the caller for a sync pass.
///
/// `updation_time` is the server's last-modified marker for the collection
/// as a whole, not for any single file in it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    /// Decrypted collection key, base64 encoded.
    pub key: String,
    pub updation_time: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Collection {
    pub fn new(id: CollectionId, key: impl Into<String>, updation_time: Timestamp) -> Self {
        Self {
            id,
            key: key.into(),
            updation_time,
            name: None,
        }
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("id", &self.id)
            .field("key", &"[REDACTED]")
            .field("updation_time", &self.updation_time)
            .field("name", &self.name)
            .finish()
    }
}

/// Which local table and cursor namespace a sync pass works against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncKind {
    /// Regular files, shown in the main view.
    Normal,
    /// Files of hidden collections.
    Hidden,
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncKind::Normal => write!(f, "normal"),
            SyncKind::Hidden => write!(f, "hidden"),
        }
    }
}
