//! Server timestamps.
//!
//! The server stamps every file and collection change with an
//! `updationTime` in microseconds since the Unix epoch. The client never
//! generates these for ordering purposes; it only compares and stores them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Microseconds since the Unix epoch, as assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The epoch. Used as the cursor of a collection that was never synced.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from raw microseconds.
    #[must_use]
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Returns the raw microseconds.
    #[must_use]
    pub const fn as_micros(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Timestamp {
    fn from(micros: i64) -> Self {
        Self(micros)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
