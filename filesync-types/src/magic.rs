//! Magic metadata: versioned, encrypted annotations attached to a file.
//!
//! The private variant is only readable by the owner; the public variant is
//! shared with everyone who can see the file's collection. Both travel as an
//! [`EncryptedMagicMetadata`] envelope and are held locally as a decrypted
//! [`MagicMetadata`].

use crate::timestamp::Timestamp;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A decrypted magic metadata envelope.
///
/// `version` is bumped by exactly one for every update the server accepts.
/// `count` is the number of keys the caller declares in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicMetadata<T> {
    pub version: u32,
    pub count: u32,
    pub data: T,
}

impl<T> MagicMetadata<T> {
    pub fn new(version: u32, count: u32, data: T) -> Self {
        Self { version, count, data }
    }

    /// Returns the envelope with its version advanced by one, as the server
    /// stores it after accepting this envelope. Fails if the version is
    /// already at its maximum.
    pub fn accepted(self) -> Result<Self> {
        let version = self
            .version
            .checked_add(1)
            .ok_or(Error::VersionOverflow(self.version))?;
        Ok(Self { version, ..self })
    }
}

/// Wire form of a magic metadata envelope: the payload is ciphertext and
/// `header` is the nonce it was sealed with, both base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMagicMetadata {
    pub version: u32,
    pub count: u32,
    pub data: String,
    pub header: String,
}

/// Whether a file is shown in the main view or tucked into the archive.
///
/// Values written by newer clients are kept as [`Visibility::Other`] and
/// written back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Visibility {
    Visible,
    Archived,
    Other(u8),
}

impl From<u8> for Visibility {
    fn from(value: u8) -> Self {
        match value {
            0 => Visibility::Visible,
            1 => Visibility::Archived,
            other => Visibility::Other(other),
        }
    }
}

impl From<Visibility> for u8 {
    fn from(value: Visibility) -> Self {
        match value {
            Visibility::Visible => 0,
            Visibility::Archived => 1,
            Visibility::Other(other) => other,
        }
    }
}

/// Moves `key` out of `map` if its value parses as `T`. A value of another
/// shape stays in `map` so it is written back verbatim.
fn take_typed<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let parsed = T::deserialize(map.get(key)?).ok()?;
    map.remove(key);
    Some(parsed)
}

fn put_typed<T: Serialize>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value.and_then(|v| serde_json::to_value(v).ok()) {
        map.insert(key.to_string(), value);
    }
}

/// Payload of the private magic metadata.
///
/// Keys this client does not know about, and known keys holding a value of
/// an unexpected shape, are kept in `extra` so an update never drops
/// annotations written by another client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct FileMagicProps {
    pub visibility: Option<Visibility>,
    pub extra: Map<String, Value>,
}

impl FileMagicProps {
    /// Number of keys this payload declares.
    pub fn key_count(&self) -> u32 {
        (usize::from(self.visibility.is_some()) + self.extra.len()) as u32
    }
}

impl From<Map<String, Value>> for FileMagicProps {
    fn from(mut map: Map<String, Value>) -> Self {
        let visibility = take_typed(&mut map, "visibility");
        Self {
            visibility,
            extra: map,
        }
    }
}

impl From<FileMagicProps> for Map<String, Value> {
    fn from(props: FileMagicProps) -> Self {
        let mut map = props.extra;
        put_typed(&mut map, "visibility", props.visibility);
        map
    }
}

/// Payload of the public (collection-shared) magic metadata.
///
/// Lenient in the same way as [`FileMagicProps`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct FilePublicMagicProps {
    /// Overrides the file's creation time in every view.
    pub edited_time: Option<Timestamp>,
    /// Overrides the file's title in every view.
    pub edited_name: Option<String>,
    pub caption: Option<String>,
    pub extra: Map<String, Value>,
}

impl FilePublicMagicProps {
    /// Number of keys this payload declares.
    pub fn key_count(&self) -> u32 {
        let known = [
            self.edited_time.is_some(),
            self.edited_name.is_some(),
            self.caption.is_some(),
        ];
        (known.iter().filter(|set| **set).count() + self.extra.len()) as u32
    }
}

impl From<Map<String, Value>> for FilePublicMagicProps {
    fn from(mut map: Map<String, Value>) -> Self {
        Self {
            edited_time: take_typed(&mut map, "editedTime"),
            edited_name: take_typed(&mut map, "editedName"),
            caption: take_typed(&mut map, "caption"),
            extra: map,
        }
    }
}

impl From<FilePublicMagicProps> for Map<String, Value> {
    fn from(props: FilePublicMagicProps) -> Self {
        let mut map = props.extra;
        put_typed(&mut map, "editedTime", props.edited_time);
        put_typed(&mut map, "editedName", props.edited_name);
        put_typed(&mut map, "caption", props.caption);
        map
    }
}
