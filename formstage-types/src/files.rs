//! Attachment types.
//!
//! A file is either staged (added during the current edit session, held in
//! memory) or existing (already persisted, referenced by its content id).

use crate::{ContentId, StagedFileId};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// URL prefix the platform serves persisted files from.
pub const DEFAULT_DOWNLOAD_PREFIX: &str = "/sfc/servlet.shepherd/document/download/";

/// Raw file bytes. Serializes as standard base64, the shape persistence
/// providers receive.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FileContent(Vec<u8>);

impl FileContent {
    /// Wraps raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decodes standard base64 text (without a `data:` URL header).
    pub fn from_base64(encoded: &str) -> crate::Result<Self> {
        Ok(Self(STANDARD.decode(encoded.trim())?))
    }

    /// Decodes a `data:<mime>;base64,<payload>` URL, as produced by browser
    /// file readers.
    pub fn from_data_url(url: &str) -> crate::Result<Self> {
        match url.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
            Some((header, payload)) if header.ends_with(";base64") => Self::from_base64(payload),
            _ => Err(crate::Error::InvalidDataUrl(url.chars().take(32).collect())),
        }
    }

    /// Encodes the bytes as standard base64.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Byte length of the payload.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Payloads can be megabytes; print only the size.
impl fmt::Debug for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileContent({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for FileContent {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Serialize for FileContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for FileContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// A file added during the current edit session but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedFile {
    /// Local id; never sent to the platform as a content id.
    pub id: StagedFileId,
    pub file_name: String,
    #[serde(rename = "base64")]
    pub content: FileContent,
}

impl StagedFile {
    /// Stages a file under a freshly minted id.
    pub fn new(file_name: impl Into<String>, content: impl Into<FileContent>) -> Self {
        Self {
            id: StagedFileId::new(),
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// A file the platform already stores for the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingFileRef {
    pub content_id: ContentId,
    /// Display title.
    pub label: String,
}

impl ExistingFileRef {
    pub fn new(content_id: ContentId, label: impl Into<String>) -> Self {
        Self {
            content_id,
            label: label.into(),
        }
    }

    /// Download link for this file under the given URL prefix.
    #[must_use]
    pub fn download_url(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.content_id)
    }
}

/// Identifies a file for removal: either a staged entry or an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FileKey {
    Staged(StagedFileId),
    Existing(ContentId),
}

impl From<&StagedFile> for FileKey {
    fn from(file: &StagedFile) -> Self {
        Self::Staged(file.id)
    }
}

impl From<&ExistingFileRef> for FileKey {
    fn from(file: &ExistingFileRef) -> Self {
        Self::Existing(file.content_id.clone())
    }
}
