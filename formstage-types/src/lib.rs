//! Core type definitions for formstage.
//!
//! This crate defines the plain data shared by every other crate:
//! - Record, content and staged-file identifiers
//! - Attachment types: files staged in the current edit session and
//!   references to files the platform already stores
//!
//! Field definitions and validation live in `formstage-model`.

mod files;
mod ids;

pub use files::{ExistingFileRef, FileContent, FileKey, StagedFile, DEFAULT_DOWNLOAD_PREFIX};
pub use ids::{ContentId, RecordId, StagedFileId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid base64 content: {0}")]
    InvalidContent(#[from] base64::DecodeError),

    #[error("not a base64 data URL: {0}")]
    InvalidDataUrl(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
