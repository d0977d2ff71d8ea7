//! Error types for the session layer.

use formstage_engine::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Which collaborator failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    RecordFetch,
    Metadata,
    Picklist,
    FileRead,
    Persistence,
    FileListing,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RecordFetch => "record fetch",
            Self::Metadata => "metadata",
            Self::Picklist => "picklist",
            Self::FileRead => "file read",
            Self::Persistence => "persistence",
            Self::FileListing => "file listing",
        };
        f.write_str(name)
    }
}

/// A failure reported by an external provider. Passed upward unchanged;
/// the session never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{provider} provider failed: {message}")]
pub struct ProviderError {
    pub provider: ProviderKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
        }
    }
}

/// Errors that can occur in session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An external provider failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The caller broke the engine protocol.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Save was requested while fields are invalid or attachments missing.
    #[error("form is not ready to save")]
    NotReady,
}
