//! Error types for the staging engine.
//!
//! Field validation failures are not errors: they are reported through
//! `ValidationResult` and only block saving.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Caller/engine protocol violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The api name is not part of the form's schema.
    #[error("unknown field: {api_name}")]
    UnknownField { api_name: String },

    /// `commit_save` was called while the form is not saveable.
    #[error("commit requested while the form cannot be saved")]
    PrematureCommit,
}
