//! Field and form model for formstage.
//!
//! Defines the runtime-supplied description of an editable record:
//! - [`FieldSpec`]: one editable field, whether it is required, and its optional [`FieldRule`]
//! - [`FormSchema`]: the ordered field table plus the minimum attachment count
//! - [`RecordDraft`]: the working copy of a record's values (copy-on-write)
//! - [`FieldStatus`] / [`ValidationResult`]: per-field verdicts and the aggregate save signal
//! - [`FormConfig`]: TOML configuration that builds a [`FormSchema`]
//!
//! Nothing here performs I/O except [`FormConfig::load`].

mod config;
mod draft;
mod field;
mod schema;
mod validation;

pub use config::{ConfigError, FieldConfig, FormConfig, RuleKind, DEFAULT_FILE_UPLOAD_LABEL};
pub use draft::{is_blank, RecordDraft};
pub use field::{FieldRule, FieldSpec, FieldVerdict, RoutingNumberRule, ROUTING_NUMBER_REASON};
pub use schema::{bank_fields, FormSchema};
pub use validation::{FieldStatus, ValidationResult, REQUIRED_REASON};
