//! Form validation and file staging for formstage.
//!
//! [`FormStagingEngine`] holds the working copy of one record, the files
//! staged during the edit session, the existing files still shown, and the
//! existing files marked for deletion. Every operation is synchronous and
//! performs no I/O; fetching, file reading and persistence belong to the
//! caller (see `formstage-session`).
//!
//! # Save protocol
//!
//! 1. [`FormStagingEngine::can_save`] gates the save button.
//! 2. [`FormStagingEngine::snapshot_for_save`] hands a read-only copy of the
//!    draft and file changes to the persistence layer.
//! 3. Only after persistence succeeds, [`FormStagingEngine::commit_save`]
//!    clears the staged files and pending deletions. On failure nothing is
//!    touched and the caller may retry.
//!
//! # Example
//!
//! ```
//! use formstage_engine::FormStagingEngine;
//! use formstage_model::{FieldSpec, FormSchema};
//! use formstage_types::FileContent;
//! use serde_json::json;
//!
//! let schema = FormSchema::new("Account").with_field(FieldSpec::required("Bank_Name__c"));
//! let mut engine = FormStagingEngine::new(schema);
//! assert!(!engine.can_save());
//!
//! engine.set_field("Bank_Name__c", json!("First Bank")).unwrap();
//! engine.add_files([("statement.pdf", FileContent::new("%PDF"))]);
//! assert!(engine.can_save());
//! ```

mod engine;
mod error;
mod snapshot;
mod validate;

pub use engine::FormStagingEngine;
pub use error::{EngineError, EngineResult};
pub use snapshot::SaveSnapshot;
pub use validate::validate_field;
