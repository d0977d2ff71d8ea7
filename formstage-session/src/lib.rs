//! Edit-session orchestration for formstage.
//!
//! The staging engine never performs I/O. This crate supplies the seams to
//! the hosting platform and the glue that drives the engine through a full
//! edit cycle:
//!
//! - **Providers**: async traits for record fetch, object metadata,
//!   picklists, file reading, persistence and file listing
//! - **Session**: [`EditSession`] loads a record, applies edits and
//!   attachments, and saves through the persistence provider
//! - **Panel**: collapsible section state and its status line
//! - **View**: read-only projection of the record for display
//!
//! # Example
//!
//! ```
//! use formstage_model::FormConfig;
//! use formstage_session::{mock::InMemoryBackend, EditSession, Providers};
//! use formstage_types::RecordId;
//! use std::sync::Arc;
//!
//! # futures::executor::block_on(async {
//! let record_id = RecordId::new("001A").unwrap();
//! let backend = Arc::new(InMemoryBackend::new().with_record(record_id.clone(), Default::default()));
//! let session = EditSession::open(record_id, FormConfig::default(), Providers::from_backend(backend))
//!     .await
//!     .unwrap();
//! assert!(!session.can_save());
//! # });
//! ```

mod error;
pub mod mock;
mod panel;
pub mod providers;
mod session;
mod view;

pub use error::{ProviderError, ProviderKind, ProviderResult, SessionError, SessionResult};
pub use panel::{PanelState, StatusTone};
pub use providers::{
    FileHandle, FileListingProvider, FileReadProvider, MetadataProvider, ObjectDescription,
    PersistenceProvider, PicklistOption, PicklistProvider, Providers, RecordFetchProvider,
};
pub use session::EditSession;
pub use view::{FieldRow, FileLink, RecordView};
