//! Provider seams to the hosting platform.
//!
//! Each trait covers one collaborator so a platform adapter can implement
//! only what it owns. All calls are async; the session awaits each one
//! before touching the engine again.

use crate::error::ProviderResult;
use async_trait::async_trait;
use formstage_engine::SaveSnapshot;
use formstage_model::RecordDraft;
use formstage_types::{ExistingFileRef, FileContent, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Field labels and the default record type of an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescription {
    /// Api name → display label.
    pub field_labels: BTreeMap<String, String>,
    pub default_record_type_id: String,
}

/// One option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicklistOption {
    pub label: String,
    pub value: String,
}

impl PicklistOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A platform reference to a user-picked file that has not been read yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle {
    /// File name as picked by the user.
    pub name: String,
    /// Opaque locator understood by the [`FileReadProvider`].
    pub uri: String,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
        }
    }
}

/// Returns the current field values of a record.
#[async_trait]
pub trait RecordFetchProvider: Send + Sync {
    async fn fetch(&self, record_id: &RecordId) -> ProviderResult<RecordDraft>;
}

/// Describes an object type: field labels and default record type.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn describe(&self, object_type: &str) -> ProviderResult<ObjectDescription>;
}

/// Enumerated options for choice fields.
#[async_trait]
pub trait PicklistProvider: Send + Sync {
    async fn values(
        &self,
        field_api_name: &str,
        record_type_id: &str,
    ) -> ProviderResult<Vec<PicklistOption>>;
}

/// Turns a picked file into its name and bytes.
#[async_trait]
pub trait FileReadProvider: Send + Sync {
    async fn read(&self, handle: &FileHandle) -> ProviderResult<(String, FileContent)>;
}

/// Commits a record and its attachment changes atomically.
#[async_trait]
pub trait PersistenceProvider: Send + Sync {
    async fn save(&self, record_id: &RecordId, snapshot: &SaveSnapshot) -> ProviderResult<()>;
}

/// Lists the attachments already stored for a record.
#[async_trait]
pub trait FileListingProvider: Send + Sync {
    async fn list(&self, record_id: &RecordId) -> ProviderResult<Vec<ExistingFileRef>>;
}

/// The full set of collaborators a session needs.
#[derive(Clone)]
pub struct Providers {
    pub records: Arc<dyn RecordFetchProvider>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub picklists: Arc<dyn PicklistProvider>,
    pub file_reader: Arc<dyn FileReadProvider>,
    pub persistence: Arc<dyn PersistenceProvider>,
    pub file_listing: Arc<dyn FileListingProvider>,
}

impl Providers {
    /// Uses one backend for every seam.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: RecordFetchProvider
            + MetadataProvider
            + PicklistProvider
            + FileReadProvider
            + PersistenceProvider
            + FileListingProvider
            + 'static,
    {
        Self {
            records: backend.clone(),
            metadata: backend.clone(),
            picklists: backend.clone(),
            file_reader: backend.clone(),
            persistence: backend.clone(),
            file_listing: backend,
        }
    }
}
