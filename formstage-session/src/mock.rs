//! In-memory providers for tests and prototyping.
//!
//! [`InMemoryBackend`] implements every provider trait over one shared
//! state. Individual providers can be switched to fail to exercise error
//! paths.

use crate::error::{ProviderError, ProviderKind, ProviderResult};
use crate::providers::{
    FileHandle, FileListingProvider, FileReadProvider, MetadataProvider, ObjectDescription,
    PersistenceProvider, PicklistOption, PicklistProvider, RecordFetchProvider,
};
use async_trait::async_trait;
use formstage_engine::SaveSnapshot;
use formstage_model::RecordDraft;
use formstage_types::{ContentId, ExistingFileRef, FileContent, RecordId};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct State {
    records: HashMap<RecordId, RecordDraft>,
    files: HashMap<RecordId, Vec<ExistingFileRef>>,
    /// Persisted bytes by content id.
    contents: HashMap<ContentId, FileContent>,
    /// Picked-but-unread files by handle uri.
    blobs: HashMap<String, FileContent>,
    description: ObjectDescription,
    picklists: HashMap<String, Vec<PicklistOption>>,
    failing: HashSet<ProviderKind>,
    saves: Vec<(RecordId, SaveSnapshot)>,
    next_content: u64,
}

/// A platform stand-in that keeps everything in memory.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, provider: ProviderKind) -> ProviderResult<()> {
        if self.state().failing.contains(&provider) {
            return Err(ProviderError::new(provider, "injected failure"));
        }
        Ok(())
    }

    // ── Builders ─────────────────────────────────────────────────

    #[must_use]
    pub fn with_record(self, record_id: RecordId, draft: RecordDraft) -> Self {
        self.state().records.insert(record_id, draft);
        self
    }

    #[must_use]
    pub fn with_existing_file(self, record_id: RecordId, file: ExistingFileRef) -> Self {
        self.state().files.entry(record_id).or_default().push(file);
        self
    }

    #[must_use]
    pub fn with_label(self, api_name: &str, label: &str) -> Self {
        self.state()
            .description
            .field_labels
            .insert(api_name.to_string(), label.to_string());
        self
    }

    #[must_use]
    pub fn with_record_type(self, record_type_id: &str) -> Self {
        self.state().description.default_record_type_id = record_type_id.to_string();
        self
    }

    #[must_use]
    pub fn with_picklist(self, api_name: &str, options: Vec<PicklistOption>) -> Self {
        self.state().picklists.insert(api_name.to_string(), options);
        self
    }

    /// Registers a picked file that [`FileReadProvider::read`] can resolve.
    #[must_use]
    pub fn with_blob(self, uri: &str, content: impl Into<FileContent>) -> Self {
        self.state().blobs.insert(uri.to_string(), content.into());
        self
    }

    // ── Failure injection ────────────────────────────────────────

    pub fn fail(&self, provider: ProviderKind) {
        self.state().failing.insert(provider);
    }

    pub fn recover(&self, provider: ProviderKind) {
        self.state().failing.remove(&provider);
    }

    // ── Inspection ───────────────────────────────────────────────

    /// Every successful save, oldest first.
    pub fn saves(&self) -> Vec<(RecordId, SaveSnapshot)> {
        self.state().saves.clone()
    }

    pub fn record(&self, record_id: &RecordId) -> Option<RecordDraft> {
        self.state().records.get(record_id).cloned()
    }

    pub fn files(&self, record_id: &RecordId) -> Vec<ExistingFileRef> {
        self.state().files.get(record_id).cloned().unwrap_or_default()
    }

    pub fn content(&self, content_id: &ContentId) -> Option<FileContent> {
        self.state().contents.get(content_id).cloned()
    }
}

#[async_trait]
impl RecordFetchProvider for InMemoryBackend {
    async fn fetch(&self, record_id: &RecordId) -> ProviderResult<RecordDraft> {
        self.check(ProviderKind::RecordFetch)?;
        self.state().records.get(record_id).cloned().ok_or_else(|| {
            ProviderError::new(ProviderKind::RecordFetch, format!("no record {record_id}"))
        })
    }
}

#[async_trait]
impl MetadataProvider for InMemoryBackend {
    async fn describe(&self, _object_type: &str) -> ProviderResult<ObjectDescription> {
        self.check(ProviderKind::Metadata)?;
        Ok(self.state().description.clone())
    }
}

#[async_trait]
impl PicklistProvider for InMemoryBackend {
    async fn values(
        &self,
        field_api_name: &str,
        _record_type_id: &str,
    ) -> ProviderResult<Vec<PicklistOption>> {
        self.check(ProviderKind::Picklist)?;
        Ok(self
            .state()
            .picklists
            .get(field_api_name)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl FileReadProvider for InMemoryBackend {
    async fn read(&self, handle: &FileHandle) -> ProviderResult<(String, FileContent)> {
        self.check(ProviderKind::FileRead)?;
        let content = self.state().blobs.get(&handle.uri).cloned().ok_or_else(|| {
            ProviderError::new(ProviderKind::FileRead, format!("cannot read {}", handle.uri))
        })?;
        Ok((handle.name.clone(), content))
    }
}

#[async_trait]
impl PersistenceProvider for InMemoryBackend {
    async fn save(&self, record_id: &RecordId, snapshot: &SaveSnapshot) -> ProviderResult<()> {
        self.check(ProviderKind::Persistence)?;
        let mut guard = self.state();
        let state = &mut *guard;

        state.records.insert(record_id.clone(), snapshot.record.clone());

        let listing = state.files.entry(record_id.clone()).or_default();
        listing.retain(|f| !snapshot.files_to_delete.contains(&f.content_id));
        for id in &snapshot.files_to_delete {
            state.contents.remove(id);
        }
        for file in &snapshot.files_to_add {
            state.next_content += 1;
            let content_id = ContentId::new(format!("069{:012}", state.next_content))
                .map_err(|e| ProviderError::new(ProviderKind::Persistence, e.to_string()))?;
            state.contents.insert(content_id.clone(), file.content.clone());
            listing.push(ExistingFileRef::new(content_id, file.file_name.clone()));
        }

        state.saves.push((record_id.clone(), snapshot.clone()));
        Ok(())
    }
}

#[async_trait]
impl FileListingProvider for InMemoryBackend {
    async fn list(&self, record_id: &RecordId) -> ProviderResult<Vec<ExistingFileRef>> {
        self.check(ProviderKind::FileListing)?;
        Ok(self.files(record_id))
    }
}

