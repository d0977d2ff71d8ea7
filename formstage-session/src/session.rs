//! Edit session: drives the staging engine against the providers.
//!
//! Every method that awaits a provider takes `&mut self`, so no other
//! engine operation can interleave while a file read or save is in flight.

use crate::error::{SessionError, SessionResult};
use crate::panel::PanelState;
use crate::providers::{FileHandle, PicklistOption, Providers};
use crate::view::RecordView;
use formstage_engine::FormStagingEngine;
use formstage_model::{FormConfig, FormSchema, ValidationResult};
use formstage_types::{FileKey, RecordId, StagedFile};
use futures::future::try_join_all;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// One user's editing session over one record.
pub struct EditSession {
    record_id: RecordId,
    config: FormConfig,
    providers: Providers,
    engine: FormStagingEngine,
    labels: BTreeMap<String, String>,
    record_type_id: Option<String>,
    options: BTreeMap<String, Vec<PicklistOption>>,
    panel: PanelState,
}

impl EditSession {
    /// Opens a session using the schema described by `config`.
    pub async fn open(
        record_id: RecordId,
        config: FormConfig,
        providers: Providers,
    ) -> SessionResult<Self> {
        let schema = config.to_schema();
        Self::open_with_schema(record_id, config, schema, providers).await
    }

    /// Opens a session with an explicit schema, for fields whose rules cannot
    /// be expressed in configuration.
    ///
    /// Record and file-listing failures abort the open. Metadata and picklist
    /// failures are logged; the form then renders api names and empty option
    /// lists.
    pub async fn open_with_schema(
        record_id: RecordId,
        config: FormConfig,
        schema: FormSchema,
        providers: Providers,
    ) -> SessionResult<Self> {
        let draft = providers.records.fetch(&record_id).await?;
        let files = providers.file_listing.list(&record_id).await?;
        debug!(
            record = %record_id,
            fields = draft.len(),
            files = files.len(),
            "record loaded"
        );

        let mut session = Self {
            record_id,
            config,
            providers,
            engine: FormStagingEngine::load(schema, draft, files),
            labels: BTreeMap::new(),
            record_type_id: None,
            options: BTreeMap::new(),
            panel: PanelState::default(),
        };
        session.load_metadata().await;
        session.sync_panel();
        Ok(session)
    }

    async fn load_metadata(&mut self) {
        let object_type = self.engine.schema().object_type.clone();
        let description = match self.providers.metadata.describe(&object_type).await {
            Ok(description) => description,
            Err(e) => {
                warn!(object = %object_type, error = %e, "object metadata unavailable");
                return;
            }
        };
        self.labels = description.field_labels;
        let record_type_id = description.default_record_type_id;

        for field in &self.config.choice_fields {
            match self.providers.picklists.values(field, &record_type_id).await {
                Ok(values) => {
                    self.options.insert(field.clone(), values);
                }
                Err(e) => warn!(field = %field, error = %e, "picklist values unavailable"),
            }
        }
        self.record_type_id = Some(record_type_id);
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn engine(&self) -> &FormStagingEngine {
        &self.engine
    }

    pub fn validation(&self) -> &ValidationResult {
        self.engine.validation()
    }

    pub fn can_save(&self) -> bool {
        self.engine.can_save()
    }

    /// Display label for a field, falling back to its api name.
    pub fn label<'a>(&'a self, api_name: &'a str) -> &'a str {
        self.labels.get(api_name).map(String::as_str).unwrap_or(api_name)
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn record_type_id(&self) -> Option<&str> {
        self.record_type_id.as_deref()
    }

    /// Options of a choice field; empty when none were loaded.
    pub fn options(&self, api_name: &str) -> &[PicklistOption] {
        self.options.get(api_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PanelState {
        &mut self.panel
    }

    /// Read-only projection of the current draft and stored attachments.
    pub fn view(&self) -> RecordView {
        RecordView::build(
            self.engine.schema(),
            &self.labels,
            self.engine.draft(),
            self.engine.existing_files(),
            &self.config.download_url_prefix,
        )
    }

    // ── Editing ──────────────────────────────────────────────────

    pub fn set_field(&mut self, api_name: &str, value: Value) -> SessionResult<&ValidationResult> {
        self.engine.set_field(api_name, value)?;
        self.sync_panel();
        Ok(self.engine.validation())
    }

    /// Reads every handle, then stages all of them. If any read fails nothing
    /// is staged and the provider error is returned.
    pub async fn attach_files(&mut self, handles: &[FileHandle]) -> SessionResult<Vec<StagedFile>> {
        let reader = &self.providers.file_reader;
        let read = try_join_all(handles.iter().map(|handle| reader.read(handle))).await?;
        let added = self.engine.add_files(read);
        self.sync_panel();
        Ok(added)
    }

    pub fn remove_file(&mut self, key: &FileKey) -> bool {
        let removed = self.engine.remove_file(key);
        self.sync_panel();
        removed
    }

    /// Switches the panel back to the form.
    pub fn edit(&mut self) {
        self.panel.enter_edit_mode();
    }

    // ── Saving ───────────────────────────────────────────────────

    /// Validates with highlighting, persists the snapshot and commits.
    ///
    /// On a persistence failure the draft, staged files and pending deletions
    /// are left as they were so the caller can retry. After a successful
    /// commit the record and file listing are re-fetched. Refresh failures
    /// are logged, not returned, and the panel stays complete.
    pub async fn save(&mut self) -> SessionResult<()> {
        if !self.engine.revalidate(true).can_save {
            self.sync_panel();
            return Err(SessionError::NotReady);
        }

        let snapshot = self.engine.snapshot_for_save();
        info!(
            record = %self.record_id,
            files_to_add = snapshot.files_to_add.len(),
            files_to_delete = snapshot.files_to_delete.len(),
            "saving record"
        );
        if let Err(e) = self.providers.persistence.save(&self.record_id, &snapshot).await {
            warn!(record = %self.record_id, error = %e, "save failed");
            return Err(e.into());
        }

        self.engine.commit_save()?;
        let refreshed = self.refresh().await;
        self.sync_panel();
        if let Err(e) = refreshed {
            warn!(record = %self.record_id, error = %e, "refresh after save failed");
            // Completion stands once the save is committed.
            self.panel.set_complete(true);
        }
        self.panel.enter_view_mode();
        info!(record = %self.record_id, "record saved");
        Ok(())
    }

    /// Re-fetches the stored file listing and the record.
    ///
    /// Both are attempted; whichever succeeds is applied. The first failure,
    /// listing before record, is returned.
    pub async fn refresh(&mut self) -> SessionResult<()> {
        let listed = self.providers.file_listing.list(&self.record_id).await;
        let fetched = self.providers.records.fetch(&self.record_id).await;

        let mut first_error = None;
        match listed {
            Ok(files) => self.engine.replace_existing_files(files),
            Err(e) => first_error = Some(e),
        }
        match fetched {
            Ok(draft) => self.engine.replace_draft(draft),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
        self.sync_panel();

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn sync_panel(&mut self) {
        self.panel.set_complete(self.engine.can_save());
    }
}
