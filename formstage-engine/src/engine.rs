//! The staging state machine.

use crate::error::{EngineError, EngineResult};
use crate::snapshot::SaveSnapshot;
use crate::validate::validate_field;
use formstage_model::{FormSchema, RecordDraft, ValidationResult};
use formstage_types::{ContentId, ExistingFileRef, FileContent, FileKey, StagedFile};
use serde_json::Value;
use tracing::debug;

/// Working state of one edit session.
#[derive(Debug, Clone)]
pub struct FormStagingEngine {
    schema: FormSchema,
    draft: RecordDraft,
    /// Files added this session, in the order they were added.
    staged: Vec<StagedFile>,
    /// Persisted files still shown to the user.
    existing: Vec<ExistingFileRef>,
    /// Persisted files to delete on the next save. Kept in insertion order,
    /// duplicates collapse.
    pending_deletions: Vec<ContentId>,
    validation: ValidationResult,
}

impl FormStagingEngine {
    /// Creates an engine with an empty draft and no files.
    pub fn new(schema: FormSchema) -> Self {
        Self::load(schema, RecordDraft::new(), Vec::new())
    }

    /// Creates an engine from a fetched record and its existing attachments.
    /// Runs an advisory (non-highlighted) validation pass.
    pub fn load(schema: FormSchema, draft: RecordDraft, existing: Vec<ExistingFileRef>) -> Self {
        let mut engine = Self {
            schema,
            draft,
            staged: Vec::new(),
            existing: Vec::new(),
            pending_deletions: Vec::new(),
            validation: ValidationResult::default(),
        };
        engine.set_existing(existing);
        engine.revalidate(false);
        engine
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn draft(&self) -> &RecordDraft {
        &self.draft
    }

    pub fn field_value(&self, api_name: &str) -> Option<&Value> {
        self.draft.get(api_name)
    }

    pub fn staged_files(&self) -> &[StagedFile] {
        &self.staged
    }

    pub fn existing_files(&self) -> &[ExistingFileRef] {
        &self.existing
    }

    pub fn pending_deletions(&self) -> &[ContentId] {
        &self.pending_deletions
    }

    /// The most recently computed validation outcome.
    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    /// Attachments that will exist after a save: staged plus shown existing.
    /// Existing files marked for deletion are already hidden.
    pub fn file_count(&self) -> usize {
        self.staged.len() + self.existing.len()
    }

    // ── Field editing ────────────────────────────────────────────

    /// Replaces one field value and re-validates it with highlighting.
    pub fn set_field(&mut self, api_name: &str, value: Value) -> EngineResult<&ValidationResult> {
        let spec = self
            .schema
            .field(api_name)
            .ok_or_else(|| EngineError::UnknownField {
                api_name: api_name.to_string(),
            })?;

        let status = validate_field(spec, &value, true);
        self.draft = self.draft.with_field(api_name, value);
        debug!(field = api_name, valid = status.is_valid, "field updated");

        match self
            .validation
            .fields
            .iter_mut()
            .find(|s| s.api_name == api_name)
        {
            Some(slot) => *slot = status,
            None => self.validation.fields.push(status),
        }
        self.refresh_aggregate();
        Ok(&self.validation)
    }

    /// Re-checks every field. A highlighted pass is what the UI runs when the
    /// user asks to save; the advisory pass runs on load.
    pub fn revalidate(&mut self, highlight: bool) -> &ValidationResult {
        self.validation.fields = self
            .schema
            .fields
            .iter()
            .map(|spec| validate_field(spec, self.draft.value_or_null(&spec.api_name), highlight))
            .collect();
        self.refresh_aggregate();
        &self.validation
    }

    /// Swaps in a freshly fetched record and re-validates without highlighting.
    pub fn replace_draft(&mut self, draft: RecordDraft) {
        self.draft = draft;
        self.revalidate(false);
    }

    // ── Attachments ──────────────────────────────────────────────

    /// Stages files in the given order. Same-named files stay distinct.
    /// Returns the entries that were created.
    pub fn add_files<I, N, C>(&mut self, files: I) -> Vec<StagedFile>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<FileContent>,
    {
        let added: Vec<StagedFile> = files
            .into_iter()
            .map(|(name, content)| StagedFile::new(name, content))
            .collect();
        debug!(count = added.len(), "files staged");
        self.staged.extend(added.iter().cloned());
        self.refresh_aggregate();
        added
    }

    /// Removes a file from view.
    ///
    /// A staged file is dropped outright. An existing file is hidden and its
    /// content id queued for deletion on the next save. Returns `false` when
    /// the key matches nothing.
    pub fn remove_file(&mut self, key: &FileKey) -> bool {
        let removed = match key {
            FileKey::Staged(id) => {
                let before = self.staged.len();
                self.staged.retain(|f| f.id != *id);
                self.staged.len() != before
            }
            FileKey::Existing(content_id) => {
                match self.existing.iter().position(|f| f.content_id == *content_id) {
                    Some(index) => {
                        self.existing.remove(index);
                        if !self.pending_deletions.contains(content_id) {
                            self.pending_deletions.push(content_id.clone());
                        }
                        true
                    }
                    None => false,
                }
            }
        };

        if removed {
            debug!(?key, "file removed");
            self.refresh_aggregate();
        } else {
            debug!(?key, "remove_file matched nothing");
        }
        removed
    }

    /// Replaces the existing-file listing, e.g. after a refresh.
    ///
    /// Files still queued for deletion stay hidden. Queued ids that no longer
    /// appear in the listing are dropped from the queue.
    pub fn replace_existing_files(&mut self, files: Vec<ExistingFileRef>) {
        self.pending_deletions
            .retain(|id| files.iter().any(|f| f.content_id == *id));
        self.set_existing(files);
        self.refresh_aggregate();
    }

    fn set_existing(&mut self, files: Vec<ExistingFileRef>) {
        let mut shown: Vec<ExistingFileRef> = Vec::with_capacity(files.len());
        for file in files {
            if self.pending_deletions.contains(&file.content_id)
                || shown.iter().any(|f| f.content_id == file.content_id)
            {
                continue;
            }
            shown.push(file);
        }
        self.existing = shown;
    }

    // ── Save protocol ────────────────────────────────────────────

    /// True iff every field passes (required fields non-blank, rules hold)
    /// and enough attachments are present.
    pub fn can_save(&self) -> bool {
        self.files_present() && self.fields_valid()
    }

    fn files_present(&self) -> bool {
        self.file_count() >= self.schema.min_files
    }

    fn fields_valid(&self) -> bool {
        self.schema.fields.iter().all(|spec| {
            validate_field(spec, self.draft.value_or_null(&spec.api_name), false).is_valid
        })
    }

    /// Copies out everything persistence needs. Does not change state.
    pub fn snapshot_for_save(&self) -> SaveSnapshot {
        SaveSnapshot {
            record: self.draft.clone(),
            files_to_add: self.staged.clone(),
            files_to_delete: self.pending_deletions.clone(),
        }
    }

    /// Clears staged files and pending deletions once persistence succeeded.
    pub fn commit_save(&mut self) -> EngineResult<()> {
        if !self.can_save() {
            return Err(EngineError::PrematureCommit);
        }
        debug!(
            added = self.staged.len(),
            deleted = self.pending_deletions.len(),
            "save committed"
        );
        self.staged.clear();
        self.pending_deletions.clear();
        self.refresh_aggregate();
        Ok(())
    }

    /// Discards the session: empty draft, no files.
    pub fn reset(&mut self) {
        self.draft = RecordDraft::new();
        self.staged.clear();
        self.existing.clear();
        self.pending_deletions.clear();
        self.revalidate(false);
    }

    fn refresh_aggregate(&mut self) {
        self.validation.files_present = self.files_present();
        self.validation.can_save = self.can_save();
    }
}
