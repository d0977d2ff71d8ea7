use formstage_model::RecordDraft;
use formstage_types::{ContentId, StagedFile};
use serde::{Deserialize, Serialize};

/// Read-only projection of an edit session handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSnapshot {
    pub record: RecordDraft,
    pub files_to_add: Vec<StagedFile>,
    pub files_to_delete: Vec<ContentId>,
}

impl SaveSnapshot {
    /// Whether the snapshot carries any attachment changes.
    pub fn has_file_changes(&self) -> bool {
        !self.files_to_add.is_empty() || !self.files_to_delete.is_empty()
    }
}
