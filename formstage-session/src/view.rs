use formstage_model::{FormSchema, RecordDraft};
use formstage_types::{ContentId, ExistingFileRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One labelled value of the read-only view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRow {
    pub api_name: String,
    pub label: String,
    pub value: Value,
}

/// A downloadable attachment of the read-only view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLink {
    pub label: String,
    pub content_id: ContentId,
    pub download_url: String,
}

/// Read-only projection of a record: schema fields in order with their
/// labels, plus download links for stored attachments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    pub rows: Vec<FieldRow>,
    pub files: Vec<FileLink>,
}

impl RecordView {
    /// Builds the view. Fields without a metadata label show their api name;
    /// fields missing from the record show null.
    pub fn build(
        schema: &FormSchema,
        labels: &BTreeMap<String, String>,
        draft: &RecordDraft,
        files: &[ExistingFileRef],
        download_prefix: &str,
    ) -> Self {
        let rows = schema
            .fields
            .iter()
            .map(|spec| FieldRow {
                api_name: spec.api_name.clone(),
                label: labels
                    .get(&spec.api_name)
                    .cloned()
                    .unwrap_or_else(|| spec.api_name.clone()),
                value: draft.value_or_null(&spec.api_name).clone(),
            })
            .collect();
        let files = files
            .iter()
            .map(|file| FileLink {
                label: file.label.clone(),
                content_id: file.content_id.clone(),
                download_url: file.download_url(download_prefix),
            })
            .collect();
        Self { rows, files }
    }

    pub fn row(&self, api_name: &str) -> Option<&FieldRow> {
        self.rows.iter().find(|r| r.api_name == api_name)
    }
}
