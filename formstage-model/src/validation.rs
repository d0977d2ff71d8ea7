use crate::field::FieldVerdict;
use serde::{Deserialize, Serialize};

/// Reason reported for a required field left blank.
pub const REQUIRED_REASON: &str = "Complete this field.";

/// Validation outcome for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatus {
    pub api_name: String,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Whether the UI should display this outcome. Advisory passes (initial
    /// load) compute the verdict without surfacing it.
    pub highlighted: bool,
}

impl FieldStatus {
    pub fn new(api_name: impl Into<String>, verdict: FieldVerdict, highlighted: bool) -> Self {
        let (is_valid, reason) = match verdict {
            FieldVerdict::Valid => (true, None),
            FieldVerdict::Invalid(reason) => (false, Some(reason)),
        };
        Self {
            api_name: api_name.into(),
            is_valid,
            reason,
            highlighted,
        }
    }

    pub fn verdict(&self) -> FieldVerdict {
        match &self.reason {
            Some(reason) if !self.is_valid => FieldVerdict::Invalid(reason.clone()),
            _ => FieldVerdict::Valid,
        }
    }

    /// The message to show next to the field, if any.
    pub fn visible_error(&self) -> Option<&str> {
        if self.highlighted && !self.is_valid {
            self.reason.as_deref()
        } else {
            None
        }
    }
}

/// Per-field outcomes in schema order plus the aggregate save signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub fields: Vec<FieldStatus>,
    /// At least the schema's minimum number of attachments is present.
    pub files_present: bool,
    pub can_save: bool,
}

impl ValidationResult {
    pub fn field(&self, api_name: &str) -> Option<&FieldStatus> {
        self.fields.iter().find(|s| s.api_name == api_name)
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = &FieldStatus> {
        self.fields.iter().filter(|s| !s.is_valid)
    }

    /// `(api_name, reason)` pairs the UI should currently display.
    pub fn visible_errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter_map(|s| s.visible_error().map(|r| (s.api_name.as_str(), r)))
    }

    pub fn all_fields_valid(&self) -> bool {
        self.fields.iter().all(|s| s.is_valid)
    }
}
