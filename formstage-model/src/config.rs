//! Form configuration (TOML).
//!
//! ```toml
//! object_type = "Account"
//! min_files = 1
//! choice_fields = ["Currency__c"]
//!
//! [[fields]]
//! api_name = "Bank_Name__c"
//! required = true
//!
//! [[fields]]
//! api_name = "Routing_Number__c"
//! rule = "routing_number"
//! ```

use crate::field::{FieldRule, FieldSpec, RoutingNumberRule};
use crate::schema::{bank_fields, FormSchema};
use formstage_types::DEFAULT_DOWNLOAD_PREFIX;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_FILE_UPLOAD_LABEL: &str = "Please attach a bank statement, such as a letter from the bank. Payment will not be possible without verification";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("config validation error: {0}")]
    Invalid(String),
}

/// Built-in rules a config can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    RoutingNumber,
}

impl RuleKind {
    pub fn build(self) -> Arc<dyn FieldRule> {
        match self {
            Self::RoutingNumber => Arc::new(RoutingNumberRule),
        }
    }
}

/// One `[[fields]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub api_name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleKind>,
}

impl FieldConfig {
    fn to_spec(&self) -> FieldSpec {
        let spec = if self.required {
            FieldSpec::required(&self.api_name)
        } else {
            FieldSpec::optional(&self.api_name)
        };
        match self.rule {
            Some(kind) => spec.with_shared_rule(kind.build()),
            None => spec,
        }
    }
}

/// Everything needed to set up an edit session for one record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    pub object_type: String,
    /// Prompt shown above the attachment picker.
    #[serde(default = "default_upload_label")]
    pub file_upload_label: String,
    /// Prefix joined with a content id to build a download link.
    #[serde(default = "default_download_prefix")]
    pub download_url_prefix: String,
    #[serde(default = "default_min_files")]
    pub min_files: usize,
    /// Fields whose options come from the picklist provider.
    #[serde(default)]
    pub choice_fields: Vec<String>,
    pub fields: Vec<FieldConfig>,
}

fn default_upload_label() -> String {
    DEFAULT_FILE_UPLOAD_LABEL.to_string()
}

fn default_download_prefix() -> String {
    DEFAULT_DOWNLOAD_PREFIX.to_string()
}

fn default_min_files() -> usize {
    1
}

impl Default for FormConfig {
    /// The bank-details form.
    fn default() -> Self {
        use bank_fields::*;

        let field = |api_name: &str, required: bool| FieldConfig {
            api_name: api_name.to_string(),
            required,
            rule: None,
        };
        Self {
            object_type: OBJECT_TYPE.to_string(),
            file_upload_label: default_upload_label(),
            download_url_prefix: default_download_prefix(),
            min_files: default_min_files(),
            choice_fields: vec![CURRENCY.to_string(), BANK_COUNTRY.to_string()],
            fields: vec![
                field(REGISTRATION_NUMBER, false),
                field(BANK_NAME, true),
                field(BANK_COUNTRY, true),
                field(BANK_ADDRESS, false),
                FieldConfig {
                    rule: Some(RuleKind::RoutingNumber),
                    ..field(ROUTING_NUMBER, false)
                },
                field(ACCOUNT_NUMBER, true),
                field(SWIFT_CODE, true),
                field(IBAN, true),
                field(CURRENCY, true),
            ],
        }
    }
}

impl FormConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Checks structural constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.object_type.trim().is_empty() {
            return Err(ConfigError::Invalid("object_type is required".into()));
        }
        if self.fields.is_empty() {
            return Err(ConfigError::Invalid("at least one field is required".into()));
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.api_name.trim().is_empty() {
                return Err(ConfigError::Invalid("field api_name must not be blank".into()));
            }
            if !seen.insert(field.api_name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate field api_name '{}'",
                    field.api_name
                )));
            }
        }
        if let Some(unknown) = self.choice_fields.iter().find(|c| !seen.contains(c.as_str())) {
            return Err(ConfigError::Invalid(format!(
                "choice field '{unknown}' is not a declared field"
            )));
        }
        Ok(())
    }

    /// Builds the runtime schema.
    pub fn to_schema(&self) -> FormSchema {
        let schema = FormSchema::new(&self.object_type).with_min_files(self.min_files);
        self.fields
            .iter()
            .fold(schema, |schema, field| schema.with_field(field.to_spec()))
    }
}
