use formstage_model::{ConfigError, FormConfig, RuleKind, DEFAULT_FILE_UPLOAD_LABEL};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;

const CONTACT_FORM: &str = r#"
object_type = "Contact"
min_files = 2
choice_fields = ["Country__c"]

[[fields]]
api_name = "LastName"
required = true

[[fields]]
api_name = "Country__c"

[[fields]]
api_name = "Routing_Number__c"
rule = "routing_number"
"#;

#[test]
fn parses_full_document() {
    let config = FormConfig::from_toml_str(CONTACT_FORM).unwrap();
    assert_eq!(config.object_type, "Contact");
    assert_eq!(config.min_files, 2);
    assert_eq!(config.choice_fields, vec!["Country__c".to_string()]);
    assert_eq!(config.fields.len(), 3);
    assert!(config.fields[0].required);
    assert!(!config.fields[1].required);
    assert_eq!(config.fields[2].rule, Some(RuleKind::RoutingNumber));
}

#[test]
fn applies_defaults() {
    let config = FormConfig::from_toml_str(
        r#"
object_type = "Account"

[[fields]]
api_name = "Name"
"#,
    )
    .unwrap();
    assert_eq!(config.min_files, 1);
    assert_eq!(config.file_upload_label, DEFAULT_FILE_UPLOAD_LABEL);
    assert_eq!(
        config.download_url_prefix,
        "/sfc/servlet.shepherd/document/download/"
    );
    assert!(config.choice_fields.is_empty());
}

#[test]
fn builds_schema() {
    let schema = FormConfig::from_toml_str(CONTACT_FORM).unwrap().to_schema();
    assert_eq!(schema.object_type, "Contact");
    assert_eq!(schema.min_files, 2);
    let routing = schema.field("Routing_Number__c").unwrap();
    assert!(!routing.rule.as_ref().unwrap().check(&json!("12")).is_valid());
}

#[test]
fn rejects_unknown_rule() {
    let err = FormConfig::from_toml_str(
        r#"
object_type = "Account"

[[fields]]
api_name = "Name"
rule = "luhn"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::TomlDeserialize(_)));
}

#[test]
fn rejects_duplicate_fields() {
    let err = FormConfig::from_toml_str(
        r#"
object_type = "Account"

[[fields]]
api_name = "Name"

[[fields]]
api_name = "Name"
required = true
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate field api_name 'Name'"));
}

#[test]
fn rejects_blank_object_type() {
    let err = FormConfig::from_toml_str(
        r#"
object_type = " "

[[fields]]
api_name = "Name"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn rejects_empty_field_table() {
    let err = FormConfig::from_toml_str("object_type = \"Account\"\nfields = []\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONTACT_FORM.as_bytes()).unwrap();
    let config = FormConfig::load(file.path()).unwrap();
    assert_eq!(config.object_type, "Contact");
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FormConfig::load(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn default_survives_toml_roundtrip() {
    let config = FormConfig::default();
    let text = config.to_toml_string().unwrap();
    let parsed = FormConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed, config);
}
