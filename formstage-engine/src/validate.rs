use formstage_model::{is_blank, FieldSpec, FieldStatus, FieldVerdict, REQUIRED_REASON};
use serde_json::Value;

/// Checks one value against its field spec.
///
/// A required field that is blank fails with [`REQUIRED_REASON`]; otherwise
/// the field's rule, if any, decides. `highlight` does not change the
/// verdict, only whether the UI should surface it: initial-load passes run
/// with `highlight = false` so untouched forms do not render as errors.
pub fn validate_field(spec: &FieldSpec, value: &Value, highlight: bool) -> FieldStatus {
    let verdict = if spec.required && is_blank(value) {
        FieldVerdict::invalid(REQUIRED_REASON)
    } else {
        match &spec.rule {
            Some(rule) => rule.check(value),
            None => FieldVerdict::Valid,
        }
    };
    FieldStatus::new(&spec.api_name, verdict, highlight)
}
