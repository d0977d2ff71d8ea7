use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whether a field value counts as "not provided".
///
/// Null, whitespace-only strings, empty arrays and empty objects are blank.
/// Numbers and booleans never are.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) | Value::Bool(_) => false,
    }
}

/// Working copy of a record's field values, keyed by api name.
///
/// Edits never mutate a draft in place: [`RecordDraft::with_field`] returns
/// a new draft and the owner swaps it in. Keys outside the form's schema
/// (such as the record `Id`) are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordDraft(Map<String, Value>);

impl RecordDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a draft from a JSON object.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Value of a field, if set.
    pub fn get(&self, api_name: &str) -> Option<&Value> {
        self.0.get(api_name)
    }

    /// String value of a field, if set and a string.
    pub fn get_str(&self, api_name: &str) -> Option<&str> {
        self.0.get(api_name).and_then(Value::as_str)
    }

    /// Value of a field, treating a missing key as null.
    pub fn value_or_null(&self, api_name: &str) -> &Value {
        self.0.get(api_name).unwrap_or(&Value::Null)
    }

    /// Returns a copy of this draft with one field replaced.
    #[must_use]
    pub fn with_field(&self, api_name: &str, value: Value) -> Self {
        let mut next = self.0.clone();
        next.insert(api_name.to_string(), value);
        Self(next)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RecordDraft {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RecordDraft {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
