use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Reason reported when a routing number is neither empty nor nine digits.
pub const ROUTING_NUMBER_REASON: &str = "Routing number must be exactly 9 digits if provided.";

/// Outcome of checking a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldVerdict {
    Valid,
    Invalid(String),
}

impl FieldVerdict {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason),
        }
    }
}

/// A format rule attached to a field.
///
/// Rules only judge the shape of a present value. Whether a field may be
/// left empty is decided by [`FieldSpec::required`], not by the rule.
pub trait FieldRule: Send + Sync {
    /// Short identifier used in logs and debug output.
    fn name(&self) -> &str;

    /// Checks a value.
    fn check(&self, value: &Value) -> FieldVerdict;
}

/// Accepts an empty value or exactly nine ASCII decimal digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingNumberRule;

impl RoutingNumberRule {
    fn is_routing_number(text: &str) -> bool {
        text.len() == 9 && text.bytes().all(|b| b.is_ascii_digit())
    }
}

impl FieldRule for RoutingNumberRule {
    fn name(&self) -> &str {
        "routing_number"
    }

    fn check(&self, value: &Value) -> FieldVerdict {
        let ok = match value {
            Value::Null => true,
            Value::String(s) => s.is_empty() || Self::is_routing_number(s),
            Value::Number(n) => Self::is_routing_number(&n.to_string()),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => false,
        };
        if ok {
            FieldVerdict::Valid
        } else {
            FieldVerdict::invalid(ROUTING_NUMBER_REASON)
        }
    }
}

/// Closures work as ad-hoc rules: `("iban_prefix", |v: &Value| ...)`.
impl<F> FieldRule for (&'static str, F)
where
    F: Fn(&Value) -> FieldVerdict + Send + Sync,
{
    fn name(&self) -> &str {
        self.0
    }

    fn check(&self, value: &Value) -> FieldVerdict {
        (self.1)(value)
    }
}

/// One editable field of a record.
#[derive(Clone)]
pub struct FieldSpec {
    /// Platform field name (e.g. "Bank_Name__c").
    pub api_name: String,
    pub required: bool,
    pub rule: Option<Arc<dyn FieldRule>>,
}

impl FieldSpec {
    /// An optional field without a rule.
    pub fn optional(api_name: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            required: false,
            rule: None,
        }
    }

    /// A required field without a rule.
    pub fn required(api_name: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::optional(api_name)
        }
    }

    /// Attaches a format rule.
    pub fn with_rule(mut self, rule: impl FieldRule + 'static) -> Self {
        self.rule = Some(Arc::new(rule));
        self
    }

    /// Attaches an already shared rule.
    pub fn with_shared_rule(mut self, rule: Arc<dyn FieldRule>) -> Self {
        self.rule = Some(rule);
        self
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("api_name", &self.api_name)
            .field("required", &self.required)
            .field("rule", &self.rule.as_ref().map(|r| r.name()))
            .finish()
    }
}
