//! Validation errors raised while interpreting status API responses

use thiserror::Error;

/// Errors produced when a response or an assignment record does not match
/// the documented shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A value had the wrong JSON type
    #[error("unexpected type for {what}: expected {expected}, got {found}")]
    TypeMismatch {
        what: String,
        expected: &'static str,
        found: String,
    },

    /// A required key was absent
    #[error("missing expected key \"{0}\" in API response")]
    MissingKey(String),

    /// The status field held a value outside the known verdict set
    #[error("unexpected homework status: {0}")]
    UnknownStatus(String),
}

impl ValidationError {
    pub(crate) fn type_mismatch(
        what: impl Into<String>,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> Self {
        Self::TypeMismatch {
            what: what.into(),
            expected,
            found: json_type_name(found).to_string(),
        }
    }
}

/// Returns a short name for the JSON type of `value`
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "mapping",
    }
}
