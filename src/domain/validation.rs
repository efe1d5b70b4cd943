use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single constraint on a field's value.
///
/// Tagged by `type` on the wire (`required`, `min`, `minLength`, ...).
/// Each kind carries exactly the payload it needs: `pattern` requires its
/// regex, `remote` requires the check URL. Evaluation of rules against
/// submitted values is the consuming validation engine's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValidationRule {
    Required {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Min {
        value: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Max {
        value: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MinLength {
        value: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MaxLength {
        value: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Pattern {
        /// Regular expression the value must match.
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Opaque rule interpreted by the consumer; `value` is passed through.
    Custom {
        #[serde(default, skip_serializing_if = "Value::is_null")]
        value: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        dependencies: Vec<String>,
    },
    /// Server-side check: the consumer posts the field value (plus the
    /// current values of `dependencies`) to `url`.
    Remote {
        url: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        dependencies: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl ValidationRule {
    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationRule::Required { message }
            | ValidationRule::Min { message, .. }
            | ValidationRule::Max { message, .. }
            | ValidationRule::MinLength { message, .. }
            | ValidationRule::MaxLength { message, .. }
            | ValidationRule::Pattern { message, .. }
            | ValidationRule::Custom { message, .. }
            | ValidationRule::Remote { message, .. } => message.as_deref(),
        }
    }

    /// Field names whose current values this rule depends on.
    pub fn dependencies(&self) -> &[String] {
        match self {
            ValidationRule::Custom { dependencies, .. }
            | ValidationRule::Remote { dependencies, .. } => dependencies,
            _ => &[],
        }
    }
}
