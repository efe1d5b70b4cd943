use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a field's selectable options come from.
///
/// Tagged by `type` on the wire. The `remote` variant requires `url`
/// structurally, so a remote source without one fails deserialization
/// rather than surfacing later at lookup time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataSource {
    /// Inline item list. Object items are mapped through the same
    /// `labelKey`/`valueKey` keys a remote source would use.
    #[serde(rename_all = "camelCase")]
    Static {
        #[serde(default)]
        data: Vec<Value>,
        /// Query parameter carrying the autocomplete search string.
        #[serde(skip_serializing_if = "Option::is_none")]
        search_param: Option<String>,
        /// Key to read the display label from object items.
        #[serde(skip_serializing_if = "Option::is_none")]
        label_key: Option<String>,
        /// Key to read the submitted value from object items.
        #[serde(skip_serializing_if = "Option::is_none")]
        value_key: Option<String>,
    },
    /// Options fetched by the client from `url`, re-fetched whenever one of
    /// the `dependencies` fields changes.
    #[serde(rename_all = "camelCase")]
    Remote {
        url: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        dependencies: Vec<String>,
        /// Query parameter carrying the autocomplete search string.
        #[serde(skip_serializing_if = "Option::is_none")]
        search_param: Option<String>,
        /// Key to read the display label from returned items.
        #[serde(skip_serializing_if = "Option::is_none")]
        label_key: Option<String>,
        /// Key to read the submitted value from returned items.
        #[serde(skip_serializing_if = "Option::is_none")]
        value_key: Option<String>,
    },
    /// Options produced by a provider registered in the host application.
    Callback {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        dependencies: Vec<String>,
    },
}

impl DataSource {
    /// Field names whose current values this source depends on.
    pub fn dependencies(&self) -> &[String] {
        match self {
            DataSource::Remote { dependencies, .. }
            | DataSource::Callback { dependencies } => dependencies,
            DataSource::Static { .. } => &[],
        }
    }

    /// Wire name of the source kind, for logging and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            DataSource::Static { .. } => "static",
            DataSource::Remote { .. } => "remote",
            DataSource::Callback { .. } => "callback",
        }
    }
}

/// One selectable option, as served by the options endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptionItem {
    pub label: String,
    pub value: Value,
}

impl OptionItem {
    /// Build an option from a static data item. Objects contribute the
    /// `label_key`/`value_key` keys (defaulting to `label`/`value`);
    /// scalars stand for both.
    pub fn from_value(item: &Value, label_key: Option<&str>, value_key: Option<&str>) -> Self {
        match item {
            Value::Object(map) => {
                let label = match map.get(label_key.unwrap_or("label")) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => item.to_string(),
                };
                let value = map
                    .get(value_key.unwrap_or("value"))
                    .cloned()
                    .unwrap_or_else(|| item.clone());
                Self { label, value }
            }
            Value::String(s) => Self {
                label: s.clone(),
                value: item.clone(),
            },
            other => Self {
                label: other.to_string(),
                value: other.clone(),
            },
        }
    }
}
