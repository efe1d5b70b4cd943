//! Option resolution for `callback` and `static` data sources.
//!
//! `remote` sources are deliberately not resolved here: the consuming
//! client's data-fetching layer owns those URLs.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::OptionItem;

/// Produces the option list for one field whose data source is `callback`.
///
/// `deps` carries the current values of the fields named in the source's
/// `dependencies`, as sent by the client in query parameters.
#[async_trait]
pub trait OptionsPort: Send + Sync {
    async fn options(&self, deps: &HashMap<String, Value>) -> anyhow::Result<Vec<OptionItem>>;
}

/// Registry of callback providers, keyed by `activity/field`.
///
/// The schema's `callback` variant names no handler, so the host
/// application registers providers here before building the router.
#[derive(Default)]
pub struct CallbackRegistry {
    providers: HashMap<String, Arc<dyn OptionsPort>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, activity: &str, field: &str, provider: Arc<dyn OptionsPort>) {
        self.providers.insert(Self::key(activity, field), provider);
    }

    pub fn get(&self, activity: &str, field: &str) -> Option<Arc<dyn OptionsPort>> {
        self.providers.get(&Self::key(activity, field)).cloned()
    }

    fn key(activity: &str, field: &str) -> String {
        format!("{}/{}", activity, field)
    }
}

/// Resolve a `static` data source: map items to options through the
/// source's `labelKey`/`valueKey`, then filter by the autocomplete search
/// string when one was given.
pub fn resolve_static(
    data: &[Value],
    label_key: Option<&str>,
    value_key: Option<&str>,
    search: Option<&str>,
) -> Vec<OptionItem> {
    let mut items: Vec<OptionItem> = data
        .iter()
        .map(|item| OptionItem::from_value(item, label_key, value_key))
        .collect();
    if let Some(q) = search {
        let q = q.to_lowercase();
        items.retain(|item| item.label.to_lowercase().contains(&q));
    }
    items
}
