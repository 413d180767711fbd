use crate::util::deep_merge;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flat record of scalar settings for one category.
pub type CategoryRecord = Map<String, Value>;

/// Site-wide settings, keyed by category: `doctor`, `clinic`, `social`,
/// `site` (title, description, color themes) and `whatsapp` (widget config).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsDocument {
    categories: Map<String, Value>,
}

/// The category keys every loaded document must contain.
pub const CATEGORIES: [&str; 5] = ["doctor", "clinic", "social", "site", "whatsapp"];

impl SettingsDocument {
    pub fn from_categories(categories: Map<String, Value>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.categories.iter()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn category(&self, category: &str) -> Option<&CategoryRecord> {
        self.categories.get(category).and_then(Value::as_object)
    }

    /// Same merge contract as the content document, at category level.
    pub fn merged_over(&self, base: &SettingsDocument) -> SettingsDocument {
        let merged = deep_merge(
            &Value::Object(base.categories.clone()),
            &Value::Object(self.categories.clone()),
        );
        match merged {
            Value::Object(categories) => SettingsDocument { categories },
            _ => base.clone(),
        }
    }

    pub(crate) fn ensure_category(
        &mut self,
        category: &str,
        seed: Option<&CategoryRecord>,
    ) -> &mut CategoryRecord {
        let entry = self
            .categories
            .entry(category.to_string())
            .or_insert_with(|| Value::Object(seed.cloned().unwrap_or_default()));
        if !entry.is_object() {
            *entry = Value::Object(seed.cloned().unwrap_or_default());
        }
        entry
            .as_object_mut()
            .expect("category entry was just made an object")
    }
}

/// Timestamped snapshot written to the settings backup slot, distinct from
/// the live settings slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsBackup {
    pub settings: SettingsDocument,
    pub timestamp: DateTime<Utc>,
    pub version: u32,
}
