use crate::errors::DomainResult;
use crate::util::deep_merge;
use crate::validation::{Validate, ValidationBuilder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A loosely-typed section record: scalar fields plus named ordered
/// sub-collections. Section schemas are operator-edited free-form data, so
/// they stay schema-less at the storage boundary; read paths fill gaps from
/// the default document.
pub type SectionRecord = Map<String, Value>;

/// The full site content document, keyed by section identifier
/// (`hero`, `about`, `services`, `contact`, `reviews`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDocument {
    sections: Map<String, Value>,
}

impl ContentDocument {
    pub fn from_sections(sections: Map<String, Value>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.sections.iter()
    }

    pub fn contains(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn section(&self, section: &str) -> Option<&SectionRecord> {
        self.sections.get(section).and_then(Value::as_object)
    }

    /// Merge this document over `base`, field by field. Fields present here
    /// win; fields only in `base` fill the gaps. Every section key of `base`
    /// survives the merge, which is what keeps the presence invariant across
    /// fallback tiers.
    pub fn merged_over(&self, base: &ContentDocument) -> ContentDocument {
        let merged = deep_merge(
            &Value::Object(base.sections.clone()),
            &Value::Object(self.sections.clone()),
        );
        match merged {
            Value::Object(sections) => ContentDocument { sections },
            _ => base.clone(),
        }
    }

    /// Mutable access to a section, seeding it from `seed` (the matching
    /// default section) when absent or malformed.
    pub(crate) fn ensure_section(
        &mut self,
        section: &str,
        seed: Option<&SectionRecord>,
    ) -> &mut SectionRecord {
        let entry = self
            .sections
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(seed.cloned().unwrap_or_default()));
        if !entry.is_object() {
            *entry = Value::Object(seed.cloned().unwrap_or_default());
        }
        entry
            .as_object_mut()
            .expect("section entry was just made an object")
    }
}

/// Timestamped snapshot written to the dedicated content backup slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBackup {
    pub content: ContentDocument,
    pub timestamp: DateTime<Utc>,
    pub version: u32,
}

/// A patient review, the one typed item in the content document.
///
/// `rating` is clamped to 1..=5 at the write boundary: both the constructor
/// and deserialization clamp, so an out-of-range value can never enter the
/// document regardless of where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "deserialize_rating")]
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub approved: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(name: impl Into<String>, rating: i32, comment: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            rating: clamp_rating(rating),
            comment: comment.into(),
            approved: false,
            created_at: Utc::now(),
        }
    }
}

impl Validate for Review {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.trim().to_string()))
            .required()
            .max_length(120)
            .validate()?;
        ValidationBuilder::new("comment", Some(self.comment.trim().to_string()))
            .required()
            .validate()?;
        Ok(())
    }
}

fn clamp_rating(rating: i32) -> u8 {
    rating.clamp(1, 5) as u8
}

fn deserialize_rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i32::deserialize(deserializer)?;
    Ok(clamp_rating(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merged_over_keeps_every_base_section() {
        let base = ContentDocument::from_sections(
            json!({"hero": {"title": "default"}, "about": {"title": "about"}})
                .as_object()
                .unwrap()
                .clone(),
        );
        let overlay = ContentDocument::from_sections(
            json!({"hero": {"title": "remote"}}).as_object().unwrap().clone(),
        );

        let merged = overlay.merged_over(&base);
        assert!(merged.contains("hero"));
        assert!(merged.contains("about"));
        assert_eq!(
            merged.section("hero").unwrap().get("title"),
            Some(&json!("remote"))
        );
    }

    #[test]
    fn rating_clamps_high_and_low() {
        assert_eq!(Review::new("Ana", 7, "otimo").rating, 5);
        assert_eq!(Review::new("Ana", -2, "ruim").rating, 1);
        assert_eq!(Review::new("Ana", 3, "bom").rating, 3);
    }

    #[test]
    fn rating_clamps_on_deserialize() {
        let review: Review = serde_json::from_value(json!({
            "name": "Paulo",
            "rating": 11,
            "comment": "excelente atendimento"
        }))
        .unwrap();
        assert_eq!(review.rating, 5);
        assert!(!review.approved);
    }

    #[test]
    fn review_requires_name_and_comment() {
        assert!(Review::new("", 4, "bom").validate().is_err());
        assert!(Review::new("Ana", 4, "   ").validate().is_err());
        assert!(Review::new("Ana", 4, "bom").validate().is_ok());
    }
}
