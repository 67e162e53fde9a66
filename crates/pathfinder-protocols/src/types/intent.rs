//! Structured user intent.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What the user asked for, extracted once per task from free text.
///
/// The serialized field names match the record the inference service is
/// asked to produce, so an `Intent` can be round-tripped through prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(rename = "product_name")]
    pub subject: String,

    /// Usually the brand.
    #[serde(rename = "brand", default)]
    pub qualifier: Option<String>,

    /// Attribute name to value, in extraction order.
    #[serde(rename = "specifications", default)]
    pub attributes: IndexMap<String, String>,

    #[serde(rename = "website", default)]
    pub target_site: Option<String>,
}

impl Intent {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Default::default()
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_target_site(mut self, site: impl Into<String>) -> Self {
        self.target_site = Some(site.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_builder_keeps_attribute_order() {
        let intent = Intent::new("iPhone 15 Pro")
            .with_attribute("storage", "256GB")
            .with_attribute("color", "white")
            .with_attribute("model", "15 pro");
        let names: Vec<&str> = intent.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["storage", "color", "model"]);
        assert_eq!(intent.attribute("color"), Some("white"));
        assert_eq!(intent.attribute("size"), None);
    }

    #[test]
    fn test_intent_serializes_with_legacy_names() {
        let intent = Intent::new("Galaxy S24").with_qualifier("Samsung");
        let value = serde_json::to_value(&intent).unwrap();
        assert_eq!(value["product_name"], "Galaxy S24");
        assert_eq!(value["brand"], "Samsung");
        assert!(value["website"].is_null());
        assert!(value["specifications"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_intent_deserializes_sparse_record() {
        let intent: Intent = serde_json::from_str(r#"{"product_name": "air max"}"#).unwrap();
        assert_eq!(intent.subject, "air max");
        assert!(intent.qualifier.is_none());
        assert!(intent.target_site.is_none());
    }
}
