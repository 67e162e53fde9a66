//! Specification extraction: free text to [`Intent`].

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use pathfinder_protocols::{InferenceClient, InferenceRequest, Intent, parse_structured};

const SYSTEM_PROMPT: &str = "You are a product specification extractor. You read a shopping \
request and reply with JSON only, without explanations.";

const TEMPERATURE: f32 = 0.3;

const COLORS: &[&str] = &[
    "white", "black", "blue", "red", "green", "yellow", "purple", "pink", "gray", "silver", "gold",
];

const BRANDS: &[&str] = &["apple", "samsung", "google", "sony", "lg", "nike", "adidas"];

/// Reply shape requested from the inference service. Attribute values may
/// come back as numbers or booleans and are normalized to strings.
#[derive(Debug, Deserialize)]
struct ExtractedSpec {
    product_name: String,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    specifications: IndexMap<String, Value>,
    #[serde(default)]
    website: Option<String>,
}

impl ExtractedSpec {
    fn into_intent(self, user_text: &str) -> Intent {
        let subject = match self.product_name.trim() {
            "" => user_text.to_string(),
            name => name.to_string(),
        };
        let attributes = self
            .specifications
            .into_iter()
            .filter_map(|(name, value)| {
                let value = match value {
                    Value::Null => return None,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (!value.trim().is_empty()).then_some((name, value))
            })
            .collect();
        Intent {
            subject,
            qualifier: non_empty(self.brand),
            attributes,
            target_site: non_empty(self.website).filter(|site| mentions_site(user_text, site)),
        }
    }
}

/// True when the host of `site` appears in the user's own words.
fn mentions_site(user_text: &str, site: &str) -> bool {
    let site = site.to_lowercase();
    let host = site
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    !host.is_empty() && user_text.to_lowercase().contains(host)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extracts an [`Intent`] from user text. Never fails: any inference problem
/// falls back to [`fallback_intent`].
pub struct SpecificationExtractor {
    client: Arc<dyn InferenceClient>,
    timeout: Duration,
}

impl SpecificationExtractor {
    pub fn new(client: Arc<dyn InferenceClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn extract(&self, user_text: &str) -> Intent {
        if user_text.trim().is_empty() {
            return fallback_intent(user_text);
        }

        let prompt = format!(
            "Extract the product the user wants from this request: \"{}\"\n\
             Return JSON with these keys:\n\
             - product_name: the main product name\n\
             - brand: the brand, or null\n\
             - specifications: object of attribute name to value (storage, color, model, size...)\n\
             - website: the website URL if the user mentioned one, otherwise null",
            user_text
        );
        let request = InferenceRequest::new(SYSTEM_PROMPT, prompt)
            .with_temperature(TEMPERATURE)
            .with_timeout(self.timeout);

        let reply = match self.client.complete(request).await {
            Ok(reply) => reply,
            Err(e) if e.is_rate_limited() => {
                warn!("Inference quota exceeded, using rule-based extraction: {}", e);
                return fallback_intent(user_text);
            }
            Err(e) => {
                warn!("Specification extraction failed, using rule-based extraction: {}", e);
                return fallback_intent(user_text);
            }
        };

        match parse_structured::<ExtractedSpec>(&reply) {
            Ok(spec) => {
                let intent = spec.into_intent(user_text);
                info!("Extracted intent for '{}'", intent.subject);
                intent
            }
            Err(e) => {
                debug!("Unusable extraction reply: {}", e);
                fallback_intent(user_text)
            }
        }
    }
}

/// Rule-based extraction used when the inference service is unavailable.
pub fn fallback_intent(user_text: &str) -> Intent {
    let lower = user_text.to_lowercase();
    let mut intent = Intent::new(user_text);

    let capacity = Regex::new(r"(\d+)\s*(gb|tb)").expect("static pattern");
    if let Some(m) = capacity.find(&lower) {
        intent = intent.with_attribute("storage", m.as_str().to_uppercase());
    }

    if let Some(color) = COLORS.iter().find(|c| lower.contains(*c)) {
        intent = intent.with_attribute("color", *color);
    }

    let model = Regex::new(r"(\d+)\s*(pro|max|plus|mini)").expect("static pattern");
    if let Some(m) = model.find(&lower) {
        intent = intent.with_attribute("model", m.as_str());
    }

    if let Some(brand) = BRANDS.iter().find(|b| lower.contains(*b)) {
        intent = intent.with_qualifier(capitalize(brand));
    }

    intent
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
