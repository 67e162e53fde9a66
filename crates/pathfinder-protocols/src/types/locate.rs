//! Locate requests and results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The abstract target a cascade is asked to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatePurpose {
    SearchInput,
    SearchSubmit,
    ListingItem,
}

impl LocatePurpose {
    /// Natural-language description used in prompts and logs.
    pub fn describe(&self) -> &'static str {
        match self {
            LocatePurpose::SearchInput => "the site search input field",
            LocatePurpose::SearchSubmit => "the button that submits the site search",
            LocatePurpose::ListingItem => "a product listing link in the results",
        }
    }
}

impl fmt::Display for LocatePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocatePurpose::SearchInput => "search_input",
            LocatePurpose::SearchSubmit => "search_submit",
            LocatePurpose::ListingItem => "listing_item",
        };
        f.write_str(name)
    }
}

/// One cascade invocation. The document it runs against is passed
/// alongside the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocateRequest {
    pub purpose: LocatePurpose,
    #[serde(default)]
    pub hints: Option<String>,
}

impl LocateRequest {
    pub fn new(purpose: LocatePurpose) -> Self {
        Self {
            purpose,
            hints: None,
        }
    }

    pub fn with_hints(mut self, hints: impl Into<String>) -> Self {
        self.hints = Some(hints.into());
        self
    }
}

/// How a target was found, in cascade priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocateMethod {
    DirectMatch,
    Inferred,
    StructuralParse,
}

impl LocateMethod {
    /// Ordinal confidence derived from the method's rank; higher is better.
    pub fn confidence(&self) -> u8 {
        match self {
            LocateMethod::DirectMatch => 3,
            LocateMethod::Inferred => 2,
            LocateMethod::StructuralParse => 1,
        }
    }
}

impl fmt::Display for LocateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocateMethod::DirectMatch => "direct_match",
            LocateMethod::Inferred => "inferred",
            LocateMethod::StructuralParse => "structural_parse",
        };
        f.write_str(name)
    }
}

/// A resolved, interaction-ready target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedTarget {
    /// Selector usable by the document port.
    pub target: String,
    /// Companion control, e.g. the submit button next to a search input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    pub method: LocateMethod,
}

impl LocatedTarget {
    pub fn new(target: impl Into<String>, method: LocateMethod) -> Self {
        Self {
            target: target.into(),
            secondary: None,
            method,
        }
    }

    pub fn with_secondary(mut self, secondary: Option<String>) -> Self {
        self.secondary = secondary;
        self
    }

    pub fn confidence(&self) -> u8 {
        self.method.confidence()
    }
}

/// Outcome of a strategy attempt or a whole cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "found", rename_all = "snake_case")]
pub enum LocateResult {
    #[serde(rename = "true")]
    Found(LocatedTarget),
    #[serde(rename = "false")]
    NotFound,
}

impl LocateResult {
    pub fn found(target: LocatedTarget) -> Self {
        LocateResult::Found(target)
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LocateResult::Found(_))
    }

    pub fn target(&self) -> Option<&LocatedTarget> {
        match self {
            LocateResult::Found(target) => Some(target),
            LocateResult::NotFound => None,
        }
    }

    pub fn into_target(self) -> Option<LocatedTarget> {
        match self {
            LocateResult::Found(target) => Some(target),
            LocateResult::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_follows_method_rank() {
        assert!(LocateMethod::DirectMatch.confidence() > LocateMethod::Inferred.confidence());
        assert!(LocateMethod::Inferred.confidence() > LocateMethod::StructuralParse.confidence());
    }

    #[test]
    fn test_not_found_has_no_target() {
        let result = LocateResult::NotFound;
        assert!(!result.is_found());
        assert!(result.target().is_none());
    }

    #[test]
    fn test_found_exposes_target() {
        let result = LocateResult::found(
            LocatedTarget::new("input[name='q']", LocateMethod::DirectMatch)
                .with_secondary(Some("button[type='submit']".to_string())),
        );
        let target = result.target().unwrap();
        assert_eq!(target.target, "input[name='q']");
        assert_eq!(target.secondary.as_deref(), Some("button[type='submit']"));
        assert_eq!(target.confidence(), 3);
    }

    #[test]
    fn test_result_serialization() {
        let found = LocateResult::found(LocatedTarget::new("#q", LocateMethod::Inferred));
        let value = serde_json::to_value(&found).unwrap();
        assert_eq!(value["found"], "true");
        assert_eq!(value["method"], "inferred");

        let missing = serde_json::to_value(LocateResult::NotFound).unwrap();
        assert_eq!(missing["found"], "false");
        assert!(missing.get("target").is_none());
    }

    #[test]
    fn test_purpose_display() {
        assert_eq!(LocatePurpose::SearchInput.to_string(), "search_input");
        assert!(LocatePurpose::ListingItem.describe().contains("listing"));
    }
}
