//! Structural parse strategy: scan static markup for likely targets.
//!
//! Works without the inference service, so it is the last resort when the
//! page hides its controls from the direct candidates and the service is
//! unavailable.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use pathfinder_config::LocatorConfig;
use pathfinder_protocols::{
    DocumentPort, LocateMethod, LocatePurpose, LocateRequest, LocateResult, LocatedTarget,
    StrategyError,
};

use crate::cascade::Strategy;
use crate::markup::{attr_selector, id_selector};

const INPUT_KEYWORDS: &[&str] = &["search", "query"];
const SUBMIT_KEYWORDS: &[&str] = &["search", "submit"];
const LISTING_KEYWORDS: &[&str] = &["product", "item", "buy", "shop", "detail"];
const SCANNED_ATTRS: &[&str] = &["name", "id", "placeholder", "aria-label"];
const SUBMIT_CONTROLS: &str = "button[type='submit'], input[type='submit']";

pub struct StructuralParseStrategy {
    verify_wait: Duration,
    budget: Duration,
}

/// A target picked from static markup, before the live visibility check.
#[derive(Debug, PartialEq, Eq)]
struct Picked {
    target: String,
    secondary: Option<String>,
}

impl StructuralParseStrategy {
    pub fn new(config: &LocatorConfig) -> Self {
        Self {
            verify_wait: config.direct_wait(),
            budget: config.structural_budget(),
        }
    }
}

#[async_trait]
impl Strategy for StructuralParseStrategy {
    fn name(&self) -> &str {
        "structural"
    }

    fn method(&self) -> LocateMethod {
        LocateMethod::StructuralParse
    }

    fn budget(&self) -> Duration {
        self.budget
    }

    async fn attempt(
        &self,
        doc: &dyn DocumentPort,
        request: &LocateRequest,
    ) -> Result<LocateResult, StrategyError> {
        let markup = doc.raw_markup().await?;
        if markup.trim().is_empty() {
            return Ok(LocateResult::NotFound);
        }

        let Some(picked) = scan(&markup, request.purpose)? else {
            return Ok(LocateResult::NotFound);
        };

        if doc
            .wait_for(&picked.target, self.verify_wait, true)
            .await?
            .is_none()
        {
            debug!("Parsed selector {} is not visible", picked.target);
            return Ok(LocateResult::NotFound);
        }

        Ok(LocateResult::Found(
            LocatedTarget::new(picked.target, self.method()).with_secondary(picked.secondary),
        ))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, StrategyError> {
    Selector::parse(selector).map_err(|e| StrategyError::Markup(format!("{:?}", e)))
}

/// Pick a target from `markup`. Kept synchronous: `Html` must not be held
/// across an await point.
fn scan(markup: &str, purpose: LocatePurpose) -> Result<Option<Picked>, StrategyError> {
    let document = Html::parse_document(markup);
    match purpose {
        LocatePurpose::SearchInput => {
            let inputs = parse_selector("input")?;
            let picked = document
                .select(&inputs)
                .filter(|el| is_text_input(el))
                .find(|el| is_search_input(el))
                .map(|el| element_selector(&el, "input"));
            let Some(target) = picked else {
                return Ok(None);
            };
            let submits = parse_selector(SUBMIT_CONTROLS)?;
            let secondary = document
                .select(&submits)
                .next()
                .map(|_| SUBMIT_CONTROLS.to_string());
            Ok(Some(Picked { target, secondary }))
        }
        LocatePurpose::SearchSubmit => {
            let controls = parse_selector("button, input[type='submit']")?;
            Ok(document
                .select(&controls)
                .find(|el| is_search_submit(el))
                .map(|el| Picked {
                    target: element_selector(&el, el.value().name()),
                    secondary: None,
                }))
        }
        LocatePurpose::ListingItem => {
            let anchors = parse_selector("a[href]")?;
            Ok(document
                .select(&anchors)
                .find(|el| is_listing_anchor(el))
                .and_then(|el| el.value().attr("href"))
                .map(|href| Picked {
                    target: attr_selector("a", "href", href),
                    secondary: None,
                }))
        }
    }
}

fn is_text_input(el: &ElementRef<'_>) -> bool {
    let kind = el.value().attr("type").unwrap_or("text").to_ascii_lowercase();
    kind == "text" || kind == "search"
}

fn is_search_input(el: &ElementRef<'_>) -> bool {
    if el.value().attr("name") == Some("q") || el.value().attr("id") == Some("q") {
        return true;
    }
    attrs_contain(el, SCANNED_ATTRS, INPUT_KEYWORDS)
}

fn is_search_submit(el: &ElementRef<'_>) -> bool {
    let submit_type = el
        .value()
        .attr("type")
        .is_some_and(|t| t.eq_ignore_ascii_case("submit"));
    let text = el.text().collect::<String>().to_lowercase();
    submit_type
        || attrs_contain(el, &["name", "id", "aria-label", "value"], SUBMIT_KEYWORDS)
        || SUBMIT_KEYWORDS.iter().any(|k| text.contains(k))
}

fn is_listing_anchor(el: &ElementRef<'_>) -> bool {
    let text = el.text().collect::<String>().trim().to_lowercase();
    let href = el.value().attr("href").unwrap_or_default().to_lowercase();
    LISTING_KEYWORDS
        .iter()
        .any(|k| text.contains(k) || href.contains(k))
}

fn attrs_contain(el: &ElementRef<'_>, attrs: &[&str], keywords: &[&str]) -> bool {
    attrs.iter().filter_map(|a| el.value().attr(a)).any(|value| {
        let value = value.to_lowercase();
        keywords.iter().any(|k| value.contains(k))
    })
}

/// id > name > type > bare tag.
fn element_selector(el: &ElementRef<'_>, tag: &str) -> String {
    let element = el.value();
    if let Some(id) = element.attr("id").filter(|id| !id.is_empty()) {
        return id_selector(id);
    }
    if let Some(name) = element.attr("name").filter(|name| !name.is_empty()) {
        return attr_selector(tag, "name", name);
    }
    if let Some(kind) = element.attr("type").filter(|kind| !kind.is_empty()) {
        return attr_selector(tag, "type", kind);
    }
    tag.to_string()
}

#[cfg(test)]
#[path = "structural_tests.rs"]
mod tests;
