//! Listing extraction: product candidates on the current (results) page.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use pathfinder_config::Config;
use pathfinder_locator::markup::{attr_selector, excerpt};
use pathfinder_protocols::{
    DocumentPort, InferenceClient, InferenceRequest, Intent, ListingCandidate, StrategyError,
    parse_structured,
};

const SYSTEM_PROMPT: &str = "You are an expert at analyzing e-commerce pages and finding \
products. Always reply with a JSON array only.";

const TEMPERATURE: f32 = 0.2;

const LISTING_KEYWORDS: &[&str] = &["product", "item", "buy", "shop", "detail"];

/// One way of finding listing candidates on a page.
#[async_trait]
pub trait ListingStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn budget(&self) -> Duration;

    /// An empty list is a miss.
    async fn extract(
        &self,
        doc: &dyn DocumentPort,
        intent: &Intent,
    ) -> Result<Vec<ListingCandidate>, StrategyError>;
}

/// Runs listing strategies in order; the first non-empty list wins.
pub struct ListingExtractor {
    strategies: Vec<Arc<dyn ListingStrategy>>,
}

impl ListingExtractor {
    pub fn new(strategies: Vec<Arc<dyn ListingStrategy>>) -> Self {
        Self { strategies }
    }

    /// Inferred listings, then the anchor scan.
    pub fn standard(config: &Config, client: Arc<dyn InferenceClient>) -> Self {
        Self::new(vec![
            Arc::new(InferredListings::new(client, config)),
            Arc::new(AnchorScan::new(config)),
        ])
    }

    pub async fn extract(&self, doc: &dyn DocumentPort, intent: &Intent) -> Vec<ListingCandidate> {
        for strategy in &self.strategies {
            let budget = strategy.budget();
            match tokio::time::timeout(budget, strategy.extract(doc, intent)).await {
                Ok(Ok(candidates)) if !candidates.is_empty() => {
                    info!("{} found {} products", strategy.name(), candidates.len());
                    return candidates;
                }
                Ok(Ok(_)) => debug!("{} found no products", strategy.name()),
                Ok(Err(e)) if e.is_rate_limited() => {
                    info!("Inference quota exceeded, {} skipped", strategy.name());
                }
                Ok(Err(e)) => warn!("{} failed: {}", strategy.name(), e),
                Err(_) => warn!("{} exceeded its {:?} budget", strategy.name(), budget),
            }
        }
        Vec::new()
    }
}

/// Asks the inference service to read listings out of the page markup.
pub struct InferredListings {
    client: Arc<dyn InferenceClient>,
    excerpt_chars: usize,
    request_timeout: Duration,
    budget: Duration,
}

impl InferredListings {
    pub fn new(client: Arc<dyn InferenceClient>, config: &Config) -> Self {
        Self {
            client,
            excerpt_chars: config.locator.excerpt_chars,
            request_timeout: config.inference.timeout(),
            budget: config.locator.inference_budget(),
        }
    }
}

#[async_trait]
impl ListingStrategy for InferredListings {
    fn name(&self) -> &str {
        "inferred_listings"
    }

    fn budget(&self) -> Duration {
        self.budget
    }

    async fn extract(
        &self,
        doc: &dyn DocumentPort,
        intent: &Intent,
    ) -> Result<Vec<ListingCandidate>, StrategyError> {
        let markup = doc.raw_markup().await?;
        if markup.trim().is_empty() {
            return Ok(Vec::new());
        }
        let uri = doc.current_uri().await?;
        let specs = serde_json::to_string_pretty(intent)
            .map_err(|e| StrategyError::InvalidResponse(e.to_string()))?;

        let prompt = format!(
            "Find the product listings in this HTML that correspond to the specifications.\n\
             Return a JSON array of objects with:\n\
             - title: product title\n\
             - price: product price as text, or null\n\
             - link: URL of the product page\n\
             - selector: CSS selector that clicks this product\n\
             - matches_specs: true if it matches the specifications\n\n\
             Product specifications: {}\n\
             Current URL: {}\n\
             HTML:\n{}",
            specs,
            uri,
            excerpt(&markup, self.excerpt_chars)
        );
        let request = InferenceRequest::new(SYSTEM_PROMPT, prompt)
            .with_temperature(TEMPERATURE)
            .with_timeout(self.request_timeout);

        let reply = self.client.complete(request).await?;
        let candidates: Vec<ListingCandidate> = parse_structured(&reply)?;
        let base = Url::parse(&uri).ok();

        candidates
            .into_iter()
            .map(|candidate| validate(candidate, base.as_ref()))
            .collect()
    }
}

/// Reject incomplete records and make links absolute.
fn validate(
    mut candidate: ListingCandidate,
    base: Option<&Url>,
) -> Result<ListingCandidate, StrategyError> {
    if candidate.title.trim().is_empty()
        || candidate.link.trim().is_empty()
        || candidate.target.trim().is_empty()
    {
        return Err(StrategyError::InvalidResponse(format!(
            "incomplete listing record: {:?}",
            candidate
        )));
    }
    candidate.link = resolve_link(base, candidate.link.trim())
        .ok_or_else(|| StrategyError::InvalidResponse(format!("bad link: {}", candidate.link)))?;
    Ok(candidate)
}

fn resolve_link(base: Option<&Url>, href: &str) -> Option<String> {
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Url::parse(href).ok().map(String::from),
    }
}

/// Static scan for anchors that look like product links.
pub struct AnchorScan {
    limit: usize,
    budget: Duration,
}

impl AnchorScan {
    pub fn new(config: &Config) -> Self {
        Self {
            limit: config.pipeline.max_listings,
            budget: config.locator.structural_budget(),
        }
    }
}

#[async_trait]
impl ListingStrategy for AnchorScan {
    fn name(&self) -> &str {
        "anchor_scan"
    }

    fn budget(&self) -> Duration {
        self.budget
    }

    async fn extract(
        &self,
        doc: &dyn DocumentPort,
        _intent: &Intent,
    ) -> Result<Vec<ListingCandidate>, StrategyError> {
        let markup = doc.raw_markup().await?;
        if markup.trim().is_empty() {
            return Ok(Vec::new());
        }
        let uri = doc.current_uri().await?;
        scan_anchors(&markup, &uri, self.limit)
    }
}

fn scan_anchors(
    markup: &str,
    uri: &str,
    limit: usize,
) -> Result<Vec<ListingCandidate>, StrategyError> {
    let anchors =
        Selector::parse("a[href]").map_err(|e| StrategyError::Markup(format!("{:?}", e)))?;
    let base = Url::parse(uri).ok();
    let document = Html::parse_document(markup);

    let candidates = document
        .select(&anchors)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let title = anchor
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            let text = title.to_lowercase();
            let href_lower = href.to_lowercase();
            if !LISTING_KEYWORDS
                .iter()
                .any(|k| text.contains(k) || href_lower.contains(k))
            {
                return None;
            }
            Some(ListingCandidate {
                title,
                price: None,
                link: resolve_link(base.as_ref(), href).unwrap_or_else(|| href.to_string()),
                target: attr_selector("a", "href", href),
                matches_intent: true,
            })
        })
        .take(limit)
        .collect();
    Ok(candidates)
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
