//! Product search pipeline.
//!
//! Runs the fixed step sequence for one task against one document and
//! records a [`StepResult`] for every step it executes.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value, json};
use tracing::{error, info, warn};

use pathfinder_config::Config;
use pathfinder_locator::LocatorCascade;
use pathfinder_protocols::{
    DocumentPort, InferenceClient, StepOutcome, StepResult, TaskInput, TaskResult,
    select_listings,
};

use crate::extractor::SpecificationExtractor;
use crate::listing::ListingExtractor;
use crate::search::{SearchExecutor, SearchOutcome};
use crate::sites::SiteSelector;

/// Step names, in execution order.
pub mod steps {
    pub const EXTRACT_SPEC: &str = "EXTRACT_SPEC";
    pub const SELECT_SITE: &str = "SELECT_SITE";
    pub const NAVIGATE: &str = "NAVIGATE";
    pub const SEARCH: &str = "SEARCH";
    pub const EXTRACT_LISTINGS: &str = "EXTRACT_LISTINGS";
    pub const DONE: &str = "DONE";
}

const AGENT_NAME: &str = "product_search";

/// Terminal result plus the steps that produced it.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub result: TaskResult,
    pub steps: Vec<StepResult>,
}

impl TaskOutcome {
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.action_name.as_str()).collect()
    }
}

/// Append-only step log for one task.
#[derive(Default)]
struct StepLog {
    steps: Vec<StepResult>,
}

impl StepLog {
    fn record(&mut self, action: &str, outcome: StepOutcome, payload: Value, message: impl Into<String>) {
        self.steps.push(StepResult {
            step_index: self.steps.len(),
            agent_name: AGENT_NAME.to_string(),
            action_name: action.to_string(),
            outcome,
            payload,
            message: message.into(),
        });
    }

    fn fail(mut self, action: &str, message: &str) -> TaskOutcome {
        error!("{} failed: {}", action, message);
        self.record(action, StepOutcome::Failure, Value::Null, message);
        TaskOutcome {
            result: TaskResult::error(message),
            steps: self.steps,
        }
    }
}

pub struct Orchestrator {
    extractor: SpecificationExtractor,
    sites: SiteSelector,
    search: SearchExecutor,
    listings: ListingExtractor,
    settle_after_navigation: Duration,
    settle_after_search: Duration,
    max_listings: usize,
}

impl Orchestrator {
    /// Wire the standard pipeline from configuration.
    pub fn new(config: &Config, client: Arc<dyn InferenceClient>) -> Self {
        Self {
            extractor: SpecificationExtractor::new(client.clone(), config.inference.timeout()),
            sites: SiteSelector::new(&config.sites),
            search: SearchExecutor::new(
                LocatorCascade::standard(config, client.clone()),
                &config.pipeline,
            ),
            listings: ListingExtractor::standard(config, client),
            settle_after_navigation: config.pipeline.settle_after_navigation(),
            settle_after_search: config.pipeline.settle_after_search(),
            max_listings: config.pipeline.max_listings,
        }
    }

    pub fn with_search(mut self, search: SearchExecutor) -> Self {
        self.search = search;
        self
    }

    pub fn with_listings(mut self, listings: ListingExtractor) -> Self {
        self.listings = listings;
        self
    }

    pub async fn run(&self, doc: &dyn DocumentPort, input: &TaskInput) -> TaskResult {
        self.execute(doc, input).await.result
    }

    pub async fn execute(&self, doc: &dyn DocumentPort, input: &TaskInput) -> TaskOutcome {
        let mut log = StepLog::default();

        info!("Extracting product specifications");
        let intent = self.extractor.extract(&input.query).await;
        let product_specs = serde_json::to_value(&intent).unwrap_or_default();
        log.record(
            steps::EXTRACT_SPEC,
            StepOutcome::Success,
            product_specs.clone(),
            format!("Extracted '{}'", intent.subject),
        );

        info!("Determining website");
        let Some(website) = self.sites.select(&intent) else {
            return log.fail(steps::SELECT_SITE, "Could not determine website for the product.");
        };
        log.record(
            steps::SELECT_SITE,
            StepOutcome::Success,
            json!({ "website": website }),
            format!("Selected {}", website),
        );

        info!("Navigating to {}", website);
        if let Err(e) = doc.navigate(&website).await {
            warn!("Navigation to {} failed: {}", website, e);
            return log.fail(
                steps::NAVIGATE,
                &format!("Failed to navigate to website: {}", website),
            );
        }
        tokio::time::sleep(self.settle_after_navigation).await;
        log.record(
            steps::NAVIGATE,
            StepOutcome::Success,
            json!({ "url": website }),
            format!("Navigated to {}", website),
        );

        if let Err(e) = doc.current_uri().await {
            warn!("Document unavailable after navigation: {}", e);
            return log.fail(steps::SEARCH, "Browser page not available");
        }

        info!("Searching for {}", intent.subject);
        let outcome = self.search.run(doc, &intent.subject).await;
        let search_executed = outcome.is_executed();
        let fallback = if search_executed {
            tokio::time::sleep(self.settle_after_search).await;
            None
        } else {
            warn!("Search box not usable, trying direct navigation");
            self.deep_link_fallback(doc, &website, &intent.subject).await
        };
        log.record(
            steps::SEARCH,
            if search_executed {
                StepOutcome::Success
            } else {
                StepOutcome::Failure
            },
            json!({ "search": outcome, "fallback_url": fallback }),
            search_message(&outcome),
        );

        info!("Finding products on page");
        let candidates = self.listings.extract(doc, &intent).await;
        let found = candidates.len();
        let products = select_listings(candidates, self.max_listings);
        log.record(
            steps::EXTRACT_LISTINGS,
            StepOutcome::Success,
            json!({ "candidates": found, "selected": products.len() }),
            format!("{} candidates, {} selected", found, products.len()),
        );

        let message = format!("Found {} products", products.len());
        let mut data = Map::new();
        data.insert("product_specs".to_string(), product_specs);
        data.insert("website".to_string(), Value::String(website));
        data.insert(
            "products".to_string(),
            serde_json::to_value(&products).unwrap_or_default(),
        );
        data.insert("search_executed".to_string(), Value::Bool(search_executed));
        log.record(steps::DONE, StepOutcome::Success, Value::Null, message.clone());

        info!("{}", message);
        TaskOutcome {
            result: TaskResult::success(data, message),
            steps: log.steps,
        }
    }

    /// Known product-page shortcut for sites whose search could not be used.
    async fn deep_link_fallback(
        &self,
        doc: &dyn DocumentPort,
        website: &str,
        query: &str,
    ) -> Option<String> {
        let url = deep_link(website, query)?;
        match doc.navigate(&url).await {
            Ok(()) => {
                tokio::time::sleep(self.settle_after_navigation).await;
                Some(url)
            }
            Err(e) => {
                warn!("Fallback navigation to {} failed: {}", url, e);
                None
            }
        }
    }
}

fn deep_link(website: &str, query: &str) -> Option<String> {
    if website.to_lowercase().contains("apple.com") && query.to_lowercase().contains("iphone") {
        Some(format!("{}/us/shop/goto/iphone", website.trim_end_matches('/')))
    } else {
        None
    }
}

fn search_message(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Clicked { submit, .. } => format!("Submitted search via {}", submit),
        SearchOutcome::KeySubmit { .. } => "Submitted search with Enter".to_string(),
        SearchOutcome::NotLocated => "Search box not found".to_string(),
        SearchOutcome::Failed { reason } => format!("Search failed: {}", reason),
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
