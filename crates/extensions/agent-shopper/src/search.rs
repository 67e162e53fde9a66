//! Search execution: locate the search box, type the query, submit.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info};

use pathfinder_config::PipelineConfig;
use pathfinder_locator::LocatorCascade;
use pathfinder_protocols::{
    DocumentError, DocumentPort, LocateMethod, LocatePurpose, LocateRequest, LocatedTarget,
};

/// How a search attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Query typed and the submit control clicked.
    Clicked {
        input: String,
        submit: String,
        method: LocateMethod,
    },
    /// Query typed and submitted with Enter.
    KeySubmit { input: String, method: LocateMethod },
    /// No strategy located a search input; the document was not touched.
    NotLocated,
    /// The document failed while typing or submitting.
    Failed { reason: String },
}

impl SearchOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(
            self,
            SearchOutcome::Clicked { .. } | SearchOutcome::KeySubmit { .. }
        )
    }
}

pub struct SearchExecutor {
    cascade: LocatorCascade,
    input_wait: Duration,
    submit_wait: Duration,
}

impl SearchExecutor {
    pub fn new(cascade: LocatorCascade, config: &PipelineConfig) -> Self {
        Self {
            cascade,
            input_wait: config.input_wait(),
            submit_wait: config.submit_wait(),
        }
    }

    /// Returns whether the query was typed and submitted.
    pub async fn execute(&self, doc: &dyn DocumentPort, query: &str) -> bool {
        self.run(doc, query).await.is_executed()
    }

    /// Like [`execute`](Self::execute) but reports which submit path was used.
    pub async fn run(&self, doc: &dyn DocumentPort, query: &str) -> SearchOutcome {
        let request = LocateRequest::new(LocatePurpose::SearchInput)
            .with_hints(format!("The user wants to search for: {}", query));
        let Some(target) = self.cascade.resolve(doc, &request).await.into_target() else {
            error!("Could not find a search box on the page");
            return SearchOutcome::NotLocated;
        };

        info!("Using search box {} ({})", target.target, target.method);
        match self.type_and_submit(doc, &target, query).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Search failed on {}: {}", target.target, e);
                SearchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn type_and_submit(
        &self,
        doc: &dyn DocumentPort,
        target: &LocatedTarget,
        query: &str,
    ) -> Result<SearchOutcome, DocumentError> {
        let Some(input) = doc.wait_for(&target.target, self.input_wait, true).await? else {
            return Ok(SearchOutcome::Failed {
                reason: format!("search input {} is no longer visible", target.target),
            });
        };

        doc.click(&input).await?;
        doc.fill(&input, "").await?;
        doc.fill(&input, query).await?;
        info!("Typed search query: {}", query);

        if let Some(submit) = &target.secondary {
            match self.click_submit(doc, submit).await {
                Ok(true) => {
                    info!("Clicked search button {}", submit);
                    return Ok(SearchOutcome::Clicked {
                        input: target.target.clone(),
                        submit: submit.clone(),
                        method: target.method,
                    });
                }
                Ok(false) => debug!("Search button {} not present", submit),
                Err(e) => debug!("Search button {} failed: {}", submit, e),
            }
        }

        doc.press_enter(&input).await?;
        info!("Pressed Enter to submit search");
        Ok(SearchOutcome::KeySubmit {
            input: target.target.clone(),
            method: target.method,
        })
    }

    async fn click_submit(&self, doc: &dyn DocumentPort, submit: &str) -> Result<bool, DocumentError> {
        match doc.wait_for(submit, self.submit_wait, false).await? {
            Some(button) => {
                doc.click(&button).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
