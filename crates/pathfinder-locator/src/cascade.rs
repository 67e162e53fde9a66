//! Strategy trait and the cascade that runs strategies in order.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use pathfinder_config::Config;
use pathfinder_protocols::{
    DocumentPort, InferenceClient, LocateMethod, LocateRequest, LocateResult, StrategyError,
};

use crate::strategies::{DirectCandidateStrategy, InferenceStrategy, StructuralParseStrategy};

/// One way of turning an abstract locate request into a concrete target.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Method recorded on targets this strategy finds.
    fn method(&self) -> LocateMethod;

    /// Upper bound on a single attempt, enforced by the cascade.
    fn budget(&self) -> Duration;

    /// Try once. No retries; `Ok(NotFound)` and `Err` are both misses.
    async fn attempt(
        &self,
        doc: &dyn DocumentPort,
        request: &LocateRequest,
    ) -> Result<LocateResult, StrategyError>;
}

/// Ordered, first-match-wins strategy runner.
#[derive(Clone)]
pub struct LocatorCascade {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl LocatorCascade {
    pub fn new(strategies: Vec<Arc<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Direct candidates, then inference, then structural parsing.
    pub fn standard(config: &Config, inference: Arc<dyn InferenceClient>) -> Self {
        Self::new(vec![
            Arc::new(DirectCandidateStrategy::new(&config.locator)),
            Arc::new(
                InferenceStrategy::new(inference, &config.locator)
                    .with_request_timeout(config.inference.timeout()),
            ),
            Arc::new(StructuralParseStrategy::new(&config.locator)),
        ])
    }

    pub fn strategies(&self) -> &[Arc<dyn Strategy>] {
        &self.strategies
    }

    /// Sum of all strategy budgets; no resolve call takes longer.
    pub fn total_budget(&self) -> Duration {
        self.strategies.iter().map(|s| s.budget()).sum()
    }

    /// Resolve `request` against `doc`.
    ///
    /// Strategies run strictly in order. A strategy that errors or overruns
    /// its budget is logged and skipped; the first `Found` is returned
    /// without invoking the rest.
    pub async fn resolve(&self, doc: &dyn DocumentPort, request: &LocateRequest) -> LocateResult {
        for strategy in &self.strategies {
            let budget = strategy.budget();
            match tokio::time::timeout(budget, strategy.attempt(doc, request)).await {
                Ok(Ok(LocateResult::Found(target))) => {
                    info!(
                        "Resolved {} via {} strategy: {}",
                        request.purpose,
                        strategy.name(),
                        target.target
                    );
                    return LocateResult::Found(target);
                }
                Ok(Ok(LocateResult::NotFound)) => {
                    debug!("{} strategy found no {}", strategy.name(), request.purpose);
                }
                Ok(Err(e)) if e.is_rate_limited() => {
                    warn!(
                        "Inference service is rate limited or out of quota, {} strategy skipped: {}",
                        strategy.name(),
                        e
                    );
                }
                Ok(Err(e)) => {
                    warn!("{} strategy failed for {}: {}", strategy.name(), request.purpose, e);
                }
                Err(_) => {
                    warn!(
                        "{} strategy exceeded its {:?} budget for {}",
                        strategy.name(),
                        budget,
                        request.purpose
                    );
                }
            }
        }

        info!("No strategy resolved {}", request.purpose);
        LocateResult::NotFound
    }
}

#[cfg(test)]
#[path = "cascade_tests.rs"]
mod tests;
