//! Inference strategy: ask the inference service for a selector.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use pathfinder_config::LocatorConfig;
use pathfinder_protocols::{
    DocumentPort, InferenceClient, InferenceRequest, LocateMethod, LocatePurpose, LocateRequest,
    LocateResult, LocatedTarget, StrategyError, parse_structured,
};

use crate::cascade::Strategy;
use crate::markup::excerpt;

const SYSTEM_PROMPT: &str = "You are a web automation expert. You identify elements on web \
pages and reply with JSON only, without explanations.";

const TEMPERATURE: f32 = 0.1;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reply shape. Older prompts used `input_selector`/`button_selector`.
#[derive(Debug, Deserialize)]
struct InferredTarget {
    #[serde(alias = "input_selector")]
    target: Option<String>,
    #[serde(default, alias = "button_selector")]
    secondary: Option<String>,
}

pub struct InferenceStrategy {
    client: Arc<dyn InferenceClient>,
    excerpt_chars: usize,
    verify_wait: Duration,
    request_timeout: Duration,
    budget: Duration,
}

impl InferenceStrategy {
    pub fn new(client: Arc<dyn InferenceClient>, config: &LocatorConfig) -> Self {
        Self {
            client,
            excerpt_chars: config.excerpt_chars,
            verify_wait: config.direct_wait(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            budget: config.inference_budget(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn build_prompt(&self, request: &LocateRequest, markup: &str) -> String {
        let secondary = match request.purpose {
            LocatePurpose::SearchInput => "the button that submits that search, or null",
            _ => "null",
        };
        let mut prompt = format!(
            "Find {} in this HTML and return its CSS selector.\n",
            request.purpose.describe()
        );
        if let Some(hints) = &request.hints {
            prompt.push_str(&format!("Context: {}\n", hints));
        }
        prompt.push_str(&format!(
            "Return JSON: {{\"target\": \"<css selector>\", \"secondary\": <css selector for {}>}}\n\n\
             HTML:\n{}",
            secondary,
            excerpt(markup, self.excerpt_chars)
        ));
        prompt
    }
}

#[async_trait]
impl Strategy for InferenceStrategy {
    fn name(&self) -> &str {
        "inference"
    }

    fn method(&self) -> LocateMethod {
        LocateMethod::Inferred
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

        let completion = InferenceRequest::new(SYSTEM_PROMPT, self.build_prompt(request, &markup))
            .with_temperature(TEMPERATURE)
            .with_timeout(self.request_timeout);
        let reply = self.client.complete(completion).await?;
        let inferred: InferredTarget = parse_structured(&reply)?;

        let Some(target) = inferred
            .target
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
        else {
            debug!("Inference reply named no target for {}", request.purpose);
            return Ok(LocateResult::NotFound);
        };

        if doc.wait_for(&target, self.verify_wait, true).await?.is_none() {
            debug!("Inferred selector {} is not visible", target);
            return Ok(LocateResult::NotFound);
        }

        let secondary = inferred
            .secondary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(LocateResult::Found(
            LocatedTarget::new(target, self.method()).with_secondary(secondary),
        ))
    }
}
