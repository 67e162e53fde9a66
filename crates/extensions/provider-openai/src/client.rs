//! OpenAI chat completions client.

use async_trait::async_trait;
use tracing::debug;

use pathfinder_config::InferenceConfig;
use pathfinder_protocols::{InferenceClient, InferenceError, InferenceRequest};

use crate::api::{ApiMessage, ApiRequest, ApiResponse};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Inference client for OpenAI and compatible chat completions APIs.
pub struct OpenAIClient {
    api_key: String,
    api_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_url(api_key, model, DEFAULT_API_URL.to_string())
    }

    /// Create a client with a custom endpoint URL (for OpenAI-compatible APIs).
    pub fn with_url(api_key: String, model: String, api_url: String) -> Self {
        Self {
            api_key,
            api_url,
            model,
            client: reqwest::Client::new(),
        }
    }

    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn from_config(config: &InferenceConfig) -> Self {
        let api_key = config.api_key.clone().unwrap_or_default();
        match &config.base_url {
            Some(base) => Self::with_url(
                api_key,
                config.model.clone(),
                format!("{}/chat/completions", base.trim_end_matches('/')),
            ),
            None => Self::new(api_key, config.model.clone()),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &InferenceRequest) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            messages: vec![
                ApiMessage::system(request.system_prompt.clone()),
                ApiMessage::user(request.user_prompt.clone()),
            ],
            temperature: request.temperature,
        }
    }

    async fn send_request(
        &self,
        api_request: &ApiRequest,
        request: &InferenceRequest,
    ) -> Result<reqwest::Response, InferenceError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(request.timeout)
            .json(api_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout(request.timeout.as_secs())
                } else {
                    InferenceError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            if status == 429 || text.contains("insufficient_quota") {
                return Err(InferenceError::RateLimited(text));
            }
            return Err(InferenceError::Api {
                status,
                message: text,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl InferenceClient for OpenAIClient {
    fn id(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: InferenceRequest) -> Result<String, InferenceError> {
        if self.api_key.is_empty() {
            return Err(InferenceError::Api {
                status: 401,
                message: "No API key configured".to_string(),
            });
        }

        let api_request = self.build_request(&request);
        debug!(
            "Sending completion request to {} ({} prompt chars)",
            self.model,
            request.user_prompt.len()
        );
        let response = self.send_request(&api_request, &request).await?;
        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        api_response
            .into_text()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| InferenceError::InvalidResponse("completion has no content".to_string()))
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
