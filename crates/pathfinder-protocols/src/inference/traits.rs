//! Inference client trait definition.

use async_trait::async_trait;

use super::InferenceRequest;
use crate::error::InferenceError;

/// Core trait for text completion services.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Returns the client ID.
    fn id(&self) -> &str;

    /// Generate a completion for the request.
    async fn complete(&self, request: InferenceRequest) -> Result<String, InferenceError>;
}
