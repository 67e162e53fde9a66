//! Strategy attempt errors.
//!
//! A `StrategyError` is always a transient miss from the cascade's point of
//! view: it is logged and the next strategy runs.

use thiserror::Error;

use super::{DocumentError, InferenceError};

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Markup parse error: {0}")]
    Markup(String),
}

impl StrategyError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StrategyError::Inference(e) if e.is_rate_limited())
    }
}
