//! Inference service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl InferenceError {
    /// Whether the service refused the call because of rate limiting or an
    /// exhausted quota. Callers log this case distinctly but fall back the
    /// same way as for any other error.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            InferenceError::RateLimited(_) => true,
            InferenceError::Api { status, message } => {
                *status == 429 || message.to_lowercase().contains("quota")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_display() {
        let err = InferenceError::RateLimited("insufficient_quota".to_string());
        assert!(err.to_string().contains("Rate limited"));
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_api_error_429_is_rate_limited() {
        let err = InferenceError::Api {
            status: 429,
            message: "slow down".to_string(),
        };
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_api_error_quota_message_is_rate_limited() {
        let err = InferenceError::Api {
            status: 403,
            message: "You exceeded your current Quota".to_string(),
        };
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_other_errors_not_rate_limited() {
        assert!(!InferenceError::Network("refused".to_string()).is_rate_limited());
        assert!(!InferenceError::Timeout(30).is_rate_limited());
        assert!(!InferenceError::InvalidResponse("empty".to_string()).is_rate_limited());
        assert!(
            !InferenceError::Api {
                status: 500,
                message: "Internal Server Error".to_string()
            }
            .is_rate_limited()
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = InferenceError::Timeout(30);
        assert!(err.to_string().contains("30"));
    }
}
