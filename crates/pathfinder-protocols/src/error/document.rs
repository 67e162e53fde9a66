//! Document transport errors.
//!
//! "Element not found" is never an error: [`crate::DocumentPort`] reports it
//! as `Ok(None)`. These variants cover transport-level failures only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document unavailable: {0}")]
    Unavailable(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Interaction failed: {0}")]
    InteractionFailed(String),

    #[error("Document operation timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),
}
