//! # Pathfinder Protocols
//!
//! Core protocol definitions for the Pathfinder page automation agent.
//! Contains the collaborator interfaces and the task data model only - no
//! implementations.
//!
//! ## Core Traits
//!
//! - [`DocumentPort`] - A live, rendered document that can be queried and driven
//! - [`InferenceClient`] - A text completion service used by the inference strategies

pub mod document;
pub mod error;
pub mod inference;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use document::{DocumentPort, ElementHandle};
pub use error::{DocumentError, InferenceError, StrategyError};
pub use inference::{InferenceClient, InferenceRequest, parse_structured};
pub use types::*;
