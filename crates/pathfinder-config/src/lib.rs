//! # Pathfinder Config
//!
//! Configuration management for the Pathfinder agent: TOML schema with
//! defaults for every field, environment variable expansion and validation.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
