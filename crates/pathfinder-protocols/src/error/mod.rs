//! Error types for the Pathfinder protocol layer.

mod document;
mod inference;
mod strategy;

pub use document::*;
pub use inference::*;
pub use strategy::*;
