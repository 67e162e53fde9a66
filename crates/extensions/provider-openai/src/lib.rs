//! OpenAI-compatible inference client for Pathfinder.

mod api;
mod client;

pub use client::OpenAIClient;
