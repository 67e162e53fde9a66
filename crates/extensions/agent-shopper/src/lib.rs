//! Product search pipeline for Pathfinder.
//!
//! Turns a free-text request into an [`Intent`](pathfinder_protocols::Intent),
//! picks the site to search, drives its search box through the locator
//! cascade and collects the resulting product listings.

mod extractor;
mod listing;
mod orchestrator;
mod search;
mod sites;

pub use extractor::{SpecificationExtractor, fallback_intent};
pub use listing::{AnchorScan, InferredListings, ListingExtractor, ListingStrategy};
pub use orchestrator::{Orchestrator, TaskOutcome, steps};
pub use search::{SearchExecutor, SearchOutcome};
pub use sites::SiteSelector;
