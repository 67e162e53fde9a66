//! Element-resolution cascade.
//!
//! A [`LocatorCascade`] runs an ordered list of [`Strategy`] implementations
//! against a live document, each under its own time budget, and returns the
//! first target any of them finds.

pub mod cascade;
pub mod catalog;
pub mod markup;
pub mod profile;
pub mod strategies;

pub use cascade::{LocatorCascade, Strategy};
pub use catalog::CandidateCatalog;
pub use profile::SiteProfile;
pub use strategies::{DirectCandidateStrategy, InferenceStrategy, StructuralParseStrategy};
