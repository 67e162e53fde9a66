//! Built-in locate strategies, in default cascade order.

mod direct;
mod inference;
mod structural;

pub use direct::DirectCandidateStrategy;
pub use inference::InferenceStrategy;
pub use structural::StructuralParseStrategy;
