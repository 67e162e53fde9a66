//! Core data model shared by every stage of a task.

mod intent;
mod listing;
mod locate;
mod task;

pub use intent::*;
pub use listing::*;
pub use locate::*;
pub use task::*;
