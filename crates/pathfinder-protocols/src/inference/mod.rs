//! Inference service protocol definitions.
//!
//! The inference client turns a prompt pair into a text completion. Replies
//! are untrusted: [`parse_structured`] validates them against a concrete
//! type and treats anything else as a miss.

mod reply;
mod request;
mod traits;

pub use reply::*;
pub use request::*;
pub use traits::*;
