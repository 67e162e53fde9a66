//! Document port definition.
//!
//! A document port exposes a live, rendered page. Implementations must
//! report "no such element" (including selectors the page cannot parse) as
//! `Ok(None)` and reserve `Err` for transport failures.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Opaque reference to an element, resolvable by the port that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The selector this handle was resolved from.
    pub fn selector(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live document owned by a single task for its duration.
#[async_trait]
pub trait DocumentPort: Send + Sync {
    /// URI of the currently loaded document.
    async fn current_uri(&self) -> Result<String, DocumentError>;

    /// Load `uri` and wait for the document to become interactive.
    async fn navigate(&self, uri: &str) -> Result<(), DocumentError>;

    /// Look up the first element matching `selector` without waiting.
    async fn query(&self, selector: &str) -> Result<Option<ElementHandle>, DocumentError>;

    /// Whether the element is rendered and interaction-ready right now.
    async fn is_visible(&self, handle: &ElementHandle) -> Result<bool, DocumentError>;

    /// Wait up to `timeout` for `selector` to match (and, when
    /// `visible` is set, to be visible). `Ok(None)` means the wait ran out.
    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
        visible: bool,
    ) -> Result<Option<ElementHandle>, DocumentError>;

    async fn click(&self, handle: &ElementHandle) -> Result<(), DocumentError>;

    /// Replace the element's value with `text`.
    async fn fill(&self, handle: &ElementHandle, text: &str) -> Result<(), DocumentError>;

    async fn press_enter(&self, handle: &ElementHandle) -> Result<(), DocumentError>;

    /// Serialized markup of the current document.
    async fn raw_markup(&self) -> Result<String, DocumentError>;
}
