//! [`DocumentPort`] backed by a CDP page session.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, trace};

use pathfinder_protocols::{DocumentError, DocumentPort, ElementHandle};

use crate::cdp::PageSession;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What the page reports for a selector at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Missing,
    Hidden,
    Visible,
}

impl Probe {
    fn from_value(value: &Value) -> Self {
        match value.as_str() {
            Some("visible") => Probe::Visible,
            Some("hidden") => Probe::Hidden,
            _ => Probe::Missing,
        }
    }
}

/// A live browser tab driven over CDP.
///
/// Handles carry the selector they were resolved from; each operation
/// re-resolves it in the page. Selectors the page cannot parse behave like
/// selectors that match nothing.
pub struct CdpDocument {
    session: PageSession,
    navigation_timeout: Duration,
}

impl CdpDocument {
    pub fn new(session: PageSession, navigation_timeout: Duration) -> Self {
        Self {
            session,
            navigation_timeout,
        }
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    async fn probe(&self, selector: &str) -> Result<Probe, DocumentError> {
        let value = self.session.evaluate(&probe_script(selector)).await?;
        trace!(selector, state = ?value, "Probed selector");
        Ok(Probe::from_value(&value))
    }

    /// Run an element script that returns `true` on success.
    async fn run_on_element(&self, script: String, handle: &ElementHandle) -> Result<(), DocumentError> {
        match self.session.evaluate(&script).await? {
            Value::Bool(true) => Ok(()),
            _ => Err(DocumentError::InteractionFailed(format!(
                "element {} is no longer attached",
                handle
            ))),
        }
    }
}

#[async_trait]
impl DocumentPort for CdpDocument {
    async fn current_uri(&self) -> Result<String, DocumentError> {
        Ok(self.session.get_url().await?)
    }

    async fn navigate(&self, uri: &str) -> Result<(), DocumentError> {
        Ok(self.session.navigate(uri, self.navigation_timeout).await?)
    }

    async fn query(&self, selector: &str) -> Result<Option<ElementHandle>, DocumentError> {
        Ok(match self.probe(selector).await? {
            Probe::Missing => None,
            _ => Some(ElementHandle::new(selector)),
        })
    }

    async fn is_visible(&self, handle: &ElementHandle) -> Result<bool, DocumentError> {
        Ok(self.probe(handle.selector()).await? == Probe::Visible)
    }

    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
        visible: bool,
    ) -> Result<Option<ElementHandle>, DocumentError> {
        let deadline = Instant::now() + timeout;

        loop {
            let ready = match self.probe(selector).await? {
                Probe::Visible => true,
                Probe::Hidden => !visible,
                Probe::Missing => false,
            };
            if ready {
                return Ok(Some(ElementHandle::new(selector)));
            }

            let now = Instant::now();
            if now >= deadline {
                debug!(selector, visible, "Wait ran out");
                return Ok(None);
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), DocumentError> {
        let center = self.session.evaluate(&center_script(handle.selector())).await?;
        let (Some(x), Some(y)) = (center["x"].as_f64(), center["y"].as_f64()) else {
            return Err(DocumentError::InteractionFailed(format!(
                "element {} has no clickable box",
                handle
            )));
        };
        Ok(self.session.click(x, y).await?)
    }

    async fn fill(&self, handle: &ElementHandle, text: &str) -> Result<(), DocumentError> {
        self.run_on_element(clear_script(handle.selector()), handle)
            .await?;
        if !text.is_empty() {
            self.session.type_text(text).await?;
        }
        Ok(())
    }

    async fn press_enter(&self, handle: &ElementHandle) -> Result<(), DocumentError> {
        self.run_on_element(focus_script(handle.selector()), handle)
            .await?;
        Ok(self.session.press_key("Enter").await?)
    }

    async fn raw_markup(&self) -> Result<String, DocumentError> {
        Ok(self.session.get_content().await?)
    }
}

/// Selector as a JavaScript string literal.
fn js_string(selector: &str) -> String {
    Value::String(selector.to_string()).to_string()
}

/// Wrap `body` so it runs with `el` bound to the first match. Evaluates to
/// `fallback` when nothing matches or the selector does not parse.
fn with_element(selector: &str, fallback: &str, body: &str) -> String {
    format!(
        "(() => {{ let el; try {{ el = document.querySelector({}); }} catch (e) {{ return {fallback}; }} if (!el) return {fallback}; {body} }})()",
        js_string(selector),
    )
}

fn probe_script(selector: &str) -> String {
    with_element(
        selector,
        "'missing'",
        "const style = window.getComputedStyle(el); \
         const rect = el.getBoundingClientRect(); \
         const shown = style.display !== 'none' && style.visibility !== 'hidden' \
           && rect.width > 0 && rect.height > 0; \
         return shown ? 'visible' : 'hidden';",
    )
}

fn center_script(selector: &str) -> String {
    with_element(
        selector,
        "null",
        "el.scrollIntoView({ block: 'center', inline: 'center' }); \
         const rect = el.getBoundingClientRect(); \
         if (rect.width === 0 || rect.height === 0) return null; \
         return { x: rect.left + rect.width / 2, y: rect.top + rect.height / 2 };",
    )
}

fn focus_script(selector: &str) -> String {
    with_element(selector, "false", "el.focus(); return true;")
}

fn clear_script(selector: &str) -> String {
    with_element(
        selector,
        "false",
        "el.focus(); \
         if ('value' in el) { el.value = ''; } else { el.textContent = ''; } \
         el.dispatchEvent(new Event('input', { bubbles: true })); \
         return true;",
    )
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
