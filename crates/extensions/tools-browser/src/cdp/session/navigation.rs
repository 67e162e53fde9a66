//! Navigation operations for CDP page session.

use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Navigate to URL and wait up to `timeout` for the document to load.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(format!(
                "{}: {}",
                url,
                error.as_str().unwrap_or("Unknown error")
            )));
        }

        self.wait_for_load(timeout).await?;

        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Poll `document.readyState` until the page is interactive.
    pub async fn wait_for_load(&self, timeout: Duration) -> Result<(), CdpError> {
        let deadline = Instant::now() + timeout;

        loop {
            let result = self.evaluate("document.readyState").await?;

            if matches!(result.as_str(), Some("complete" | "interactive")) {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(LOAD_POLL_INTERVAL).await;
        }
    }

    /// Get current URL.
    pub async fn get_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }
}
