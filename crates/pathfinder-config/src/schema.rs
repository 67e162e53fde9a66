//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inference: InferenceConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub locator: LocatorConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Extra brand to site rows, consulted before the built-in table.
    #[serde(default)]
    pub sites: Vec<SiteEntry>,
}

/// Inference service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: None,
            timeout_secs: default_inference_timeout(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_inference_timeout() -> u64 {
    30
}

/// Browser (CDP) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_cdp_endpoint")]
    pub cdp_endpoint: String,

    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            cdp_endpoint: default_cdp_endpoint(),
            navigation_timeout_secs: default_navigation_timeout(),
        }
    }
}

fn default_cdp_endpoint() -> String {
    "http://localhost:9222".to_string()
}

fn default_navigation_timeout() -> u64 {
    30
}

/// Element-resolution cascade timing and sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Per-candidate visibility wait for generic selectors.
    #[serde(default = "default_direct_wait_ms")]
    pub direct_wait_ms: u64,

    /// Per-candidate visibility wait for site-profile selectors.
    #[serde(default = "default_primed_wait_ms")]
    pub primed_wait_ms: u64,

    /// Pause after clicking a site-profile opener.
    #[serde(default = "default_opener_settle_ms")]
    pub opener_settle_ms: u64,

    #[serde(default = "default_direct_budget")]
    pub direct_budget_secs: u64,

    #[serde(default = "default_inference_budget")]
    pub inference_budget_secs: u64,

    #[serde(default = "default_structural_budget")]
    pub structural_budget_secs: u64,

    /// Markup characters sent to the inference service.
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

impl LocatorConfig {
    pub fn direct_wait(&self) -> Duration {
        Duration::from_millis(self.direct_wait_ms)
    }

    pub fn primed_wait(&self) -> Duration {
        Duration::from_millis(self.primed_wait_ms)
    }

    pub fn opener_settle(&self) -> Duration {
        Duration::from_millis(self.opener_settle_ms)
    }

    pub fn direct_budget(&self) -> Duration {
        Duration::from_secs(self.direct_budget_secs)
    }

    pub fn inference_budget(&self) -> Duration {
        Duration::from_secs(self.inference_budget_secs)
    }

    pub fn structural_budget(&self) -> Duration {
        Duration::from_secs(self.structural_budget_secs)
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            direct_wait_ms: default_direct_wait_ms(),
            primed_wait_ms: default_primed_wait_ms(),
            opener_settle_ms: default_opener_settle_ms(),
            direct_budget_secs: default_direct_budget(),
            inference_budget_secs: default_inference_budget(),
            structural_budget_secs: default_structural_budget(),
            excerpt_chars: default_excerpt_chars(),
        }
    }
}

fn default_direct_wait_ms() -> u64 {
    2000
}

fn default_primed_wait_ms() -> u64 {
    3000
}

fn default_opener_settle_ms() -> u64 {
    2000
}

fn default_direct_budget() -> u64 {
    60
}

fn default_inference_budget() -> u64 {
    35
}

fn default_structural_budget() -> u64 {
    10
}

fn default_excerpt_chars() -> usize {
    8000
}

/// Pipeline stage waits and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Visibility wait for the located search input before typing.
    #[serde(default = "default_input_wait_ms")]
    pub input_wait_ms: u64,

    /// Wait for the submit control before falling back to Enter.
    #[serde(default = "default_submit_wait_ms")]
    pub submit_wait_ms: u64,

    #[serde(default = "default_settle_after_navigation_ms")]
    pub settle_after_navigation_ms: u64,

    #[serde(default = "default_settle_after_search_ms")]
    pub settle_after_search_ms: u64,

    #[serde(default = "default_max_listings")]
    pub max_listings: usize,

    /// Ceiling for a whole task, applied by the caller.
    #[serde(default = "default_task_timeout")]
    pub task_timeout_secs: u64,
}

impl PipelineConfig {
    pub fn input_wait(&self) -> Duration {
        Duration::from_millis(self.input_wait_ms)
    }

    pub fn submit_wait(&self) -> Duration {
        Duration::from_millis(self.submit_wait_ms)
    }

    pub fn settle_after_navigation(&self) -> Duration {
        Duration::from_millis(self.settle_after_navigation_ms)
    }

    pub fn settle_after_search(&self) -> Duration {
        Duration::from_millis(self.settle_after_search_ms)
    }

    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_wait_ms: default_input_wait_ms(),
            submit_wait_ms: default_submit_wait_ms(),
            settle_after_navigation_ms: default_settle_after_navigation_ms(),
            settle_after_search_ms: default_settle_after_search_ms(),
            max_listings: default_max_listings(),
            task_timeout_secs: default_task_timeout(),
        }
    }
}

fn default_input_wait_ms() -> u64 {
    5000
}

fn default_submit_wait_ms() -> u64 {
    2000
}

fn default_settle_after_navigation_ms() -> u64 {
    2000
}

fn default_settle_after_search_ms() -> u64 {
    5000
}

fn default_max_listings() -> usize {
    5
}

fn default_task_timeout() -> u64 {
    300
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files; `~` is expanded.
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("~/.pathfinder/logs")
}

/// A brand to site mapping row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEntry {
    pub brand: String,
    pub url: String,
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
