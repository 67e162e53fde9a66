//! CLI definitions for Pathfinder.

use std::path::PathBuf;

use clap::Parser;

/// Pathfinder CLI.
#[derive(Parser)]
#[command(name = "pathfinder")]
#[command(about = "Find products on a retailer site from a free-text request")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.pathfinder/config.toml)
    #[arg(short, long, env = "PATHFINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Chrome remote debugging endpoint, overrides `browser.cdp_endpoint`
    #[arg(long)]
    pub cdp_endpoint: Option<String>,

    /// Inference model, overrides `inference.model`
    #[arg(long)]
    pub model: Option<String>,

    /// What to look for, e.g. "iPhone 15 Pro 256GB in blue"
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl Cli {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_words_are_joined() {
        let cli = Cli::parse_from(["pathfinder", "iphone", "15", "pro"]);
        assert_eq!(cli.query_text(), "iphone 15 pro");
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "pathfinder",
            "--cdp-endpoint",
            "http://127.0.0.1:9333",
            "--model",
            "gpt-4o",
            "lenovo laptop",
        ]);
        assert_eq!(cli.cdp_endpoint.as_deref(), Some("http://127.0.0.1:9333"));
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
        assert_eq!(cli.query, vec!["lenovo laptop".to_string()]);
    }

    #[test]
    fn test_query_is_required() {
        assert!(Cli::try_parse_from(["pathfinder"]).is_err());
    }
}
