//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a file, falling back to defaults when the
    /// file does not exist. Parse errors are still reported.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("static pattern");

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.pathfinder`).
    pub fn expand_path(path: &Path) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.inference.model, "gpt-4o-mini");
        assert_eq!(config.pipeline.max_listings, 5);
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [inference]
            model = "gpt-4o"
            base_url = "http://localhost:8000/v1"
            timeout_secs = 10

            [browser]
            cdp_endpoint = "http://127.0.0.1:9333"

            [pipeline]
            settle_after_search_ms = 0
            max_listings = 3
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.inference.model, "gpt-4o");
        assert_eq!(config.inference.timeout_secs, 10);
        assert_eq!(
            config.inference.base_url.as_deref(),
            Some("http://localhost:8000/v1")
        );
        assert_eq!(config.browser.cdp_endpoint, "http://127.0.0.1:9333");
        assert_eq!(config.pipeline.settle_after_search_ms, 0);
        assert_eq!(config.pipeline.max_listings, 3);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[locator]").unwrap();
        writeln!(file, "excerpt_chars = 4000").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.locator.excerpt_chars, 4000);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/pathfinder.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            ConfigLoader::load_or_default(Path::new("/nonexistent/path/pathfinder.toml")).unwrap();
        assert_eq!(config.browser.cdp_endpoint, "http://localhost:9222");
    }

    #[test]
    fn test_load_or_default_reports_parse_errors() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid = [unclosed").unwrap();
        assert!(ConfigLoader::load_or_default(file.path()).is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("PATHFINDER_TEST_API_KEY", "sk-test");
        }
        let content = "[inference]\napi_key = \"${PATHFINDER_TEST_API_KEY}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.inference.api_key.as_deref(), Some("sk-test"));
        unsafe {
            std::env::remove_var("PATHFINDER_TEST_API_KEY");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${PATHFINDER_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let expanded = ConfigLoader::expand_path(Path::new("/var/log/pathfinder"));
        assert_eq!(expanded, PathBuf::from("/var/log/pathfinder"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path(Path::new("~/logs"));
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("logs"));
    }
}
