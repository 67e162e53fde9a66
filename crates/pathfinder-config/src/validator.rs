//! Configuration validation.

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_inference(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_locator(config, &mut result);
        Self::validate_pipeline(config, &mut result);
        Self::validate_sites(config, &mut result);

        result
    }

    fn validate_inference(config: &Config, result: &mut ValidationResult) {
        if config.inference.model.trim().is_empty() {
            result.add_error(ValidationError::new(
                "inference.model",
                "Model cannot be empty",
            ));
        }

        if config.inference.timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "inference.timeout_secs",
                "timeout_secs must be greater than 0",
            ));
        }

        if config.inference.api_key.as_deref().is_none_or(str::is_empty) {
            result.add_warning(ValidationWarning::new(
                "inference.api_key",
                "No API key configured; every inference strategy will fall back",
            ));
        }

        if let Some(base_url) = &config.inference.base_url {
            if url::Url::parse(base_url).is_err() {
                result.add_error(ValidationError::new(
                    "inference.base_url",
                    format!("Invalid URL: {}", base_url),
                ));
            }
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        match url::Url::parse(&config.browser.cdp_endpoint) {
            Ok(endpoint) if matches!(endpoint.scheme(), "http" | "https") => {}
            Ok(endpoint) => {
                result.add_error(ValidationError::new(
                    "browser.cdp_endpoint",
                    format!("Expected an http(s) endpoint, got scheme '{}'", endpoint.scheme()),
                ));
            }
            Err(e) => {
                result.add_error(ValidationError::new(
                    "browser.cdp_endpoint",
                    format!("Invalid URL: {}", e),
                ));
            }
        }
    }

    fn validate_locator(config: &Config, result: &mut ValidationResult) {
        let locator = &config.locator;

        if locator.excerpt_chars == 0 {
            result.add_error(ValidationError::new(
                "locator.excerpt_chars",
                "excerpt_chars must be greater than 0",
            ));
        }

        if locator.excerpt_chars > 100_000 {
            result.add_warning(ValidationWarning::new(
                "locator.excerpt_chars",
                "excerpt_chars is very high (>100000), prompts may exceed the model context",
            ));
        }

        for (path, budget) in [
            ("locator.direct_budget_secs", locator.direct_budget_secs),
            ("locator.inference_budget_secs", locator.inference_budget_secs),
            ("locator.structural_budget_secs", locator.structural_budget_secs),
        ] {
            if budget == 0 {
                result.add_error(ValidationError::new(path, "Budget must be greater than 0"));
            }
        }

        if locator.inference_budget_secs < config.inference.timeout_secs {
            result.add_warning(ValidationWarning::new(
                "locator.inference_budget_secs",
                "Inference budget is shorter than the inference timeout; slow replies will be cut off",
            ));
        }
    }

    fn validate_pipeline(config: &Config, result: &mut ValidationResult) {
        if config.pipeline.max_listings == 0 {
            result.add_error(ValidationError::new(
                "pipeline.max_listings",
                "max_listings must be greater than 0",
            ));
        }

        if config.pipeline.task_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "pipeline.task_timeout_secs",
                "task_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_sites(config: &Config, result: &mut ValidationResult) {
        for (i, site) in config.sites.iter().enumerate() {
            if site.brand.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("sites[{}].brand", i),
                    "Brand cannot be empty",
                ));
            }
            if url::Url::parse(&site.url).is_err() {
                result.add_error(ValidationError::new(
                    format!("sites[{}].url", i),
                    format!("Invalid URL: {}", site.url),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
