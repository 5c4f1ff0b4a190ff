//! Configuration validation.

use crate::error::ConfigError;
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

    /// Fail with the first error, reporting how many others were found.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        let mut errors = self.errors.into_iter();
        let Some(first) = errors.next() else {
            return Ok(self.warnings);
        };
        let others = errors.count();
        let message = if others == 0 {
            first.message
        } else {
            format!("{} (and {} more)", first.message, others)
        };
        Err(ConfigError::InvalidValue {
            field: first.path,
            message,
        })
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
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_context(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;

        if browser.script_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "browser.script_timeout_ms",
                "script_timeout_ms must be greater than 0",
            ));
        }

        if browser.navigation_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "browser.navigation_timeout_ms",
                "navigation_timeout_ms must be greater than 0",
            ));
        }

        if browser.load_grace_ms >= browser.navigation_timeout_ms {
            result.add_error(ValidationError::new(
                "browser.load_grace_ms",
                "load_grace_ms must be shorter than navigation_timeout_ms",
            ));
        }

        if !browser.initial_browser_page.is_empty() {
            match url::Url::parse(&browser.initial_browser_page) {
                Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
                _ => result.add_error(ValidationError::new(
                    "browser.initial_browser_page",
                    "initial_browser_page must be an http:// or https:// URL",
                )),
            }
        }

        if browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "debug_port cannot be 0",
            ));
        }
    }

    fn validate_context(config: &Config, result: &mut ValidationResult) {
        let context = &config.context;

        if context.chunk_size == 0 {
            result.add_error(ValidationError::new(
                "context.chunk_size",
                "chunk_size must be greater than 0",
            ));
        }

        if context.remove_old_pages && context.page_summary {
            result.add_warning(ValidationWarning::new(
                "context.page_summary",
                "remove_old_pages takes priority, page_summary will be ignored",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, valid_levels
                ),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
