use crate::config::Config;
use crate::error::{Result, ToxicError, ValidationError};
use chrono::format::{Item, StrftimeItems};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_source(config, &mut errors);
        Self::validate_http(config, &mut errors);
        Self::validate_display(config, &mut errors);
        Self::validate_export(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ToxicError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != "1.0.0" {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_source(config: &Config, errors: &mut Vec<ValidationError>) {
        let base_url = &config.source.base_url;
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            errors.push(ValidationError::new(
                "source.base_url",
                format!("Base URL must start with http:// or https://, got '{}'", base_url),
            ));
        }

        if config.source.original_dir.trim_matches('/').is_empty() {
            errors.push(ValidationError::new(
                "source.original_dir",
                "Original data directory cannot be empty",
            ));
        }

        if config.source.translated_dir.trim_matches('/').is_empty() {
            errors.push(ValidationError::new(
                "source.translated_dir",
                "Translated data directory cannot be empty",
            ));
        }
    }

    fn validate_http(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.http.timeout_secs == 0 {
            errors.push(ValidationError::new(
                "http.timeout_secs",
                "Timeout must be greater than 0",
            ));
        }

        if config.http.user_agent.trim().is_empty() {
            errors.push(ValidationError::new(
                "http.user_agent",
                "User agent cannot be empty",
            ));
        }
    }

    fn validate_display(config: &Config, errors: &mut Vec<ValidationError>) {
        let pattern = &config.display.date_format;
        if pattern.is_empty() {
            errors.push(ValidationError::new(
                "display.date_format",
                "Date format cannot be empty",
            ));
        } else if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            errors.push(ValidationError::new(
                "display.date_format",
                format!("Invalid strftime pattern: {}", pattern),
            ));
        }
    }

    fn validate_export(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.export.output_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "export.output_dir",
                "Export directory cannot be empty",
            ));
        }
    }
}
