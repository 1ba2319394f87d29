//! Configuration management for toxic-repos
//!
//! Loads the TOML configuration, applies `TOXIC_REPOS_*` environment
//! overrides and validates the result before use.

use crate::dataset::DataSourceMode;
use crate::error::{Result, ToxicError};
use crate::view::{RenderOptions, DEFAULT_DATE_FORMAT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Prefix of environment variables that override config values
const ENV_PREFIX: &str = "TOXIC_REPOS_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub source: SourceConfig,
    pub http: HttpConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Where the published dataset lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    /// Directory holding the untranslated files
    pub original_dir: String,
    /// Directory holding the translated files
    pub translated_dir: String,
    pub default_mode: DataSourceMode,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Result card presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// strftime pattern for card dates
    pub date_format: String,
}

/// Export destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToxicError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ToxicError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Load the file at `path`, or defaults (with env overrides) when it is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        tracing::warn!(
            "Config file not found, using defaults. Run 'toxic-repos config init' to create one."
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ToxicError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: TOXIC_REPOS_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix(ENV_PREFIX) {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "SOURCE__BASE_URL" => {
                self.source.base_url = value.to_string();
            }
            "SOURCE__DEFAULT_MODE" => {
                self.source.default_mode =
                    value
                        .parse()
                        .map_err(|message| ToxicError::InvalidConfigValue {
                            path: path.to_string(),
                            message,
                        })?;
            }
            "HTTP__TIMEOUT_SECS" => {
                self.http.timeout_secs =
                    value.parse().map_err(|_| ToxicError::InvalidConfigValue {
                        path: path.to_string(),
                        message: format!("Cannot parse '{}' as seconds", value),
                    })?;
            }
            "DISPLAY__DATE_FORMAT" => {
                self.display.date_format = value.to_string();
            }
            "EXPORT__OUTPUT_DIR" => {
                self.export.output_dir = PathBuf::from(value);
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Card rendering settings derived from `[display]`
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            date_format: self.display.date_format.clone(),
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ToxicError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("toxic-repos").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: "1.0.0".to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            source: SourceConfig {
                base_url: "https://raw.githubusercontent.com/Sudo-Ivan/toxic-repos-en/main"
                    .to_string(),
                original_dir: "data".to_string(),
                translated_dir: "data-en".to_string(),
                default_mode: DataSourceMode::Translated,
            },
            http: HttpConfig {
                timeout_secs: 30,
                user_agent: concat!("toxic-repos/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            display: DisplayConfig {
                date_format: DEFAULT_DATE_FORMAT.to_string(),
            },
            export: ExportConfig {
                output_dir: PathBuf::from("."),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.source.default_mode = DataSourceMode::Original;
        config.http.timeout_secs = 5;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.source.default_mode, DataSourceMode::Original);
        assert_eq!(loaded.http.timeout_secs, 5);
        assert_eq!(loaded.source.translated_dir, "data-en");
    }

    #[test]
    fn test_mode_serialized_lowercase() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(content.contains("default_mode = \"translated\""));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ToxicError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_set_value_from_env() {
        let mut config = Config::default();
        config
            .set_value_from_env("SOURCE__DEFAULT_MODE", "original")
            .unwrap();
        config
            .set_value_from_env("EXPORT__OUTPUT_DIR", "/tmp/exports")
            .unwrap();
        assert_eq!(config.source.default_mode, DataSourceMode::Original);
        assert_eq!(config.export.output_dir, PathBuf::from("/tmp/exports"));

        assert!(config
            .set_value_from_env("HTTP__TIMEOUT_SECS", "soon")
            .is_err());
        assert!(config
            .set_value_from_env("SOURCE__DEFAULT_MODE", "klingon")
            .is_err());
        // unknown keys are ignored
        assert!(config.set_value_from_env("NOPE", "x").is_ok());
    }
}
