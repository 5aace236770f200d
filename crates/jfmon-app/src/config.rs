//! Application configuration.
//!
//! A TOML file layered with `JFMON__`-prefixed environment overrides, e.g.
//! `JFMON__SYNC__STATUS_INTERVAL_MS=5000` or
//! `JFMON__INSTRUMENT__BASE_URL=http://mx-jungfrau-1/jf`.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use jfmon_client::InstrumentConfig;
use jfmon_dashboard::DashboardConfig;
use jfmon_sync::SyncConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "JFMON";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default log level; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub instrument: InstrumentConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load `path` (optional) with environment overrides and validate.
    ///
    /// A missing file yields the defaults plus any overrides.
    pub fn load(path: &str) -> AppResult<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: &str, env: Environment) -> AppResult<Self> {
        let settings = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(false))
            .add_source(env.separator("__").try_parsing(true))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to load {path}: {e}")))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| AppError::Config(format!("Failed to parse {path}: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document without file or environment layering.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml_from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.sync.validate()?;
        if self.instrument.base_url.trim().is_empty() {
            return Err(AppError::Config("instrument.base_url is empty".to_string()));
        }
        Ok(())
    }

    pub fn file_exists(path: &str) -> bool {
        Path::new(path).exists()
    }
}

fn toml_from_str(content: &str) -> AppResult<AppConfig> {
    Config::builder()
        .add_source(File::from_str(content, FileFormat::Toml))
        .build()
        .and_then(|settings| settings.try_deserialize())
        .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_sections_default_when_absent() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.sync.status_interval_ms, 1000);
        assert_eq!(config.instrument.spot_sequence_path, "/spot/sequence");
        assert_eq!(config.dashboard.port, 8080);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [instrument]
            base_url = "http://mx-jungfrau-1/jf"
            preview_base_url = "http://mx-jungfrau-1:5232"

            [sync]
            status_interval_ms = 5000
            image_interval_ms = 2000
            logarithmic = true
            "#,
        )
        .unwrap();

        assert_eq!(config.instrument.base_url, "http://mx-jungfrau-1/jf");
        assert_eq!(config.sync.status_interval_ms, 5000);
        assert_eq!(config.sync.sequence_interval_ms, 1000);
        assert!(config.sync.logarithmic);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = AppConfig::from_toml("[sync]\nsequence_interval_ms = 0");
        assert!(matches!(result, Err(AppError::Sync(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let env = Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new()));
        let config = AppConfig::load_with_env("does/not/exist.toml", env).unwrap();
        assert_eq!(config.sync.image_interval_ms, 500);
    }

    #[test]
    fn test_environment_overrides() {
        let vars = HashMap::from([
            ("JFMON__SYNC__STATUS_INTERVAL_MS".to_string(), "250".to_string()),
            ("JFMON__INSTRUMENT__TITLE".to_string(), "JUNGFRAU 1M".to_string()),
        ]);
        let env = Environment::with_prefix(ENV_PREFIX).source(Some(vars));
        let config = AppConfig::load_with_env("does/not/exist.toml", env).unwrap();

        assert_eq!(config.sync.status_interval_ms, 250);
        assert_eq!(config.instrument.title, "JUNGFRAU 1M");
    }
}
