//! Instrument endpoint configuration.

use serde::{Deserialize, Serialize};

/// Where the instrument API and preview service live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Base URL of the instrument API (e.g., "http://mx-jungfrau-1/jf").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Status document, relative to `base_url`.
    #[serde(default = "default_status_path")]
    pub status_path: String,
    /// Re-initialization command, relative to `base_url`.
    #[serde(default = "default_command_path")]
    pub initialize_path: String,
    #[serde(default = "default_spot_sequence_path")]
    pub spot_sequence_path: String,
    #[serde(default = "default_spot_per_angle_path")]
    pub spot_per_angle_path: String,
    #[serde(default = "default_spot_resolution_path")]
    pub spot_resolution_path: String,
    /// Root of the preview image service.
    #[serde(default = "default_preview_base_url")]
    pub preview_base_url: String,
    /// Per-request timeout in milliseconds. Unset uses the transport default.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// Instrument title shown in the dashboard header.
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_base_url() -> String {
    "http://localhost/jf".to_string()
}

fn default_status_path() -> String {
    "/".to_string()
}

fn default_command_path() -> String {
    "/command/initialize".to_string()
}

fn default_spot_sequence_path() -> String {
    "/spot/sequence".to_string()
}

fn default_spot_per_angle_path() -> String {
    "/spot/per_angle".to_string()
}

fn default_spot_resolution_path() -> String {
    "/spot/resolution".to_string()
}

fn default_preview_base_url() -> String {
    "http://localhost:5232".to_string()
}

fn default_title() -> String {
    "JUNGFRAU 4M".to_string()
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            status_path: default_status_path(),
            initialize_path: default_command_path(),
            spot_sequence_path: default_spot_sequence_path(),
            spot_per_angle_path: default_spot_per_angle_path(),
            spot_resolution_path: default_spot_resolution_path(),
            preview_base_url: default_preview_base_url(),
            request_timeout_ms: None,
            title: default_title(),
        }
    }
}

impl InstrumentConfig {
    /// Config with all endpoints under `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Resolve a configured path against the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = InstrumentConfig::default();
        assert_eq!(config.url(&config.status_path), "http://localhost/jf/");
        assert_eq!(
            config.url(&config.spot_sequence_path),
            "http://localhost/jf/spot/sequence"
        );
        assert_eq!(
            config.url(&config.initialize_path),
            "http://localhost/jf/command/initialize"
        );
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = InstrumentConfig::with_base_url("http://det:5232/detector/api/jf-0.1.0/");
        assert_eq!(
            config.url("command/initialize"),
            "http://det:5232/detector/api/jf-0.1.0/command/initialize"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: InstrumentConfig = toml::from_str(r#"base_url = "http://mx-jungfrau-1/jf""#).unwrap();
        assert_eq!(config.base_url, "http://mx-jungfrau-1/jf");
        assert_eq!(config.spot_resolution_path, "/spot/resolution");
        assert_eq!(config.title, "JUNGFRAU 4M");
        assert!(config.request_timeout_ms.is_none());
    }
}
