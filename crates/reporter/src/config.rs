//! Reporter configuration
//!
//! All inputs are read from environment-style key/value pairs. The
//! variable names match the ones the Playwright JSON reporter and the
//! stats collector already use, so existing CI setups keep working.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::{ReporterError, ReporterResult};

/// Endpoint used when `STATS_ENDPOINT` is absent or empty
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/run/results";

/// Artifact file name used when `PLAYWRIGHT_JSON_OUTPUT_NAME` is absent
pub const DEFAULT_ARTIFACT_NAME: &str = "test-results.json";

pub const ENV_ENDPOINT: &str = "STATS_ENDPOINT";
pub const ENV_ARTIFACT_FILE: &str = "PLAYWRIGHT_JSON_OUTPUT_FILE";
pub const ENV_ARTIFACT_DIR: &str = "PLAYWRIGHT_JSON_OUTPUT_DIR";
pub const ENV_ARTIFACT_NAME: &str = "PLAYWRIGHT_JSON_OUTPUT_NAME";
pub const ENV_AUTH_TOKEN: &str = "STAT_REPORTER_AUTH_TOKEN";
pub const ENV_FORCE_IPV4: &str = "STATS_FORCE_IPV4";
pub const ENV_LEGACY_AUTH_HEADER: &str = "STATS_LEGACY_AUTH_HEADER";

/// What to send in `Authorization` when no bearer token is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTokenPolicy {
    /// Leave the header off the request
    #[default]
    Omit,
    /// Send `Bearer undefined`, as older collectors expect
    LegacyPlaceholder,
}

/// Reporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Collection endpoint URL
    pub endpoint_url: String,

    /// Explicit results file path, overrides directory and name
    pub artifact_file_path: Option<PathBuf>,

    /// Directory holding the results file (None = current directory)
    pub artifact_directory: Option<PathBuf>,

    /// Results file name inside `artifact_directory`
    pub artifact_file_name: Option<String>,

    /// Bearer token for the collector
    #[serde(skip_serializing)]
    pub bearer_token: Option<String>,

    /// Resolve the endpoint host to IPv4 addresses only
    pub force_ipv4: bool,

    /// Header behavior when `bearer_token` is None
    pub missing_token: MissingTokenPolicy,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            artifact_file_path: None,
            artifact_directory: None,
            artifact_file_name: None,
            bearer_token: None,
            force_ipv4: true,
            missing_token: MissingTokenPolicy::Omit,
        }
    }
}

impl ReporterConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> ReporterResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> ReporterResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let mut config = Self::default();

        if let Some(url) = get(ENV_ENDPOINT) {
            config.endpoint_url = url;
        }
        config.artifact_file_path = get(ENV_ARTIFACT_FILE).map(PathBuf::from);
        config.artifact_directory = get(ENV_ARTIFACT_DIR).map(PathBuf::from);
        config.artifact_file_name = get(ENV_ARTIFACT_NAME);
        config.bearer_token = get(ENV_AUTH_TOKEN);

        if let Some(raw) = get(ENV_FORCE_IPV4) {
            config.force_ipv4 = parse_flag(ENV_FORCE_IPV4, &raw)?;
        }
        if let Some(raw) = get(ENV_LEGACY_AUTH_HEADER) {
            if parse_flag(ENV_LEGACY_AUTH_HEADER, &raw)? {
                config.missing_token = MissingTokenPolicy::LegacyPlaceholder;
            }
        }

        Ok(config)
    }

    /// Value of the `Authorization` header, if one should be sent
    pub fn authorization_header(&self) -> Option<String> {
        match (&self.bearer_token, self.missing_token) {
            (Some(token), _) => Some(format!("Bearer {}", token)),
            (None, MissingTokenPolicy::LegacyPlaceholder) => Some("Bearer undefined".to_string()),
            (None, MissingTokenPolicy::Omit) => None,
        }
    }
}

fn parse_flag(key: &str, raw: &str) -> ReporterResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ReporterError::Configuration(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ReporterConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT);
        assert!(config.artifact_file_path.is_none());
        assert!(config.bearer_token.is_none());
        assert!(config.force_ipv4);
        assert_eq!(config.missing_token, MissingTokenPolicy::Omit);
    }

    #[test]
    fn test_empty_endpoint_falls_back_to_default() {
        let config = ReporterConfig::from_lookup(lookup(&[(ENV_ENDPOINT, "")])).unwrap();
        assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_reads_all_keys() {
        let config = ReporterConfig::from_lookup(lookup(&[
            (ENV_ENDPOINT, "https://stats.example.com/api/run/results"),
            (ENV_ARTIFACT_FILE, "/tmp/out.json"),
            (ENV_ARTIFACT_DIR, "/tmp/results"),
            (ENV_ARTIFACT_NAME, "run.json"),
            (ENV_AUTH_TOKEN, "s3cret"),
            (ENV_FORCE_IPV4, "false"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint_url, "https://stats.example.com/api/run/results");
        assert_eq!(config.artifact_file_path, Some(PathBuf::from("/tmp/out.json")));
        assert_eq!(config.artifact_directory, Some(PathBuf::from("/tmp/results")));
        assert_eq!(config.artifact_file_name.as_deref(), Some("run.json"));
        assert_eq!(config.bearer_token.as_deref(), Some("s3cret"));
        assert!(!config.force_ipv4);
    }

    #[test]
    fn test_invalid_flag_is_configuration_error() {
        let err = ReporterConfig::from_lookup(lookup(&[(ENV_FORCE_IPV4, "maybe")])).unwrap_err();
        assert!(matches!(err, ReporterError::Configuration(_)));
    }

    #[test]
    fn test_authorization_header_policy() {
        let mut config = ReporterConfig::default();
        assert_eq!(config.authorization_header(), None);

        config.missing_token = MissingTokenPolicy::LegacyPlaceholder;
        assert_eq!(config.authorization_header().as_deref(), Some("Bearer undefined"));

        config.bearer_token = Some("abc".to_string());
        assert_eq!(config.authorization_header().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn test_legacy_header_flag() {
        let config =
            ReporterConfig::from_lookup(lookup(&[(ENV_LEGACY_AUTH_HEADER, "1")])).unwrap();
        assert_eq!(config.missing_token, MissingTokenPolicy::LegacyPlaceholder);
    }
}
