//! CLI Commands

pub mod config;
pub mod run;
pub mod upload;

use std::path::PathBuf;
use clap::{Args, ValueEnum};
use runstats_reporter::config::MissingTokenPolicy;
use runstats_reporter::{ReporterConfig, ReporterResult, RunStatus};

/// Reporter settings. Anything not given on the command line falls back
/// to the `STATS_*` / `PLAYWRIGHT_JSON_OUTPUT_*` environment variables.
#[derive(Args, Debug, Clone, Default)]
pub struct ReporterArgs {
    /// Stats collector endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Explicit path to the JSON results file
    #[arg(long)]
    pub results_file: Option<PathBuf>,

    /// Directory containing the JSON results file
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// File name of the JSON results file
    #[arg(long)]
    pub results_name: Option<String>,

    /// Resolve the endpoint over IPv6 as well as IPv4
    #[arg(long)]
    pub allow_ipv6: bool,

    /// Send `Bearer undefined` when no token is configured
    #[arg(long)]
    pub legacy_auth_header: bool,
}

impl ReporterArgs {
    /// Environment configuration with command-line overrides applied
    pub fn resolve(&self) -> ReporterResult<ReporterConfig> {
        let config = ReporterConfig::from_env()?;
        Ok(self.apply(config))
    }

    fn apply(&self, mut config: ReporterConfig) -> ReporterConfig {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint_url = endpoint.clone();
        }
        if let Some(file) = &self.results_file {
            config.artifact_file_path = Some(file.clone());
        }
        if let Some(dir) = &self.results_dir {
            config.artifact_directory = Some(dir.clone());
        }
        if let Some(name) = &self.results_name {
            config.artifact_file_name = Some(name.clone());
        }
        if self.allow_ipv6 {
            config.force_ipv4 = false;
        }
        if self.legacy_auth_header {
            config.missing_token = MissingTokenPolicy::LegacyPlaceholder;
        }
        config
    }
}

/// Run status as given on the command line
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum StatusArg {
    #[default]
    Passed,
    Failed,
    TimedOut,
    Interrupted,
}

impl From<StatusArg> for RunStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Passed => RunStatus::Passed,
            StatusArg::Failed => RunStatus::Failed,
            StatusArg::TimedOut => RunStatus::TimedOut,
            StatusArg::Interrupted => RunStatus::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = ReporterArgs {
            endpoint: Some("https://stats.example.com/api/run/results".to_string()),
            results_file: Some(PathBuf::from("out/results.json")),
            allow_ipv6: true,
            legacy_auth_header: true,
            ..Default::default()
        };

        let config = args.apply(ReporterConfig::default());
        assert_eq!(config.endpoint_url, "https://stats.example.com/api/run/results");
        assert_eq!(config.artifact_file_path, Some(PathBuf::from("out/results.json")));
        assert!(!config.force_ipv4);
        assert_eq!(config.missing_token, MissingTokenPolicy::LegacyPlaceholder);
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let base = ReporterConfig {
            endpoint_url: "http://collector:9000/ingest".to_string(),
            bearer_token: Some("tok".to_string()),
            ..Default::default()
        };
        let config = ReporterArgs::default().apply(base);
        assert_eq!(config.endpoint_url, "http://collector:9000/ingest");
        assert_eq!(config.bearer_token.as_deref(), Some("tok"));
        assert!(config.force_ipv4);
    }
}
