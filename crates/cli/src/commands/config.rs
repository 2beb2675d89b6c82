//! Config Command - show the resolved reporter settings

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use runstats_reporter::config::MissingTokenPolicy;
use runstats_reporter::transport::Endpoint;
use runstats_reporter::{ReporterConfig, StatsReporter};

use super::ReporterArgs;
use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub reporter: ReporterArgs,
}

/// Resolved settings. The token value itself is never shown.
#[derive(Debug, Serialize)]
pub struct ConfigDisplay {
    pub endpoint: String,
    pub transport: String,
    pub results_file: String,
    pub token_set: bool,
    pub force_ipv4: bool,
    pub missing_token: MissingTokenPolicy,
}

impl ConfigDisplay {
    fn new(config: &ReporterConfig, reporter: &StatsReporter) -> Self {
        let transport = match Endpoint::parse(&config.endpoint_url) {
            Ok(endpoint) => endpoint.transport().as_str().to_string(),
            Err(e) => format!("invalid ({})", e),
        };

        Self {
            endpoint: config.endpoint_url.clone(),
            transport,
            results_file: reporter.artifact_path().display().to_string(),
            token_set: config.bearer_token.is_some(),
            force_ipv4: config.force_ipv4,
            missing_token: config.missing_token,
        }
    }
}

impl TableDisplay for ConfigDisplay {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Endpoint", self.endpoint.clone()),
            ("Transport", self.transport.clone()),
            ("Results file", self.results_file.clone()),
            ("Token", if self.token_set { "set" } else { "not set" }.to_string()),
            ("IPv4 only", self.force_ipv4.to_string()),
            (
                "Missing token",
                match self.missing_token {
                    MissingTokenPolicy::Omit => "omit header",
                    MissingTokenPolicy::LegacyPlaceholder => "Bearer undefined",
                }
                .to_string(),
            ),
        ]
    }
}

pub fn execute(args: ConfigArgs, format: OutputFormat) -> Result<i32> {
    let config = args.reporter.resolve()?;
    let reporter = StatsReporter::new(config.clone());

    print_item(&ConfigDisplay::new(&config, &reporter), format);
    Ok(0)
}
