//! Stats reporter - uploads the results file when the run completes

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use tracing::{debug, error, info, warn};

use crate::artifact::{ArtifactLocation, ResultsPayload};
use crate::config::ReporterConfig;
use crate::error::{ReporterError, ReporterResult};
use crate::reporter::{FullResult, Reporter};
use crate::transport::{build_client, is_connection_refused, Endpoint};

/// Name the stats reporter registers under
pub const STATS_REPORTER_NAME: &str = "stats";

/// How an upload attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Success,
    ConnectionRefused,
    OtherFailure,
}

impl UploadOutcome {
    pub fn of(result: &ReporterResult<()>) -> Self {
        match result {
            Ok(()) => UploadOutcome::Success,
            Err(ReporterError::ConnectionRefused { .. }) => UploadOutcome::ConnectionRefused,
            Err(_) => UploadOutcome::OtherFailure,
        }
    }
}

/// Reporter that posts the JSON results file to a stats collector
pub struct StatsReporter {
    config: ReporterConfig,
    location: ArtifactLocation,
}

impl StatsReporter {
    /// Create a reporter from configuration. Performs no I/O.
    pub fn new(config: ReporterConfig) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_cwd(config, &cwd)
    }

    /// Create a reporter resolving relative defaults against `cwd`
    pub fn with_cwd(config: ReporterConfig, cwd: &Path) -> Self {
        let location = ArtifactLocation::resolve(&config, cwd);
        Self { config, location }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint_url
    }

    pub fn artifact_path(&self) -> &Path {
        self.location.path()
    }

    /// Read the results file and upload it.
    ///
    /// Every failure is logged here and then returned to the caller.
    pub async fn upload(&self) -> ReporterResult<()> {
        let result = self.try_upload().await;

        match UploadOutcome::of(&result) {
            UploadOutcome::Success => {
                info!("Successfully sent test results to endpoint");
            }
            UploadOutcome::ConnectionRefused => {
                warn!(
                    "Could not connect to stats server at {} - Is the server running?",
                    self.config.endpoint_url
                );
            }
            UploadOutcome::OtherFailure => {
                if let Err(e) = &result {
                    error!("Error processing or sending test results: {:?}", e);
                }
            }
        }

        result
    }

    async fn try_upload(&self) -> ReporterResult<()> {
        // Checked before any filesystem access
        let endpoint = Endpoint::parse(&self.config.endpoint_url)?;

        let payload = ResultsPayload::load(&self.location).await?;
        let body = payload.to_wire()?;

        self.send(&endpoint, body).await
    }

    async fn send(&self, endpoint: &Endpoint, body: Vec<u8>) -> ReporterResult<()> {
        let transport_error = |source: reqwest::Error| {
            if is_connection_refused(&source) {
                ReporterError::ConnectionRefused {
                    endpoint: self.config.endpoint_url.clone(),
                    source,
                }
            } else {
                ReporterError::Transport {
                    endpoint: self.config.endpoint_url.clone(),
                    source,
                }
            }
        };

        let client = build_client(endpoint, self.config.force_ipv4).map_err(transport_error)?;

        let mut request = client
            .post(endpoint.url().clone())
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body.len());

        match self.config.authorization_header() {
            Some(value) => request = request.header(AUTHORIZATION, value),
            None => warn!("No bearer token configured, sending results without Authorization"),
        }

        debug!(
            "POST {} over {} ({} bytes, ipv4_only={})",
            endpoint.url(),
            endpoint.transport().as_str(),
            body.len(),
            self.config.force_ipv4
        );

        let response = request.body(body).send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if status.is_success() {
            Ok(())
        } else {
            error!("Failed to send test results: {} {}", status.as_u16(), text);
            Err(ReporterError::HttpStatus {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

#[async_trait]
impl Reporter for StatsReporter {
    fn name(&self) -> &str {
        STATS_REPORTER_NAME
    }

    async fn on_end(&self, result: &FullResult) -> ReporterResult<()> {
        debug!("Run finished with status '{}'", result.status.as_str());
        self.upload().await
    }
}
