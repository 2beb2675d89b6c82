//! Results artifact - locating and loading the JSON results file

use std::path::{Path, PathBuf};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{ReporterConfig, DEFAULT_ARTIFACT_NAME};
use crate::error::{ReporterError, ReporterResult};

/// Resolved location of the results file for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    path: PathBuf,
}

impl ArtifactLocation {
    /// Resolve the results file path.
    ///
    /// An explicit file path wins; otherwise the directory (or `cwd`) is
    /// joined with the configured name (or `test-results.json`).
    pub fn resolve(config: &ReporterConfig, cwd: &Path) -> Self {
        let path = match &config.artifact_file_path {
            Some(file) => file.clone(),
            None => {
                let dir = config.artifact_directory.as_deref().unwrap_or(cwd);
                let name = config
                    .artifact_file_name
                    .as_deref()
                    .unwrap_or(DEFAULT_ARTIFACT_NAME);
                dir.join(name)
            }
        };

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Opaque results document, passed through to the collector untouched
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPayload {
    document: Map<String, Value>,
}

impl ResultsPayload {
    /// Read and parse the results file
    pub async fn load(location: &ArtifactLocation) -> ReporterResult<Self> {
        let path = location.path();
        debug!("Reading results from {}", path.display());

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ReporterError::ArtifactRead {
                path: path.to_path_buf(),
                source,
            })?;

        Self::parse(&text).map_err(|source| ReporterError::ArtifactMalformed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let document = serde_json::from_str(text)?;
        Ok(Self { document })
    }

    /// Compact JSON encoding sent as the request body
    pub fn to_wire(&self) -> ReporterResult<Vec<u8>> {
        serde_json::to_vec(&self.document).map_err(ReporterError::PayloadEncode)
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }
}
