//! Error types for result reporting

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Failed to read results file {}: {source}", .path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Results file {} is not a valid JSON object: {source}", .path.display())]
    ArtifactMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode results payload: {0}")]
    PayloadEncode(#[source] serde_json::Error),

    #[error("Could not connect to stats server at {endpoint}")]
    ConnectionRefused {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Coarse classification of a [`ReporterError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    ArtifactRead,
    TransportConnectionRefused,
    TransportOther,
}

impl ReporterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReporterError::Configuration(_) => ErrorKind::Configuration,
            ReporterError::ArtifactRead { .. }
            | ReporterError::ArtifactMalformed { .. }
            | ReporterError::PayloadEncode(_) => ErrorKind::ArtifactRead,
            ReporterError::ConnectionRefused { .. } => ErrorKind::TransportConnectionRefused,
            ReporterError::HttpStatus { .. } | ReporterError::Transport { .. } => {
                ErrorKind::TransportOther
            }
        }
    }

    /// Status code of a rejected upload, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ReporterError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ReporterResult<T> = Result<T, ReporterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_errors_share_kind() {
        let missing = ReporterError::ArtifactRead {
            path: PathBuf::from("/nope/test-results.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let malformed = ReporterError::ArtifactMalformed {
            path: PathBuf::from("test-results.json"),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };

        assert_eq!(missing.kind(), ErrorKind::ArtifactRead);
        assert_eq!(malformed.kind(), ErrorKind::ArtifactRead);
        assert!(missing.to_string().contains("/nope/test-results.json"));
    }

    #[test]
    fn test_http_status_carries_code_and_body() {
        let err = ReporterError::HttpStatus {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::TransportOther);
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }
}
