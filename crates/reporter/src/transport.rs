//! HTTP transport for the results upload

use std::error::Error as StdError;
use std::net::{IpAddr, Ipv4Addr};
use reqwest::Url;

use crate::error::{ReporterError, ReporterResult};

/// Wire transport, chosen by the endpoint scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Plain,
    Tls,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Plain => "http",
            Transport::Tls => "https",
        }
    }
}

/// Parsed collection endpoint
#[derive(Debug, Clone)]
pub struct Endpoint {
    url: Url,
    transport: Transport,
}

impl Endpoint {
    pub fn parse(raw: &str) -> ReporterResult<Self> {
        if raw.trim().is_empty() {
            return Err(ReporterError::Configuration(
                "stats endpoint not configured - cannot upload results".to_string(),
            ));
        }

        let mut url = Url::parse(raw).map_err(|e| {
            ReporterError::Configuration(format!("invalid endpoint URL '{}': {}", raw, e))
        })?;

        let transport = match url.scheme() {
            "https" => Transport::Tls,
            "http" => Transport::Plain,
            other => {
                return Err(ReporterError::Configuration(format!(
                    "unsupported endpoint scheme '{}' (expected http or https)",
                    other
                )))
            }
        };

        if url.host_str().is_none() {
            return Err(ReporterError::Configuration(format!(
                "endpoint URL '{}' has no host",
                raw
            )));
        }

        // Only scheme, host, port and path address the collector
        url.set_query(None);
        url.set_fragment(None);
        let _ = url.set_username("");
        let _ = url.set_password(None);

        Ok(Self { url, transport })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }
}

/// Build the HTTP client for one upload.
///
/// Redirects are not followed: a 3xx answer counts as a rejected upload.
pub fn build_client(endpoint: &Endpoint, force_ipv4: bool) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .https_only(endpoint.transport() == Transport::Tls);

    if force_ipv4 {
        // Binding to an IPv4 wildcard restricts the connector to IPv4 peers
        builder = builder.local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    builder.build()
}

/// True when the request failed because nothing was listening on the port
pub fn is_connection_refused(err: &reqwest::Error) -> bool {
    if !err.is_connect() {
        return false;
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_by_scheme() {
        let plain = Endpoint::parse("http://localhost:8000/api/run/results").unwrap();
        assert_eq!(plain.transport(), Transport::Plain);

        let tls = Endpoint::parse("https://stats.example.com/api/run/results").unwrap();
        assert_eq!(tls.transport(), Transport::Tls);
        assert_eq!(tls.url().path(), "/api/run/results");
    }

    #[test]
    fn test_query_fragment_and_userinfo_dropped() {
        let endpoint =
            Endpoint::parse("https://user:pw@stats.example.com:8443/api/run/results?team=web#top")
                .unwrap();
        assert_eq!(
            endpoint.url().as_str(),
            "https://stats.example.com:8443/api/run/results"
        );
    }

    #[test]
    fn test_rejects_empty_and_unsupported() {
        assert!(matches!(
            Endpoint::parse(""),
            Err(ReporterError::Configuration(_))
        ));
        assert!(matches!(
            Endpoint::parse("ftp://example.com/upload"),
            Err(ReporterError::Configuration(_))
        ));
        assert!(matches!(
            Endpoint::parse("not a url"),
            Err(ReporterError::Configuration(_))
        ));
    }

    #[test]
    fn test_build_client_with_and_without_ipv4() {
        let endpoint = Endpoint::parse("http://127.0.0.1:8000/api/run/results").unwrap();
        assert!(build_client(&endpoint, true).is_ok());
        assert!(build_client(&endpoint, false).is_ok());
    }
}
