//! Reporter lifecycle hook and registry

use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReporterError, ReporterResult};

/// Overall outcome of a test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Passed,
    Failed,
    #[serde(rename = "timedout")]
    TimedOut,
    Interrupted,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Passed => "passed",
            RunStatus::Failed => "failed",
            RunStatus::TimedOut => "timedout",
            RunStatus::Interrupted => "interrupted",
        }
    }
}

/// Summary handed to reporters when the run completes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullResult {
    pub status: RunStatus,
    pub duration: Duration,
}

impl FullResult {
    pub fn new(status: RunStatus, duration: Duration) -> Self {
        Self { status, duration }
    }
}

/// A plugin notified at the end of a test run
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Name the reporter is registered under
    fn name(&self) -> &str;

    /// Called exactly once, after every test has finished
    async fn on_end(&self, result: &FullResult) -> ReporterResult<()>;
}

/// Ordered set of reporters, keyed by name
#[derive(Default)]
pub struct ReporterRegistry {
    reporters: Vec<Box<dyn Reporter>>,
}

impl ReporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, reporter: Box<dyn Reporter>) -> ReporterResult<()> {
        if self.reporters.iter().any(|r| r.name() == reporter.name()) {
            return Err(ReporterError::Configuration(format!(
                "reporter '{}' is already registered",
                reporter.name()
            )));
        }
        self.reporters.push(reporter);
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        self.reporters.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }

    /// Fire the run-completion hook on every reporter, in registration order.
    ///
    /// A failing reporter does not stop the ones after it.
    pub async fn dispatch_end(&self, result: &FullResult) -> Vec<(String, ReporterResult<()>)> {
        let mut outcomes = Vec::with_capacity(self.reporters.len());
        for reporter in &self.reporters {
            debug!("Dispatching onEnd to reporter '{}'", reporter.name());
            let outcome = reporter.on_end(result).await;
            outcomes.push((reporter.name().to_string(), outcome));
        }
        outcomes
    }
}
