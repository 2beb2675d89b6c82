//! Run Command - wraps the test command and fires the completion hook

use std::path::Path;
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use anyhow::{Context, Result};
use clap::Args;
use tokio::process::Command;
use tracing::{error, info, warn};

use runstats_reporter::config::ENV_ARTIFACT_FILE;
use runstats_reporter::{FullResult, ReporterRegistry, RunStatus, StatsReporter};

use super::ReporterArgs;
use crate::output::print_warning;

/// Command run when none is given
const DEFAULT_TEST_COMMAND: [&str; 3] = ["npx", "playwright", "test"];

/// Exit code when the tests passed but reporting did not
const EXIT_REPORTING_FAILED: i32 = 2;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub reporter: ReporterArgs,

    /// Kill the test command after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Test command and its arguments (default: npx playwright test)
    #[arg(last = true)]
    pub command: Vec<String>,
}

pub async fn execute(args: RunArgs) -> Result<i32> {
    let config = args.reporter.resolve()?;
    let stats = StatsReporter::new(config);
    let artifact_path = stats.artifact_path().to_path_buf();

    let command = if args.command.is_empty() {
        DEFAULT_TEST_COMMAND.iter().map(|s| s.to_string()).collect()
    } else {
        args.command
    };

    let mut registry = ReporterRegistry::new();
    registry.register(Box::new(stats))?;

    run_and_report(
        &command,
        args.timeout.map(Duration::from_secs),
        &artifact_path,
        &registry,
    )
    .await
}

/// Run the test command, fire the completion hook on every reporter and
/// return the process exit code.
async fn run_and_report(
    command: &[String],
    timeout: Option<Duration>,
    artifact_path: &Path,
    registry: &ReporterRegistry,
) -> Result<i32> {
    let (program, rest) = command
        .split_first()
        .context("empty test command")?;

    info!("Running tests: {}", command.join(" "));
    let start = Instant::now();

    // The JSON reporter writes where the stats reporter will look
    let mut child = Command::new(program)
        .args(rest)
        .env(ENV_ARTIFACT_FILE, artifact_path)
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn '{}'", program))?;

    let exit = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => Some(status?),
            Err(_) => {
                warn!("Test command exceeded {:?}, killing it", limit);
                if let Err(e) = child.kill().await {
                    error!("Failed to kill test command: {}", e);
                }
                None
            }
        },
        None => Some(child.wait().await?),
    };

    let status = run_status(exit.as_ref());
    let summary = FullResult::new(status, start.elapsed());
    info!(
        "Test run finished: {} ({} ms)",
        status.as_str(),
        summary.duration.as_millis()
    );

    let mut reporting_ok = true;
    for (name, outcome) in registry.dispatch_end(&summary).await {
        if let Err(e) = outcome {
            error!("Reporter '{}' failed: {}", name, e);
            reporting_ok = false;
        }
    }
    if !reporting_ok {
        print_warning("Test results were not reported");
    }

    Ok(exit_code(status, exit.and_then(|s| s.code()), reporting_ok))
}

/// Map the test command's exit to a run status. `None` means it timed out.
fn run_status(exit: Option<&ExitStatus>) -> RunStatus {
    match exit {
        None => RunStatus::TimedOut,
        Some(status) if status.success() => RunStatus::Passed,
        Some(status) if status.code().is_none() => RunStatus::Interrupted,
        Some(_) => RunStatus::Failed,
    }
}

/// Test failures keep their own exit code; a reporting failure only
/// changes the code of an otherwise passing run.
fn exit_code(status: RunStatus, test_code: Option<i32>, reporting_ok: bool) -> i32 {
    match status {
        RunStatus::Passed if reporting_ok => 0,
        RunStatus::Passed => EXIT_REPORTING_FAILED,
        _ => test_code.filter(|c| *c != 0).unwrap_or(1),
    }
}
