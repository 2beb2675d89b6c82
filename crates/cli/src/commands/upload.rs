//! Upload Command

use std::time::Duration;
use anyhow::Result;
use clap::Args;
use runstats_reporter::{FullResult, Reporter, StatsReporter};

use super::{ReporterArgs, StatusArg};
use crate::output::{print_error, print_success};

/// Upload an existing results file
#[derive(Args, Debug)]
pub struct UploadArgs {
    #[command(flatten)]
    pub reporter: ReporterArgs,

    /// Run status to report to the hook
    #[arg(long, value_enum, default_value = "passed")]
    pub status: StatusArg,
}

pub async fn execute(args: UploadArgs) -> Result<i32> {
    let config = args.reporter.resolve()?;
    let reporter = StatsReporter::new(config);

    let summary = FullResult::new(args.status.into(), Duration::ZERO);
    match reporter.on_end(&summary).await {
        Ok(()) => {
            print_success(&format!(
                "Uploaded {} to {}",
                reporter.artifact_path().display(),
                reporter.endpoint()
            ));
            Ok(0)
        }
        Err(e) => {
            print_error(&format!("Upload failed: {}", e));
            Ok(1)
        }
    }
}
