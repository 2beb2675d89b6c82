//! RunStats CLI - Main Entry Point
//!
//! Uploads end-to-end test results to a stats collector, either from an
//! existing results file or by wrapping the test command itself.

use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod output;

use commands::{config, run, upload};

/// RunStats CLI - test result uploader
#[derive(Parser)]
#[command(name = "runstats")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Log output format
    #[arg(long, env = "RUNSTATS_LOG_FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an existing results file
    Upload(upload::UploadArgs),

    /// Run the test command, then report its results
    Run(run::RunArgs),

    /// Show the resolved reporter configuration
    Config(config::ConfigArgs),
}

fn init_logging(verbose: bool, format: LogFormat) {
    let log_level = if verbose { "debug" } else { "info" };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_format);

    let code = match cli.command {
        Commands::Upload(args) => upload::execute(args).await?,
        Commands::Run(args) => run::execute(args).await?,
        Commands::Config(args) => config::execute(args, cli.format)?,
    };

    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_trailing_command() {
        let cli = Cli::try_parse_from([
            "runstats",
            "run",
            "--timeout",
            "600",
            "--",
            "npx",
            "playwright",
            "test",
            "--project=chromium",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.timeout, Some(600));
                assert_eq!(args.command, vec!["npx", "playwright", "test", "--project=chromium"]);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_upload_flags() {
        let cli = Cli::try_parse_from([
            "runstats",
            "upload",
            "--endpoint",
            "https://stats.example.com/api/run/results",
            "--results-file",
            "out.json",
            "--status",
            "failed",
        ])
        .unwrap();

        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(
                    args.reporter.endpoint.as_deref(),
                    Some("https://stats.example.com/api/run/results")
                );
                assert!(matches!(args.status, commands::StatusArg::Failed));
            }
            _ => panic!("expected upload"),
        }
    }
}
