//! axescan CLI - Main Entry Point

use clap::{Parser, Subcommand};

use axescan_cli::commands::{report, summary};
use axescan_cli::output::OutputFormat;

/// axescan - accessibility scan reporting
#[derive(Parser)]
#[command(name = "axescan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an HTML report from a persisted scan result
    Report(report::ReportArgs),

    /// Print category counts and a violation digest; exits 1 when violations exist
    Summary(summary::SummaryArgs),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Report(args) => report::execute(args).await?,
        Commands::Summary(args) => {
            if summary::execute(args, cli.format).await? {
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("axescan v{}", env!("CARGO_PKG_VERSION"));
            println!("Result model v{}", axescan_common::VERSION);
        }
    }

    Ok(())
}
