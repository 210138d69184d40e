//! stp-reconcile CLI entrypoint.
//!
//! This is the main entrypoint for the stp-reconcile command-line tool.

use std::process::ExitCode;

use stp_reconcile::cli::{Cli, Commands, OutputFormatter, PlanArgs, SnapshotArgs};
use stp_reconcile::config::{ConfigParser, ConfigValidator, StpConfig};
use stp_reconcile::error::{ConfigError, Result};
use stp_reconcile::reconciler::Reconciler;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    // Environment fallbacks for the snapshot paths may come from a .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system on stderr, keeping stdout for results.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Plan(args) => cmd_plan(&args, &formatter),
        Commands::Preview(args) => cmd_preview(&args, &formatter),
        Commands::Validate {
            snapshots,
            warnings,
        } => cmd_validate(&snapshots, warnings, &formatter),
    }
}

/// Loads the want and have snapshots.
fn load_snapshots(args: &SnapshotArgs) -> Result<(StpConfig, StpConfig)> {
    let parser = ConfigParser::new();
    let want = parser.load_optional(args.want.as_deref())?;
    let have = parser.load_optional(args.have.as_deref())?;
    debug!(
        "Loaded snapshots: want {} sections, have {} sections",
        want.section_count(),
        have.section_count()
    );
    Ok((want, have))
}

fn cmd_plan(args: &PlanArgs, formatter: &OutputFormatter) -> Result<()> {
    let (want, have) = load_snapshots(&args.snapshots)?;
    let plan = Reconciler::new(&want, &have).reconcile(args.state)?;
    println!("{}", formatter.format_plan(&plan));
    Ok(())
}

fn cmd_preview(args: &PlanArgs, formatter: &OutputFormatter) -> Result<()> {
    let (want, have) = load_snapshots(&args.snapshots)?;
    let predicted = Reconciler::new(&want, &have).preview(args.state)?;
    print!("{}", formatter.format_config(&predicted));
    Ok(())
}

fn cmd_validate(args: &SnapshotArgs, warnings: bool, formatter: &OutputFormatter) -> Result<()> {
    let (want, have) = load_snapshots(args)?;
    let result = ConfigValidator::new().check(&want, &have);
    print!("{}", formatter.format_validation(&result, warnings));

    match result.errors.first() {
        None => Ok(()),
        Some(issue) => Err(ConfigError::validation(issue.message.clone(), issue.field.clone()).into()),
    }
}
