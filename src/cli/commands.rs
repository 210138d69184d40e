//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::planner::Operation;

/// stp-reconcile - Spanning-tree configuration reconciler.
#[derive(Parser, Debug)]
#[command(name = "stp-reconcile")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the commands and wire requests for a reconciliation.
    Plan(PlanArgs),

    /// Predict the configuration after a reconciliation.
    Preview(PlanArgs),

    /// Validate a desired snapshot.
    Validate {
        /// Snapshot files.
        #[command(flatten)]
        snapshots: SnapshotArgs,

        /// Show warnings as well as errors.
        #[arg(short, long)]
        warnings: bool,
    },
}

/// Paths of the desired and current snapshots.
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Desired configuration (YAML or JSON); omitted means empty.
    #[arg(long, env = "STP_RECONCILE_WANT")]
    pub want: Option<PathBuf>,

    /// Current configuration (YAML or JSON); omitted means empty.
    #[arg(long, env = "STP_RECONCILE_HAVE")]
    pub have: Option<PathBuf>,
}

/// Arguments shared by `plan` and `preview`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Snapshot files.
    #[command(flatten)]
    pub snapshots: SnapshotArgs,

    /// Reconciliation state.
    #[arg(long, env = "STP_RECONCILE_STATE", default_value = "merged")]
    pub state: Operation,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan() {
        let cli = Cli::try_parse_from([
            "stp-reconcile",
            "--output",
            "json",
            "plan",
            "--want",
            "want.yaml",
            "--state",
            "overridden",
        ])
        .unwrap();

        assert!(matches!(cli.output, OutputFormat::Json));
        let Commands::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.state, Operation::Overridden);
        assert_eq!(args.snapshots.want, Some(PathBuf::from("want.yaml")));
    }

    #[test]
    fn test_parse_validate_with_verbose() {
        let cli = Cli::try_parse_from(["stp-reconcile", "validate", "--want", "w.yaml", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Validate { warnings: false, .. }));
    }

    #[test]
    fn test_rejects_unknown_state() {
        assert!(Cli::try_parse_from(["stp-reconcile", "plan", "--state", "gathered"]).is_err());
    }
}
