//! CLI module for the stp-reconcile tool.
//!
//! This module provides the command-line interface for planning and
//! previewing spanning-tree reconciliations.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat, PlanArgs, SnapshotArgs};
pub use output::OutputFormatter;
