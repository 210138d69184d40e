//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::{ConfigHasher, StpConfig, ValidationResult};
use crate::planner::ReconcilePlan;
use crate::request::{Method, WireRequest};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Request row for table display.
#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Path")]
    path: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a reconciliation plan for display.
    #[must_use]
    pub fn format_plan(&self, plan: &ReconcilePlan) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(plan).unwrap_or_default(),
            OutputFormat::Text => Self::format_plan_text(plan),
        }
    }

    /// Formats a plan as text.
    fn format_plan_text(plan: &ReconcilePlan) -> String {
        let hasher = ConfigHasher::new();
        let mut output = String::new();

        let _ = writeln!(output, "\nReconcile plan ({})", plan.mode);
        let _ = writeln!(
            output,
            "   want: {}  have: {}\n",
            hasher.short_hash(&plan.want_hash),
            hasher.short_hash(&plan.have_hash)
        );
        if ConfigHasher::hashes_match(&plan.want_hash, &plan.have_hash) {
            let _ = writeln!(output, "   want and have are equivalent\n");
        }

        if plan.is_empty() {
            let _ = writeln!(
                output,
                "{} No changes required - configuration is up to date.",
                "✓".green()
            );
            return output;
        }

        output.push_str(&serde_yaml::to_string(&plan.commands).unwrap_or_default());
        output.push('\n');

        let rows: Vec<RequestRow> = plan
            .requests
            .iter()
            .enumerate()
            .map(|(i, r)| RequestRow {
                index: i + 1,
                method: Self::format_method(r),
                path: r.path.clone(),
            })
            .collect();
        output.push_str(&Table::new(rows).to_string());
        output.push('\n');

        let _ = writeln!(
            output,
            "\nPlan: {} to modify, {} to delete",
            plan.modify_count().to_string().green(),
            plan.delete_count().to_string().red()
        );
        if plan.is_delete_all() {
            let _ = writeln!(
                output,
                "{} The whole spanning-tree configuration will be removed.",
                "⚠".yellow()
            );
        }

        output
    }

    fn format_method(request: &WireRequest) -> String {
        match request.method {
            Method::Patch => request.method.to_string().yellow().to_string(),
            Method::Delete => request.method.to_string().red().to_string(),
        }
    }

    /// Formats a predicted configuration.
    #[must_use]
    pub fn format_config(&self, config: &StpConfig) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(config).unwrap_or_default(),
            OutputFormat::Text if config.is_empty() => String::from("{}\n"),
            OutputFormat::Text => serde_yaml::to_string(config).unwrap_or_default(),
        }
    }

    /// Formats a validation result.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = String::new();
                for issue in &result.errors {
                    let _ = writeln!(output, "{} {}: {}", "✗".red(), issue.field, issue.message);
                }
                if show_warnings {
                    for warning in &result.warnings {
                        let _ = writeln!(output, "{} {warning}", "⚠".yellow());
                    }
                }
                if result.is_valid() {
                    let _ = writeln!(output, "{} Configuration is valid", "✓".green());
                }
                output
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Operation;
    use crate::reconciler::reconcile;

    fn parse(yaml: &str) -> StpConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_json_plan_output() {
        let want = parse("global:\n  enabled_protocol: pvst\n");
        let plan = reconcile(&want, &StpConfig::new(), Operation::Merged).unwrap();

        let output = OutputFormatter::new(OutputFormat::Json).format_plan(&plan);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["mode"], "merged");
        assert_eq!(value["commands"][0]["state"], "merged");
        assert_eq!(value["requests"][0]["method"], "PATCH");
    }

    #[test]
    fn test_text_plan_lists_requests() {
        colored::control::set_override(false);
        let have = parse("interfaces:\n  - intf_name: Ethernet0\n    cost: 4\n");
        let plan = reconcile(&StpConfig::new(), &have, Operation::Deleted).unwrap();

        let output = OutputFormatter::new(OutputFormat::Text).format_plan(&plan);
        assert!(output.contains("DELETE"));
        assert!(output.contains("data/openconfig-spanning-tree:stp"));
        assert!(output.contains("0 to modify, 1 to delete"));
    }

    #[test]
    fn test_text_empty_plan() {
        colored::control::set_override(false);
        let plan = reconcile(&StpConfig::new(), &StpConfig::new(), Operation::Merged).unwrap();
        let output = OutputFormatter::new(OutputFormat::Text).format_plan(&plan);
        assert!(output.contains("No changes required"));
    }
}
