//! Reconciliation plan types.
//!
//! A plan pairs the commands a strategy chose (tagged configuration
//! subtrees, for diff rendering and simulated apply) with the ordered wire
//! requests that realize them.

use serde::Serialize;
use std::fmt;

use crate::config::StpConfig;
use crate::request::WireRequest;

/// Reconciliation mode, also used as the tag of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Make `have` a superset of `want`; never deletes.
    Merged,
    /// Replace each differing entity of `have` with `want`'s version.
    Replaced,
    /// Make `have` equal to `want`.
    Overridden,
    /// Remove what `want` names from `have`.
    Deleted,
}

/// A configuration subtree tagged with the operation applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Operation tag.
    pub state: Operation,
    /// The affected configuration.
    #[serde(flatten)]
    pub config: StpConfig,
}

/// Outcome of one reconciliation.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcilePlan {
    /// Mode the plan was computed for.
    pub mode: Operation,
    /// Commands, deletions first.
    pub commands: Vec<Command>,
    /// Wire requests, deletions first.
    pub requests: Vec<WireRequest>,
    /// Fingerprint of the normalized want.
    pub want_hash: String,
    /// Fingerprint of the normalized have.
    pub have_hash: String,
}

impl Command {
    /// Creates a command.
    #[must_use]
    pub const fn new(state: Operation, config: StpConfig) -> Self {
        Self { state, config }
    }

    /// Tags a tree, or returns `None` if it carries nothing.
    #[must_use]
    pub fn non_empty(state: Operation, config: StpConfig) -> Option<Self> {
        (!config.is_empty()).then_some(Self::new(state, config))
    }
}

impl ReconcilePlan {
    /// Creates a plan with no commands.
    #[must_use]
    pub fn empty(mode: Operation, want_hash: String, have_hash: String) -> Self {
        Self {
            mode,
            commands: Vec::new(),
            requests: Vec::new(),
            want_hash,
            have_hash,
        }
    }

    /// Returns true if the plan changes nothing.
    ///
    /// Commands without requests, or requests without commands, also count
    /// as no change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() || self.requests.is_empty()
    }

    /// Returns true if the plan changes something.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.is_empty()
    }

    /// Returns true if the plan removes the whole resource.
    #[must_use]
    pub fn is_delete_all(&self) -> bool {
        self.requests.iter().any(WireRequest::is_delete_all)
    }

    /// Returns the number of DELETE requests.
    #[must_use]
    pub fn delete_count(&self) -> usize {
        self.requests.iter().filter(|r| r.is_delete()).count()
    }

    /// Returns the number of PATCH requests.
    #[must_use]
    pub fn modify_count(&self) -> usize {
        self.requests.len() - self.delete_count()
    }

    /// Returns the commands carrying a given tag.
    pub fn commands_tagged(&self, state: Operation) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(move |c| c.state == state)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Merged => "merged",
            Self::Replaced => "replaced",
            Self::Overridden => "overridden",
            Self::Deleted => "deleted",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for ReconcilePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No changes required");
        }

        writeln!(
            f,
            "Reconcile plan ({}, {} requests):",
            self.mode,
            self.requests.len()
        )?;
        for (i, request) in self.requests.iter().enumerate() {
            writeln!(f, "  {i}. {request}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_serializes_flat() {
        let config: StpConfig = serde_yaml::from_str("global:\n  loop_guard: true\n").unwrap();
        let command = Command::new(Operation::Merged, config);
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({"state": "merged", "global": {"loop_guard": true}})
        );
    }

    #[test]
    fn test_empty_command_skipped() {
        assert!(Command::non_empty(Operation::Deleted, StpConfig::new()).is_none());
    }

    #[test]
    fn test_plan_counts() {
        let mut plan = ReconcilePlan::empty(Operation::Overridden, String::new(), String::new());
        assert!(plan.is_empty());
        assert_eq!(plan.to_string(), "No changes required");

        plan.commands.push(Command::new(Operation::Deleted, StpConfig::new()));
        plan.requests.push(WireRequest::delete(crate::request::STP_PATH));
        plan.requests.push(WireRequest::patch_leaf("x", "y", true));
        assert!(plan.has_changes());
        assert!(plan.is_delete_all());
        assert_eq!(plan.delete_count(), 1);
        assert_eq!(plan.modify_count(), 1);
        assert_eq!(plan.commands_tagged(Operation::Deleted).count(), 1);
    }
}
