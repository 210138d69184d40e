//! Diff engine for comparing desired vs current configuration.
//!
//! The diff of `want` against `have` is the minimal patch that makes `have`
//! a superset of what `want` states: scalars that are missing or different,
//! keyed entities that are new (in full) or changed (by field), and VLAN
//! members not yet present.

use std::fmt;
use tracing::debug;

use super::tree::ConfigNode;
use crate::config::StpConfig;

/// Engine for computing structural diffs between snapshots.
#[derive(Debug, Default)]
pub struct DiffEngine;

/// Counts of the entities touched by a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Global section changed.
    pub global: bool,
    /// Interfaces with changes.
    pub interfaces: usize,
    /// MSTP scalar settings changed.
    pub mstp_settings: bool,
    /// MST instances with changes.
    pub mst_instances: usize,
    /// PVST VLAN entries with changes.
    pub pvst_vlans: usize,
    /// Rapid PVST VLAN entries with changes.
    pub rapid_pvst_vlans: usize,
}

impl DiffEngine {
    /// Creates a new diff engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes `want - have`.
    #[must_use]
    pub fn compute_diff(&self, want: &StpConfig, have: &StpConfig) -> StpConfig {
        let delta = want.diff(have);
        let summary = self.summarize(&delta);
        debug!("Computed diff: {summary}");
        delta
    }

    /// Summarizes a diff tree.
    #[must_use]
    pub fn summarize(&self, delta: &StpConfig) -> DiffSummary {
        let mstp = delta.mstp.as_ref();
        DiffSummary {
            global: delta.global.is_some(),
            interfaces: delta.interfaces.len(),
            mstp_settings: mstp.is_some_and(|m| {
                m.mst_name.is_some()
                    || m.revision.is_some()
                    || m.max_hop.is_some()
                    || m.hello_time.is_some()
                    || m.max_age.is_some()
                    || m.fwd_delay.is_some()
            }),
            mst_instances: mstp.map_or(0, |m| m.mst_instances.len()),
            pvst_vlans: delta.pvst.len(),
            rapid_pvst_vlans: delta.rapid_pvst.len(),
        }
    }
}

impl DiffSummary {
    /// Returns true if the diff holds any change.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }

    /// Total number of changed entities.
    #[must_use]
    pub const fn total_changes(&self) -> usize {
        self.global as usize
            + self.interfaces
            + self.mstp_settings as usize
            + self.mst_instances
            + self.pvst_vlans
            + self.rapid_pvst_vlans
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "global: {}, interfaces: {}, mstp: {}, mst instances: {}, pvst: {}, rapid pvst: {}",
            if self.global { "changed" } else { "unchanged" },
            self.interfaces,
            if self.mstp_settings { "changed" } else { "unchanged" },
            self.mst_instances,
            self.pvst_vlans,
            self.rapid_pvst_vlans
        )
    }
}

/// Computes `want - have` with a default engine.
#[must_use]
pub fn diff(want: &StpConfig, have: &StpConfig) -> StpConfig {
    DiffEngine::new().compute_diff(want, have)
}
