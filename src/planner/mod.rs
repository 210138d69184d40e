//! Planning module for reconciliation.
//!
//! This module compares desired and current snapshots structurally,
//! predicts the effect of commands, and holds the resulting plan types.

mod apply;
mod diff;
pub mod normalize;
mod plan;
pub mod tree;

pub use apply::apply;
pub use diff::{DiffEngine, DiffSummary, diff};
pub use normalize::normalize;
pub use plan::{Command, Operation, ReconcilePlan};
pub use tree::ConfigNode;
