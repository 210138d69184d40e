// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![warn(missing_docs)]                // Public items should be documented
#![warn(dead_code)]                   // Unused code is flagged
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness
#![warn(unused_imports)]              // Unused imports are flagged
#![warn(unused_variables)]            // Unused variables are flagged
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # STP Reconcile
//!
//! A reconciliation engine for spanning-tree switch configuration.
//!
//! ## Overview
//!
//! Given the desired configuration of a switch ("want") and its current
//! configuration ("have"), the engine computes:
//!
//! - the commands: configuration subtrees tagged with the operation chosen
//!   for them (`deleted`, `merged`, `replaced`, `overridden`)
//! - the ordered wire requests (PATCH/DELETE against the OpenConfig
//!   spanning-tree resource) that carry those commands out
//!
//! The engine never talks to a device. Fetching `have` and dispatching the
//! requests belong to the caller.
//!
//! ## Modes
//!
//! - **merged**: add what `want` states and `have` lacks; never deletes
//! - **replaced**: rewrite each entity of `have` that `want` restates differently
//! - **overridden**: make `have` equal to `want`
//! - **deleted**: remove what `want` names, or everything if `want` is empty
//!
//! ## Modules
//!
//! - [`vlan`]: VLAN range notation
//! - [`config`]: Configuration tree, defaults, parsing and validation
//! - [`planner`]: Normalization, diff, simulated apply and plan types
//! - [`request`]: Wire request construction
//! - [`reconciler`]: The four reconciliation strategies
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! global:
//!   enabled_protocol: mst
//!   disabled_vlans: ["100-110", 200]
//! interfaces:
//!   - intf_name: Ethernet0
//!     edge_port: true
//!     link_type: point-to-point
//! mstp:
//!   mst_name: region1
//!   mst_instances:
//!     - mst_id: 1
//!       bridge_priority: 4096
//!       vlans: ["1-20"]
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod planner;
pub mod reconciler;
pub mod request;
pub mod vlan;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigHasher, ConfigParser, ConfigValidator, StpConfig};
pub use error::{Result, StpError};
pub use planner::{Command, DiffEngine, Operation, ReconcilePlan};
pub use reconciler::{Reconciler, reconcile};
pub use request::{Method, WireRequest};
pub use vlan::VlanSet;
