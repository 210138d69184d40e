//! Configuration module for spanning-tree snapshots.
//!
//! This module handles everything about a single configuration tree:
//! - The typed tree and its identity-keyed lists
//! - The table of implicit device defaults
//! - Parsing want/have snapshots from YAML or JSON
//! - Validation of a desired snapshot against the current one
//! - Computing fingerprints for change detection

pub mod defaults;
mod hash;
mod keyed;
mod parser;
mod model;
mod validator;

pub use hash::ConfigHasher;
pub use keyed::{Keyed, KeyedList};
pub use parser::ConfigParser;
pub use model::{
    GlobalConfig, GuardMode, InterfaceConfig, LinkType, MstInstance, MstpConfig, PortSetting,
    StpConfig, StpProtocol, VlanConfig,
};
pub use validator::{ConfigValidator, ValidationIssue, ValidationResult};
