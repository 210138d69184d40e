//! Error types for the STP reconciliation engine.
//!
//! This module provides the error hierarchy for every stage of a
//! reconciliation pass: loading snapshots, validating them, and
//! translating the chosen commands into wire requests.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the STP reconciliation engine.
#[derive(Debug, Error)]
pub enum StpError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reconciliation errors.
    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading or validating a configuration snapshot.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The snapshot file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The snapshot (or a VLAN range token inside it) could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// Two entries of a keyed list share the same key.
    #[error("Duplicate {list} key: {key}")]
    DuplicateKey {
        /// Name of the key field (`intf_name`, `mst_id`, `vlan_id`).
        list: String,
        /// The duplicated key.
        key: String,
    },
}

/// Errors raised while building commands or requests.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A request payload could not be encoded.
    #[error("Failed to encode request payload: {message}")]
    Serialization {
        /// Description of the encoding failure.
        message: String,
    },
}

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, StpError>;

impl StpError {
    /// Returns true if this error is a validation failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Config(ConfigError::ValidationError { .. }))
    }

    /// Returns true if this error is a parse failure.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Config(ConfigError::ParseError { .. }))
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a parse error without a source location.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: None,
        }
    }
}

impl ReconcileError {
    /// Creates a serialization error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = StpError::from(ConfigError::validation("bad", "global.portfast"));
        assert!(err.is_validation());
        assert!(!err.is_parse());

        let err = StpError::from(ConfigError::parse("bad token"));
        assert!(err.is_parse());
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::DuplicateKey {
            list: String::from("intf_name"),
            key: String::from("Ethernet0"),
        };
        assert_eq!(err.to_string(), "Duplicate intf_name key: Ethernet0");
    }
}
