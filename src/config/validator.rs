//! Validation of desired snapshots.
//!
//! Validation runs before any request is produced. It collects every issue
//! in one pass and reports the first error, so a rejected snapshot never
//! yields a partial request list.

use serde::Serialize;

use crate::error::{ConfigError, Result, StpError};
use crate::vlan::{MAX_VLAN_ID, MIN_VLAN_ID, VlanSet};
use tracing::{debug, warn};

use super::defaults::CIST_MST_ID;
use super::keyed::KeyedList;
use super::model::{GlobalConfig, InterfaceConfig, MstpConfig, StpConfig, StpProtocol, VlanConfig};

/// Validator for desired spanning-tree snapshots.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all issues found.
#[derive(Debug, Default, Serialize)]
pub struct ValidationResult {
    /// Fatal issues.
    pub errors: Vec<ValidationIssue>,
    /// Non-fatal issues.
    pub warnings: Vec<String>,
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Path of the offending field.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl ValidationResult {
    /// Returns true if no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates `want` in the context of the current snapshot `have`.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self, want: &StpConfig, have: &StpConfig) -> Result<ValidationResult> {
        let result = self.check(want, have);

        for warning in &result.warnings {
            warn!("{warning}");
        }

        match result.errors.first() {
            None => {
                debug!("Snapshot validation passed");
                Ok(result)
            }
            Some(first) => Err(StpError::Config(ConfigError::validation(
                first.message.clone(),
                first.field.clone(),
            ))),
        }
    }

    /// Collects every issue without failing.
    #[must_use]
    pub fn check(&self, want: &StpConfig, have: &StpConfig) -> ValidationResult {
        let mut result = ValidationResult::default();
        let active = want.enabled_protocol().or_else(|| have.enabled_protocol());

        if let Some(global) = &want.global {
            Self::validate_global(global, active, &mut result);
        }
        Self::validate_interfaces(&want.interfaces, active, &mut result);
        if let Some(mstp) = &want.mstp {
            Self::validate_mstp(mstp, have, &mut result);
        }
        Self::validate_vlan_entries(&want.pvst, "pvst", &mut result);
        Self::validate_vlan_entries(&want.rapid_pvst, "rapid_pvst", &mut result);

        result
    }

    fn validate_global(
        global: &GlobalConfig,
        active: Option<StpProtocol>,
        result: &mut ValidationResult,
    ) {
        check_vlan_range(&global.disabled_vlans, "global.disabled_vlans", result);

        if global.portfast == Some(true) && active != Some(StpProtocol::Pvst) {
            result.errors.push(ValidationIssue {
                field: String::from("global.portfast"),
                message: String::from("Portfast only configurable for pvst protocol"),
            });
        }
    }

    fn validate_interfaces(
        interfaces: &KeyedList<InterfaceConfig>,
        active: Option<StpProtocol>,
        result: &mut ValidationResult,
    ) {
        for intf in interfaces.iter() {
            if intf.portfast == Some(true) && active != Some(StpProtocol::Pvst) {
                result.errors.push(ValidationIssue {
                    field: format!("interfaces[{}].portfast", intf.intf_name),
                    message: String::from("Portfast only configurable for pvst protocol"),
                });
            }
        }
    }

    fn validate_mstp(mstp: &MstpConfig, have: &StpConfig, result: &mut ValidationResult) {
        for inst in mstp.mst_instances.iter() {
            let prefix = format!("mstp.mst_instances[{}]", inst.mst_id);

            if inst.mst_id == CIST_MST_ID {
                result.warnings.push(format!(
                    "{prefix}: instance {CIST_MST_ID} is the common spanning tree and is not managed"
                ));
            }

            check_vlan_range(&inst.vlans, &format!("{prefix}.vlans"), result);

            let has_vlans = !inst.vlans.is_empty()
                || have
                    .mst_instance(inst.mst_id)
                    .is_some_and(|current| !current.vlans.is_empty());
            if !inst.interfaces.is_empty() && !has_vlans {
                result.errors.push(ValidationIssue {
                    field: format!("{prefix}.interfaces"),
                    message: String::from(
                        "Interfaces cannot be configured for an mst instance without vlans",
                    ),
                });
            }
        }
    }

    fn validate_vlan_entries(
        entries: &KeyedList<VlanConfig>,
        section: &str,
        result: &mut ValidationResult,
    ) {
        for entry in entries.iter() {
            if !(MIN_VLAN_ID..=MAX_VLAN_ID).contains(&entry.vlan_id) {
                result.errors.push(ValidationIssue {
                    field: format!("{section}[{}].vlan_id", entry.vlan_id),
                    message: format!(
                        "VLAN ID {} is outside {MIN_VLAN_ID}..={MAX_VLAN_ID}",
                        entry.vlan_id
                    ),
                });
            }
        }
    }
}

fn check_vlan_range(vlans: &VlanSet, field: &str, result: &mut ValidationResult) {
    if let Some(id) = vlans
        .iter()
        .find(|id| !(MIN_VLAN_ID..=MAX_VLAN_ID).contains(id))
    {
        result.errors.push(ValidationIssue {
            field: field.to_string(),
            message: format!("VLAN ID {id} is outside {MIN_VLAN_ID}..={MAX_VLAN_ID}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MstInstance, PortSetting};

    fn parse(yaml: &str) -> StpConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_portfast_requires_pvst() {
        let validator = ConfigValidator::new();

        let want = parse("global:\n  enabled_protocol: mst\n  portfast: true\n");
        let err = validator.validate(&want, &StpConfig::new()).unwrap_err();
        assert!(err.is_validation());

        let want = parse("global:\n  enabled_protocol: pvst\n  portfast: true\n");
        assert!(validator.validate(&want, &StpConfig::new()).is_ok());

        // portfast false is never an error
        let want = parse("global:\n  enabled_protocol: mst\n  portfast: false\n");
        assert!(validator.validate(&want, &StpConfig::new()).is_ok());
    }

    #[test]
    fn test_interface_portfast_uses_have_protocol() {
        let validator = ConfigValidator::new();
        let want = parse("interfaces:\n  - intf_name: Ethernet0\n    portfast: true\n");

        assert!(validator.validate(&want, &StpConfig::new()).is_err());

        let have = parse("global:\n  enabled_protocol: pvst\n");
        assert!(validator.validate(&want, &have).is_ok());
    }

    #[test]
    fn test_mst_interfaces_need_vlans() {
        let validator = ConfigValidator::new();
        let mut inst = MstInstance::with_id(3);
        inst.interfaces.insert(PortSetting::named("Ethernet0"));
        let want = StpConfig {
            mstp: Some(MstpConfig {
                mst_instances: vec![inst].into_iter().collect(),
                ..MstpConfig::default()
            }),
            ..StpConfig::default()
        };

        assert!(validator.validate(&want, &StpConfig::new()).is_err());

        let have = parse("mstp:\n  mst_instances:\n    - mst_id: 3\n      vlans: [10]\n");
        assert!(validator.validate(&want, &have).is_ok());
    }

    #[test]
    fn test_vlan_bounds() {
        let validator = ConfigValidator::new();

        let result = validator.check(&parse("global:\n  disabled_vlans: ['4090-4095']\n"), &StpConfig::new());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "global.disabled_vlans");

        let result = validator.check(&parse("rapid_pvst:\n  - vlan_id: 0\n"), &StpConfig::new());
        assert_eq!(result.errors[0].field, "rapid_pvst[0].vlan_id");
    }

    #[test]
    fn test_cist_instance_warns() {
        let want = parse("mstp:\n  mst_instances:\n    - mst_id: 0\n      vlans: [1]\n");
        let result = ConfigValidator::new()
            .validate(&want, &StpConfig::new())
            .unwrap();
        assert_eq!(result.warnings.len(), 1);
    }
}
