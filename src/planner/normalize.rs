//! Tree normalizer.
//!
//! Two trees are compared only in normalized form: VLAN ranges expanded,
//! fields at their implicit default removed, empty sections pruned and
//! keyed lists in key order. Each pass returns a new tree and leaves its
//! input untouched.

use serde_json::Value;
use tracing::debug;

use super::tree::ConfigNode;
use crate::config::StpConfig;
use crate::error::{ConfigError, Result};

/// Builds a typed tree from untyped data, expanding every VLAN range field.
///
/// VLAN sets are held in expanded form, so decoding is the expansion step;
/// malformed range tokens fail here.
///
/// # Errors
///
/// Returns a parse error if the data does not describe a valid tree.
pub fn expand_ranges(raw: Value) -> Result<StpConfig> {
    if raw.is_null() {
        return Ok(StpConfig::new());
    }
    let tree: StpConfig = serde_json::from_value(raw)
        .map_err(|e| ConfigError::parse(format!("Invalid configuration tree: {e}")))?;
    Ok(tree)
}

/// Removes fields holding their implicit default.
///
/// An interface left with only its name after stripping is removed, as is
/// the CIST instance and any section left empty.
#[must_use]
pub fn strip_defaults(tree: &StpConfig) -> StpConfig {
    let mut stripped = tree.clone();
    if stripped.strip_defaults() {
        debug!("Stripped default-valued fields");
    }
    stripped
}

/// Removes default-valued fields but keeps every entity the tree names.
///
/// A field restated at its default then reads as absent, so an entity whose
/// counterpart holds a non-default value still compares unequal. An empty
/// global section names nothing and is dropped.
#[must_use]
pub fn strip_field_defaults(tree: &StpConfig) -> StpConfig {
    let mut stripped = tree.clone();
    if stripped.global.as_ref().is_some_and(ConfigNode::is_bare) {
        stripped.global = None;
    }
    if let Some(global) = stripped.global.as_mut() {
        global.strip_defaults();
    }
    for intf in stripped.interfaces.iter_mut() {
        intf.strip_defaults();
    }
    if let Some(mstp) = stripped.mstp.as_mut() {
        mstp.strip_defaults();
    }
    stripped
}

/// Brings a tree into canonical shape.
///
/// Keyed lists and VLAN sets are ordered by construction; this pass prunes
/// sections that carry nothing so that absent and empty compare equal.
#[must_use]
pub fn canonical_order(tree: &StpConfig) -> StpConfig {
    let mut canonical = tree.clone();
    if canonical.global.as_ref().is_some_and(ConfigNode::is_bare) {
        canonical.global = None;
    }
    if canonical.mstp.as_ref().is_some_and(ConfigNode::is_bare) {
        canonical.mstp = None;
    }
    canonical
}

/// Full normalization: defaults stripped, then canonical shape.
#[must_use]
pub fn normalize(tree: &StpConfig) -> StpConfig {
    canonical_order(&strip_defaults(tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(yaml: &str) -> StpConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_expand_ranges_from_value() {
        let tree = expand_ranges(json!({
            "global": {"disabled_vlans": ["10-12", 20]},
            "mstp": {"mst_instances": [{"mst_id": 1, "vlans": ["5..6"]}]}
        }))
        .unwrap();

        let disabled: Vec<u16> = tree.global.unwrap().disabled_vlans.iter().collect();
        assert_eq!(disabled, vec![10, 11, 12, 20]);
        assert!(expand_ranges(Value::Null).unwrap().is_empty());
        assert!(expand_ranges(json!({"global": {"disabled_vlans": ["x"]}})).is_err());
    }

    #[test]
    fn test_strip_defaults_global() {
        let tree = parse(
            "global:\n  loop_guard: false\n  bpdu_filter: false\n  portfast: false\n  bridge_priority: 0\n",
        );
        assert!(normalize(&tree).is_empty());

        let tree = parse("global:\n  loop_guard: true\n  bridge_priority: 0\n");
        let global = normalize(&tree).global.unwrap();
        assert_eq!(global.loop_guard, Some(true));
        assert_eq!(global.bridge_priority, None);
    }

    #[test]
    fn test_strip_defaults_drops_cist_instance() {
        let tree = parse("mstp:\n  mst_instances:\n    - mst_id: 0\n      vlans: [1]\n");
        assert!(normalize(&tree).mstp.is_none());
    }

    #[test]
    fn test_absent_equals_default() {
        let a = parse("interfaces:\n  - intf_name: Ethernet0\n    cost: 5\n    stp_enable: true\n");
        let b = parse("interfaces:\n  - intf_name: Ethernet0\n    cost: 5\n");
        assert_eq!(normalize(&a), normalize(&b));

        // explicit false for stp_enable is not a default
        let c = parse("interfaces:\n  - intf_name: Ethernet0\n    cost: 5\n    stp_enable: false\n");
        assert_ne!(normalize(&a), normalize(&c));
    }

    #[test]
    fn test_strip_field_defaults_keeps_entities() {
        let tree = parse(
            "global:\n  loop_guard: false\ninterfaces:\n  - intf_name: Ethernet0\n    edge_port: false\nmstp:\n  mst_instances:\n    - mst_id: 0\n      vlans: [1]\n",
        );
        let stripped = strip_field_defaults(&tree);

        assert_eq!(stripped.global, Some(crate::config::GlobalConfig::default()));
        let intf = stripped.interfaces.get(&"Ethernet0".to_string()).unwrap();
        assert_eq!(intf.edge_port, None);
        assert!(stripped.mstp.unwrap().mst_instances.is_empty());

        assert!(normalize(&tree).is_empty());
        assert!(strip_field_defaults(&parse("global: {}\n")).global.is_none());
    }

    #[test]
    fn test_canonical_order_prunes_empty_sections() {
        let tree = StpConfig {
            global: Some(crate::config::GlobalConfig::default()),
            ..StpConfig::default()
        };
        assert!(canonical_order(&tree).is_empty());
        // the input is left untouched
        assert!(tree.global.is_some());
    }
}
