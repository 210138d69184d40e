//! Simulated apply.
//!
//! Predicts the device state after a command list runs, without talking
//! to the device. Entities are matched by key the same way the diff engine
//! matches them.

use tracing::debug;

use super::plan::{Command, Operation};
use super::tree::ConfigNode;
use crate::config::StpConfig;
use crate::config::defaults::global_reset_state;

/// Applies `commands` in order onto a copy of `prior`.
///
/// Deleting `global.enabled_protocol` tears down every protocol section and
/// leaves the global section at its reset state, as the device does.
#[must_use]
pub fn apply(commands: &[Command], prior: &StpConfig) -> StpConfig {
    let mut state = prior.clone();

    for command in commands {
        match command.state {
            Operation::Deleted => apply_delete(&mut state, &command.config),
            Operation::Merged | Operation::Replaced | Operation::Overridden => {
                state.merge(&command.config);
            }
        }
    }

    state
}

fn apply_delete(state: &mut StpConfig, target: &StpConfig) {
    let drops_protocol = target
        .global
        .as_ref()
        .is_some_and(|g| g.enabled_protocol.is_some());

    if drops_protocol {
        debug!("Protocol removed; resetting spanning-tree state");
        *state = StpConfig {
            global: Some(global_reset_state()),
            ..StpConfig::new()
        };
        return;
    }

    state.remove(target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::normalize::normalize;

    fn parse(yaml: &str) -> StpConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_merge_then_delete() {
        let prior = parse("interfaces:\n  - intf_name: Ethernet0\n    cost: 4\n    edge_port: true\n");
        let commands = vec![
            Command::new(
                Operation::Merged,
                parse("interfaces:\n  - intf_name: Ethernet4\n    guard: root\n"),
            ),
            Command::new(
                Operation::Deleted,
                parse("interfaces:\n  - intf_name: Ethernet0\n    cost: 4\n"),
            ),
        ];

        let state = apply(&commands, &prior);
        let eth0 = state.interfaces.get(&String::from("Ethernet0")).unwrap();
        assert_eq!(eth0.cost, None);
        assert_eq!(eth0.edge_port, Some(true));
        assert!(state.interfaces.contains_key(&String::from("Ethernet4")));
    }

    #[test]
    fn test_bare_entity_delete_removes_entity() {
        let prior = parse("mstp:\n  mst_instances:\n    - mst_id: 1\n      vlans: [1]\n    - mst_id: 2\n      vlans: [2]\n");
        let commands = vec![Command::new(
            Operation::Deleted,
            parse("mstp:\n  mst_instances:\n    - mst_id: 1\n"),
        )];

        let state = apply(&commands, &prior);
        let mstp = state.mstp.unwrap();
        assert!(!mstp.mst_instances.contains_key(&1));
        assert!(mstp.mst_instances.contains_key(&2));
    }

    #[test]
    fn test_protocol_delete_cascades() {
        let prior = parse(
            "global:\n  enabled_protocol: pvst\n  hello_time: 5\ninterfaces:\n  - intf_name: Ethernet0\n    cost: 2\npvst:\n  - vlan_id: 3\n    max_age: 7\n",
        );
        let commands = vec![Command::new(
            Operation::Deleted,
            parse("global:\n  enabled_protocol: pvst\n"),
        )];

        let state = apply(&commands, &prior);
        assert_eq!(state.global, Some(global_reset_state()));
        assert!(state.interfaces.is_empty());
        assert!(state.pvst.is_empty());
        assert!(normalize(&state).is_empty());
    }
}
