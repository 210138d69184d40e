//! Delete requests.
//!
//! Field-level deletes only touch values that `have` holds with the same
//! value as the command; everything else is silently skipped. The builder
//! returns the command tree pruned to what was actually deleted alongside
//! the requests.

use tracing::{debug, warn};

use super::WireRequest;
use super::paths::{self, EXT, PerVlanFamily, STP_PATH};
use crate::config::defaults::{
    INTF_BPDU_GUARD, INTF_SHUTDOWN, INTF_STP_ENABLE, INTF_UPLINK_FAST, LeafDefault,
};
use crate::config::{
    GlobalConfig, InterfaceConfig, KeyedList, MstInstance, MstpConfig, PortSetting, StpConfig,
    VlanConfig,
};

/// Builds delete requests for a command tree against the current snapshot.
#[derive(Debug)]
pub struct DeleteRequestBuilder<'a> {
    have: &'a StpConfig,
}

/// Returns the command value when `have` holds the same value.
fn matched<T: PartialEq + Clone>(command: &Option<T>, current: &Option<T>) -> Option<T> {
    match (command, current) {
        (Some(value), Some(existing)) if value == existing => Some(value.clone()),
        _ => None,
    }
}

/// Records a matched field and its request.
fn select<T: PartialEq + Clone>(
    command: &Option<T>,
    current: &Option<T>,
    requests: &mut Vec<WireRequest>,
    request: impl FnOnce() -> WireRequest,
) -> Option<T> {
    let value = matched(command, current);
    if value.is_some() {
        requests.push(request());
    }
    value
}

impl<'a> DeleteRequestBuilder<'a> {
    /// Creates a builder over the current snapshot.
    #[must_use]
    pub const fn new(have: &'a StpConfig) -> Self {
        Self { have }
    }

    /// The whole-resource delete.
    #[must_use]
    pub fn delete_all() -> WireRequest {
        WireRequest::delete(STP_PATH)
    }

    /// Builds field-level deletes for `commands`.
    ///
    /// Sections are processed in the order mstp, pvst, rapid pvst,
    /// interfaces, global. Returns the pruned commands and the requests.
    #[must_use]
    pub fn build(&self, commands: &StpConfig) -> (StpConfig, Vec<WireRequest>) {
        let mut requests = Vec::new();
        let mut pruned = StpConfig::new();

        if let Some(mstp) = &commands.mstp {
            pruned.mstp = self.mstp(mstp, &mut requests);
        }
        pruned.pvst = self.per_vlan(PerVlanFamily::Pvst, &commands.pvst, &mut requests);
        pruned.rapid_pvst =
            self.per_vlan(PerVlanFamily::RapidPvst, &commands.rapid_pvst, &mut requests);
        pruned.interfaces = self.interfaces(&commands.interfaces, &mut requests);
        if let Some(global) = &commands.global {
            pruned.global = self.global(global, &mut requests);
        }

        for request in &requests {
            debug!("Generated request: {request}");
        }
        (pruned, requests)
    }

    fn global(&self, command: &GlobalConfig, requests: &mut Vec<WireRequest>) -> Option<GlobalConfig> {
        let Some(current) = &self.have.global else {
            warn!("Global settings requested for deletion are not configured");
            return None;
        };
        let attr = |name: &str| {
            let path = paths::global_attr(name);
            move || WireRequest::delete(path)
        };

        let mut pruned = GlobalConfig {
            enabled_protocol: select(
                &command.enabled_protocol,
                &current.enabled_protocol,
                requests,
                attr("enabled-protocol"),
            ),
            loop_guard: select(&command.loop_guard, &current.loop_guard, requests, attr("loop-guard")),
            bpdu_filter: select(&command.bpdu_filter, &current.bpdu_filter, requests, attr("bpdu-filter")),
            root_guard_timeout: select(
                &command.root_guard_timeout,
                &current.root_guard_timeout,
                requests,
                attr(&format!("{EXT}rootguard-timeout")),
            ),
            portfast: select(
                &command.portfast,
                &current.portfast,
                requests,
                attr(&format!("{EXT}portfast")),
            ),
            hello_time: select(
                &command.hello_time,
                &current.hello_time,
                requests,
                attr(&format!("{EXT}hello-time")),
            ),
            max_age: select(
                &command.max_age,
                &current.max_age,
                requests,
                attr(&format!("{EXT}max-age")),
            ),
            fwd_delay: select(
                &command.fwd_delay,
                &current.fwd_delay,
                requests,
                attr(&format!("{EXT}forwarding-delay")),
            ),
            bridge_priority: select(
                &command.bridge_priority,
                &current.bridge_priority,
                requests,
                attr(&format!("{EXT}bridge-priority")),
            ),
            ..GlobalConfig::default()
        };

        let common = command.disabled_vlans.intersection(&current.disabled_vlans);
        if !common.is_empty() {
            requests.push(WireRequest::delete(paths::global_attr(&format!(
                "{EXT}disabled-vlans={}",
                common.path_key()
            ))));
            pruned.disabled_vlans = common;
        }

        (pruned != GlobalConfig::default()).then_some(pruned)
    }

    fn interfaces(
        &self,
        commands: &KeyedList<InterfaceConfig>,
        requests: &mut Vec<WireRequest>,
    ) -> KeyedList<InterfaceConfig> {
        let mut pruned = KeyedList::new();

        for command in commands.iter() {
            let name = command.intf_name.as_str();
            let Some(current) = self.have.interfaces.get(&command.intf_name) else {
                warn!("Interface {name} requested for deletion is not configured");
                continue;
            };

            if is_bare_interface(command) {
                requests.push(WireRequest::delete(paths::interface(name, None)));
                pruned.insert(InterfaceConfig::named(name));
                continue;
            }

            let delete = |attr: &str| {
                let path = paths::interface(name, Some(attr));
                move || WireRequest::delete(path)
            };
            let entry = InterfaceConfig {
                intf_name: command.intf_name.clone(),
                edge_port: select(&command.edge_port, &current.edge_port, requests, delete("edge-port")),
                link_type: select(&command.link_type, &current.link_type, requests, delete("link-type")),
                guard: select(&command.guard, &current.guard, requests, delete("guard")),
                bpdu_guard: select(
                    &command.bpdu_guard,
                    &current.bpdu_guard,
                    requests,
                    reset(name, "bpdu-guard", "openconfig-spanning-tree:bpdu-guard", INTF_BPDU_GUARD),
                ),
                bpdu_filter: select(
                    &command.bpdu_filter,
                    &current.bpdu_filter,
                    requests,
                    delete("bpdu-filter"),
                ),
                portfast: select(
                    &command.portfast,
                    &current.portfast,
                    requests,
                    delete(&format!("{EXT}portfast")),
                ),
                uplink_fast: select(
                    &command.uplink_fast,
                    &current.uplink_fast,
                    requests,
                    reset(
                        name,
                        &format!("{EXT}uplink-fast"),
                        &format!("{EXT}uplink-fast"),
                        INTF_UPLINK_FAST,
                    ),
                ),
                shutdown: select(
                    &command.shutdown,
                    &current.shutdown,
                    requests,
                    reset(
                        name,
                        &format!("{EXT}bpdu-guard-port-shutdown"),
                        &format!("{EXT}bpdu-guard-port-shutdown"),
                        INTF_SHUTDOWN,
                    ),
                ),
                cost: select(&command.cost, &current.cost, requests, delete(&format!("{EXT}cost"))),
                port_priority: select(
                    &command.port_priority,
                    &current.port_priority,
                    requests,
                    delete(&format!("{EXT}port-priority")),
                ),
                stp_enable: select(
                    &command.stp_enable,
                    &current.stp_enable,
                    requests,
                    reset(
                        name,
                        &format!("{EXT}spanning-tree-enable"),
                        &format!("{EXT}spanning-tree-enable"),
                        INTF_STP_ENABLE,
                    ),
                ),
            };

            if !is_bare_interface(&entry) {
                pruned.insert(entry);
            }
        }

        pruned
    }

    fn mstp(&self, command: &MstpConfig, requests: &mut Vec<WireRequest>) -> Option<MstpConfig> {
        let Some(current) = &self.have.mstp else {
            warn!("MSTP settings requested for deletion are not configured");
            return None;
        };
        let attr = |name: &str| {
            let path = paths::mstp_attr(name);
            move || WireRequest::delete(path)
        };

        let mut pruned = MstpConfig {
            mst_name: select(&command.mst_name, &current.mst_name, requests, attr("name")),
            revision: select(&command.revision, &current.revision, requests, attr("revision")),
            max_hop: select(&command.max_hop, &current.max_hop, requests, attr("max-hop")),
            hello_time: select(&command.hello_time, &current.hello_time, requests, attr("hello-time")),
            max_age: select(&command.max_age, &current.max_age, requests, attr("max-age")),
            fwd_delay: select(
                &command.fwd_delay,
                &current.fwd_delay,
                requests,
                attr("forwarding-delay"),
            ),
            mst_instances: KeyedList::new(),
        };

        for inst in command.mst_instances.iter() {
            let Some(existing) = current.mst_instances.get(&inst.mst_id) else {
                warn!("MST instance {} requested for deletion is not configured", inst.mst_id);
                continue;
            };
            if let Some(entry) = Self::mst_instance(inst, existing, requests) {
                pruned.mst_instances.insert(entry);
            }
        }

        (pruned != MstpConfig::default()).then_some(pruned)
    }

    fn mst_instance(
        command: &MstInstance,
        current: &MstInstance,
        requests: &mut Vec<WireRequest>,
    ) -> Option<MstInstance> {
        let mst_id = command.mst_id;

        if command.bridge_priority.is_none()
            && command.vlans.is_empty()
            && command.interfaces.is_empty()
        {
            requests.push(WireRequest::delete(paths::mst_instance(mst_id, None)));
            return Some(MstInstance::with_id(mst_id));
        }

        let mut entry = MstInstance {
            mst_id,
            bridge_priority: select(
                &command.bridge_priority,
                &current.bridge_priority,
                requests,
                || WireRequest::delete(paths::mst_instance(mst_id, Some("bridge-priority"))),
            ),
            interfaces: port_deletes(&command.interfaces, &current.interfaces, requests, |name, attr| {
                paths::mst_interface(mst_id, name, attr)
            }),
            ..MstInstance::default()
        };

        let common = command.vlans.intersection(&current.vlans);
        if !common.is_empty() {
            let attr = format!("vlan={}", common.path_key());
            requests.push(WireRequest::delete(paths::mst_instance(mst_id, Some(&attr))));
            entry.vlans = common;
        }

        (entry != MstInstance::with_id(mst_id)).then_some(entry)
    }

    fn per_vlan(
        &self,
        family: PerVlanFamily,
        commands: &KeyedList<VlanConfig>,
        requests: &mut Vec<WireRequest>,
    ) -> KeyedList<VlanConfig> {
        let current_list = match family {
            PerVlanFamily::Pvst => &self.have.pvst,
            PerVlanFamily::RapidPvst => &self.have.rapid_pvst,
        };
        let mut pruned = KeyedList::new();

        for command in commands.iter() {
            let vlan_id = command.vlan_id;
            let Some(current) = current_list.get(&vlan_id) else {
                warn!("{} VLAN {vlan_id} requested for deletion is not configured", family.label());
                continue;
            };

            if is_bare_vlan(command) {
                requests.extend(vlan_entity_deletes(family, current));
                pruned.insert(VlanConfig::with_id(vlan_id));
                continue;
            }

            let attr = |name: &str| {
                let path = family.vlan_attr(vlan_id, name);
                move || WireRequest::delete(path)
            };
            let entry = VlanConfig {
                vlan_id,
                hello_time: select(&command.hello_time, &current.hello_time, requests, attr("hello-time")),
                max_age: select(&command.max_age, &current.max_age, requests, attr("max-age")),
                fwd_delay: select(
                    &command.fwd_delay,
                    &current.fwd_delay,
                    requests,
                    attr("forwarding-delay"),
                ),
                bridge_priority: select(
                    &command.bridge_priority,
                    &current.bridge_priority,
                    requests,
                    attr("bridge-priority"),
                ),
                interfaces: port_deletes(&command.interfaces, &current.interfaces, requests, |name, attr| {
                    family.interface(vlan_id, name, attr)
                }),
            };

            if !is_bare_vlan(&entry) {
                pruned.insert(entry);
            }
        }

        pruned
    }
}

/// PATCH that resets a leaf the device refuses to delete.
fn reset(
    intf_name: &str,
    attr: &str,
    leaf: &str,
    default: LeafDefault<bool>,
) -> impl FnOnce() -> WireRequest {
    let path = paths::interface(intf_name, Some(attr));
    let leaf = leaf.to_string();
    move || WireRequest::patch_leaf(path, &leaf, default.value)
}

/// Deletes cost/priority of ports inside an instance or VLAN.
///
/// A port given with neither field is deleted whole.
fn port_deletes(
    commands: &KeyedList<PortSetting>,
    current: &KeyedList<PortSetting>,
    requests: &mut Vec<WireRequest>,
    path: impl Fn(&str, Option<&str>) -> String,
) -> KeyedList<PortSetting> {
    let mut pruned = KeyedList::new();

    for command in commands.iter() {
        let name = command.intf_name.as_str();
        let Some(existing) = current.get(&command.intf_name) else {
            continue;
        };

        if command.cost.is_none() && command.port_priority.is_none() {
            requests.push(WireRequest::delete(path(name, None)));
            pruned.insert(PortSetting::named(name));
            continue;
        }

        let entry = PortSetting {
            intf_name: command.intf_name.clone(),
            cost: select(&command.cost, &existing.cost, requests, || {
                WireRequest::delete(path(name, Some("cost")))
            }),
            port_priority: select(&command.port_priority, &existing.port_priority, requests, || {
                WireRequest::delete(path(name, Some("port-priority")))
            }),
        };
        if entry.cost.is_some() || entry.port_priority.is_some() {
            pruned.insert(entry);
        }
    }

    pruned
}

/// Requests removing a whole per-VLAN entity.
///
/// The device cannot delete a VLAN entry or its config container, so every
/// attribute present is deleted on its own, followed by each interface.
#[must_use]
pub fn vlan_entity_deletes(family: PerVlanFamily, current: &VlanConfig) -> Vec<WireRequest> {
    let vlan_id = current.vlan_id;
    let attrs = [
        (current.hello_time.is_some(), "hello-time"),
        (current.max_age.is_some(), "max-age"),
        (current.fwd_delay.is_some(), "forwarding-delay"),
        (current.bridge_priority.is_some(), "bridge-priority"),
    ];

    let mut requests: Vec<WireRequest> = attrs
        .into_iter()
        .filter(|(present, _)| *present)
        .map(|(_, attr)| WireRequest::delete(family.vlan_attr(vlan_id, attr)))
        .collect();
    requests.extend(
        current
            .interfaces
            .keys()
            .map(|name| WireRequest::delete(family.interface(vlan_id, name, None))),
    );
    requests
}

/// Request removing a whole interface entry.
#[must_use]
pub fn interface_delete(intf_name: &str) -> WireRequest {
    WireRequest::delete(paths::interface(intf_name, None))
}

/// Request removing a whole MST instance.
#[must_use]
pub fn mst_instance_delete(mst_id: u16) -> WireRequest {
    WireRequest::delete(paths::mst_instance(mst_id, None))
}

/// Requests clearing the MSTP settings and every MST instance.
#[must_use]
pub fn mstp_containers_delete() -> [WireRequest; 2] {
    [
        WireRequest::delete(paths::mstp_config()),
        WireRequest::delete(paths::mst_instances()),
    ]
}

fn is_bare_interface(intf: &InterfaceConfig) -> bool {
    *intf == InterfaceConfig::named(intf.intf_name.clone())
}

fn is_bare_vlan(entry: &VlanConfig) -> bool {
    *entry == VlanConfig::with_id(entry.vlan_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;
    use serde_json::json;

    fn parse(yaml: &str) -> StpConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn paths_of(requests: &[WireRequest]) -> Vec<&str> {
        requests.iter().map(|r| r.path.as_str()).collect()
    }

    #[test]
    fn test_global_only_matching_values() {
        let have = parse("global:\n  enabled_protocol: mst\n  hello_time: 4\n  max_age: 15\n");
        let commands = parse("global:\n  hello_time: 4\n  max_age: 16\n");

        let (pruned, requests) = DeleteRequestBuilder::new(&have).build(&commands);
        assert_eq!(
            paths_of(&requests),
            vec!["data/openconfig-spanning-tree:stp/global/config/openconfig-spanning-tree-ext:hello-time"]
        );
        let global = pruned.global.unwrap();
        assert_eq!(global.hello_time, Some(4));
        assert_eq!(global.max_age, None);
    }

    #[test]
    fn test_disabled_vlans_common_subset() {
        let have = parse("global:\n  disabled_vlans: ['10-12', 20]\n");
        let commands = parse("global:\n  disabled_vlans: [11, 20, 30]\n");

        let (pruned, requests) = DeleteRequestBuilder::new(&have).build(&commands);
        assert_eq!(
            paths_of(&requests),
            vec!["data/openconfig-spanning-tree:stp/global/config/openconfig-spanning-tree-ext:disabled-vlans=11%2C20"]
        );
        assert_eq!(pruned.global.unwrap().disabled_vlans.encode(), vec!["11", "20"]);
    }

    #[test]
    fn test_interface_reset_by_patch() {
        let have = parse(
            "interfaces:\n  - intf_name: Ethernet0\n    bpdu_guard: true\n    stp_enable: false\n    cost: 8\n",
        );
        let commands = parse(
            "interfaces:\n  - intf_name: Ethernet0\n    bpdu_guard: true\n    stp_enable: false\n    cost: 9\n",
        );

        let (pruned, requests) = DeleteRequestBuilder::new(&have).build(&commands);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::Patch);
        assert_eq!(
            requests[0].path,
            "data/openconfig-spanning-tree:stp/interfaces/interface=Ethernet0/config/bpdu-guard"
        );
        assert_eq!(requests[0].data, Some(json!({"openconfig-spanning-tree:bpdu-guard": false})));
        assert_eq!(
            requests[1].data,
            Some(json!({"openconfig-spanning-tree-ext:spanning-tree-enable": true}))
        );
        let entry = pruned.interfaces.get(&String::from("Ethernet0")).unwrap();
        assert_eq!(entry.cost, None);
    }

    #[test]
    fn test_bare_interface_deleted_whole() {
        let have = parse("interfaces:\n  - intf_name: Ethernet0\n    cost: 8\n");
        let commands = parse("interfaces:\n  - intf_name: Ethernet0\n  - intf_name: Ethernet4\n");

        let (pruned, requests) = DeleteRequestBuilder::new(&have).build(&commands);
        assert_eq!(
            paths_of(&requests),
            vec!["data/openconfig-spanning-tree:stp/interfaces/interface=Ethernet0"]
        );
        assert_eq!(pruned.interfaces.len(), 1);
    }

    #[test]
    fn test_mst_instance_deletes() {
        let have = parse(
            r"
mstp:
  mst_name: r1
  mst_instances:
    - mst_id: 1
      bridge_priority: 4096
      vlans: ['1-5']
      interfaces:
        - intf_name: Ethernet0
          cost: 3
    - mst_id: 2
      vlans: [9]
",
        );
        let commands = parse(
            r"
mstp:
  mst_instances:
    - mst_id: 1
      vlans: ['4-8']
      interfaces:
        - intf_name: Ethernet0
    - mst_id: 2
",
        );

        let (pruned, requests) = DeleteRequestBuilder::new(&have).build(&commands);
        assert_eq!(
            paths_of(&requests),
            vec![
                "data/openconfig-spanning-tree:stp/mstp/mst-instances/mst-instance=1/interfaces/interface=Ethernet0",
                "data/openconfig-spanning-tree:stp/mstp/mst-instances/mst-instance=1/config/vlan=4..5",
                "data/openconfig-spanning-tree:stp/mstp/mst-instances/mst-instance=2",
            ]
        );
        let mstp = pruned.mstp.unwrap();
        assert_eq!(mstp.mst_name, None);
        assert_eq!(mstp.mst_instances.get(&1).unwrap().vlans.encode(), vec!["4-5"]);
    }

    #[test]
    fn test_bare_vlan_entity_removed_per_attribute() {
        let have = parse(
            "pvst:\n  - vlan_id: 7\n    hello_time: 3\n    bridge_priority: 0\n    interfaces:\n      - intf_name: Ethernet0\n        cost: 1\n",
        );
        let commands = parse("pvst:\n  - vlan_id: 7\n");

        let (pruned, requests) = DeleteRequestBuilder::new(&have).build(&commands);
        assert_eq!(
            paths_of(&requests),
            vec![
                "data/openconfig-spanning-tree:stp/openconfig-spanning-tree-ext:pvst/vlans=7/config/hello-time",
                "data/openconfig-spanning-tree:stp/openconfig-spanning-tree-ext:pvst/vlans=7/config/bridge-priority",
                "data/openconfig-spanning-tree:stp/openconfig-spanning-tree-ext:pvst/vlans=7/interfaces/interface=Ethernet0",
            ]
        );
        assert!(pruned.pvst.contains_key(&7));
    }

    #[test]
    fn test_section_order() {
        let have = parse(
            r"
global:
  loop_guard: true
interfaces:
  - intf_name: Ethernet0
    guard: loop
mstp:
  max_hop: 5
rapid_pvst:
  - vlan_id: 3
    max_age: 9
",
        );
        let (_, requests) = DeleteRequestBuilder::new(&have).build(&have);
        let order: Vec<bool> = vec![
            requests[0].path.contains("/mstp/"),
            requests[1].path.contains("/rapid-pvst/"),
            requests[2].path.contains("/interfaces/"),
            requests[3].path.contains("/global/"),
        ];
        assert_eq!(requests.len(), 4);
        assert!(order.into_iter().all(|ok| ok));
    }

    #[test]
    fn test_nothing_configured_nothing_deleted() {
        let commands = parse("global:\n  loop_guard: true\nmstp:\n  max_hop: 3\n");
        let (pruned, requests) = DeleteRequestBuilder::new(&StpConfig::new()).build(&commands);
        assert!(requests.is_empty());
        assert!(pruned.is_empty());
    }
}
