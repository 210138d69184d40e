//! Update requests.
//!
//! One PATCH per section present in the command tree, in the order global,
//! interfaces, mstp, pvst, rapid pvst. Mandatory leaves are always filled.

use tracing::debug;

use super::WireRequest;
use super::paths::{self, PerVlanFamily};
use super::payload::{
    Configured, GlobalLeaves, GlobalPayload, InterfaceEntry, InterfaceLeaves, InterfaceList,
    InterfacesPayload, MstInstanceEntry, MstInstanceLeaves, MstInstanceList, MstpBody, MstpLeaves,
    MstpPayload, PortLeaves, PvstBody, PvstPayload, RapidPvstBody, RapidPvstPayload, VlanEntry,
    VlanLeaves,
};
use crate::config::defaults::{
    GLOBAL_BPDU_FILTER, INTF_BPDU_FILTER, INTF_BPDU_GUARD, INTF_STP_ENABLE, INTF_UPLINK_FAST,
};
use crate::config::{
    GlobalConfig, InterfaceConfig, KeyedList, MstpConfig, PortSetting, StpConfig, StpProtocol,
    VlanConfig,
};
use crate::error::{ConfigError, Result};

/// Builds update requests for a command tree against the current snapshot.
#[derive(Debug)]
pub struct ModifyRequestBuilder<'a> {
    have: &'a StpConfig,
}

impl<'a> ModifyRequestBuilder<'a> {
    /// Creates a builder; `have` supplies fallbacks for mandatory leaves.
    #[must_use]
    pub const fn new(have: &'a StpConfig) -> Self {
        Self { have }
    }

    /// Builds the update requests for `commands`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for portfast outside PVST or an MST
    /// instance given interfaces but no VLANs, and a serialization error if
    /// a payload cannot be encoded.
    pub fn build(&self, commands: &StpConfig) -> Result<Vec<WireRequest>> {
        let mut requests = Vec::new();

        if let Some(global) = &commands.global {
            requests.push(self.global_request(global)?);
        }
        if !commands.interfaces.is_empty() {
            let active = commands
                .enabled_protocol()
                .or_else(|| self.have.enabled_protocol());
            requests.push(self.interfaces_request(&commands.interfaces, active)?);
        }
        if let Some(mstp) = &commands.mstp {
            if let Some(request) = self.mstp_request(mstp)? {
                requests.push(request);
            }
        }
        if !commands.pvst.is_empty() {
            requests.push(per_vlan_request(PerVlanFamily::Pvst, &commands.pvst)?);
        }
        if !commands.rapid_pvst.is_empty() {
            requests.push(per_vlan_request(PerVlanFamily::RapidPvst, &commands.rapid_pvst)?);
        }

        for request in &requests {
            debug!("Generated request: {request}");
        }
        Ok(requests)
    }

    fn global_request(&self, global: &GlobalConfig) -> Result<WireRequest> {
        let active = global
            .enabled_protocol
            .or_else(|| self.have.enabled_protocol());

        let portfast = match global.portfast {
            Some(value) if active == Some(StpProtocol::Pvst) => Some(value),
            Some(true) => {
                return Err(ConfigError::validation(
                    "Portfast only configurable for pvst protocol",
                    "global.portfast",
                )
                .into());
            }
            _ => None,
        };

        let leaves = GlobalLeaves {
            enabled_protocol: global.enabled_protocol.map(|p| vec![p.wire_name()]),
            loop_guard: global.loop_guard,
            bpdu_filter: GLOBAL_BPDU_FILTER.payload(global.bpdu_filter),
            disabled_vlans: global.disabled_vlans.wire_members(),
            rootguard_timeout: global.root_guard_timeout,
            portfast,
            hello_time: global.hello_time,
            max_age: global.max_age,
            forwarding_delay: global.fwd_delay,
            bridge_priority: global.bridge_priority,
        };

        WireRequest::patch(
            paths::global(),
            &GlobalPayload {
                global: Configured { config: leaves },
            },
        )
    }

    fn interfaces_request(
        &self,
        interfaces: &KeyedList<InterfaceConfig>,
        active: Option<StpProtocol>,
    ) -> Result<WireRequest> {
        let pvst = active == Some(StpProtocol::Pvst);
        if !pvst {
            if let Some(intf) = interfaces.iter().find(|i| i.portfast == Some(true)) {
                return Err(ConfigError::validation(
                    "Portfast only configurable for pvst protocol",
                    format!("interfaces[{}].portfast", intf.intf_name),
                )
                .into());
            }
        }

        let interface = interfaces
            .iter()
            .map(|intf| InterfaceEntry {
                name: intf.intf_name.clone(),
                config: interface_leaves(intf, pvst),
            })
            .collect();

        WireRequest::patch(
            paths::interfaces(),
            &InterfacesPayload {
                interfaces: InterfaceList { interface },
            },
        )
    }

    fn mstp_request(&self, mstp: &MstpConfig) -> Result<Option<WireRequest>> {
        let config = MstpLeaves {
            name: mstp.mst_name.clone(),
            revision: mstp.revision,
            max_hop: mstp.max_hop,
            hello_time: mstp.hello_time,
            max_age: mstp.max_age,
            forwarding_delay: mstp.fwd_delay,
        };
        let has_config = config.name.is_some()
            || config.revision.is_some()
            || config.max_hop.is_some()
            || config.hello_time.is_some()
            || config.max_age.is_some()
            || config.forwarding_delay.is_some();

        let mut instances = Vec::new();
        for inst in mstp.mst_instances.iter() {
            let current_has_vlans = self
                .have
                .mst_instance(inst.mst_id)
                .is_some_and(|current| !current.vlans.is_empty());
            if !inst.interfaces.is_empty() && inst.vlans.is_empty() && !current_has_vlans {
                return Err(ConfigError::validation(
                    "Interfaces cannot be configured for an mst instance without vlans",
                    format!("mstp.mst_instances[{}].interfaces", inst.mst_id),
                )
                .into());
            }

            instances.push(MstInstanceEntry {
                mst_id: inst.mst_id,
                config: MstInstanceLeaves {
                    mst_id: inst.mst_id,
                    bridge_priority: inst.bridge_priority,
                    vlan: inst.vlans.wire_members(),
                },
                interfaces: port_list(&inst.interfaces),
            });
        }

        if !has_config && instances.is_empty() {
            return Ok(None);
        }

        let body = MstpBody {
            config: has_config.then_some(config),
            mst_instances: (!instances.is_empty()).then_some(MstInstanceList {
                mst_instance: instances,
            }),
        };
        WireRequest::patch(paths::mstp(), &MstpPayload { mstp: body }).map(Some)
    }
}

fn interface_leaves(intf: &InterfaceConfig, pvst: bool) -> InterfaceLeaves {
    InterfaceLeaves {
        name: intf.intf_name.clone(),
        edge_port: intf
            .edge_port
            .map(|edge| if edge { "EDGE_ENABLE" } else { "EDGE_DISABLE" }),
        link_type: intf.link_type.map(|l| l.wire_name()),
        guard: intf.guard.map(|g| g.wire_name()),
        bpdu_guard: INTF_BPDU_GUARD.payload(intf.bpdu_guard),
        bpdu_filter: INTF_BPDU_FILTER.payload(intf.bpdu_filter),
        portfast: intf.portfast.filter(|_| pvst),
        uplink_fast: INTF_UPLINK_FAST.payload(intf.uplink_fast),
        bpdu_guard_port_shutdown: intf.shutdown,
        cost: intf.cost,
        port_priority: intf.port_priority,
        spanning_tree_enable: INTF_STP_ENABLE.payload(intf.stp_enable),
    }
}

fn port_list(ports: &KeyedList<PortSetting>) -> Option<InterfaceList<PortLeaves>> {
    if ports.is_empty() {
        return None;
    }
    let interface = ports
        .iter()
        .map(|port| InterfaceEntry {
            name: port.intf_name.clone(),
            config: PortLeaves {
                name: port.intf_name.clone(),
                cost: port.cost,
                port_priority: port.port_priority,
            },
        })
        .collect();
    Some(InterfaceList { interface })
}

fn per_vlan_request(family: PerVlanFamily, entries: &KeyedList<VlanConfig>) -> Result<WireRequest> {
    let vlans: Vec<VlanEntry> = entries
        .iter()
        .map(|entry| VlanEntry {
            vlan_id: entry.vlan_id,
            config: VlanLeaves {
                vlan_id: entry.vlan_id,
                hello_time: entry.hello_time,
                max_age: entry.max_age,
                forwarding_delay: entry.fwd_delay,
                bridge_priority: entry.bridge_priority,
            },
            interfaces: port_list(&entry.interfaces),
        })
        .collect();

    match family {
        PerVlanFamily::Pvst => WireRequest::patch(
            family.section_path(),
            &PvstPayload {
                pvst: PvstBody { vlans },
            },
        ),
        PerVlanFamily::RapidPvst => WireRequest::patch(
            family.section_path(),
            &RapidPvstPayload {
                rapid_pvst: RapidPvstBody { vlan: vlans },
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(yaml: &str) -> StpConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_global_request_fills_mandatory_leaf() {
        let commands = parse("global:\n  enabled_protocol: rapid_pvst\n");
        let have = StpConfig::new();
        let requests = ModifyRequestBuilder::new(&have).build(&commands).unwrap();

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "data/openconfig-spanning-tree:stp/global");
        assert_eq!(
            requests[0].data,
            Some(json!({
                "openconfig-spanning-tree:global": {
                    "config": {
                        "enabled-protocol": ["RAPID_PVST"],
                        "bpdu-filter": false
                    }
                }
            }))
        );
    }

    #[test]
    fn test_mandatory_leaf_ignores_have() {
        let commands = parse("global:\n  loop_guard: true\n");
        let have = parse("global:\n  enabled_protocol: mst\n  bpdu_filter: true\n");
        let requests = ModifyRequestBuilder::new(&have).build(&commands).unwrap();

        let config = &requests[0].data.as_ref().unwrap()["openconfig-spanning-tree:global"]["config"];
        assert_eq!(config["bpdu-filter"], json!(false));
        assert_eq!(config["loop-guard"], json!(true));

        let commands = parse("interfaces:\n  - intf_name: Ethernet0\n    cost: 5\n");
        let have = parse(
            "interfaces:\n  - intf_name: Ethernet0\n    bpdu_filter: true\n    stp_enable: false\n",
        );
        let requests = ModifyRequestBuilder::new(&have).build(&commands).unwrap();

        let config = &requests[0].data.as_ref().unwrap()["openconfig-spanning-tree:interfaces"]
            ["interface"][0]["config"];
        assert_eq!(config["bpdu-filter"], json!(false));
        assert_eq!(config["openconfig-spanning-tree-ext:spanning-tree-enable"], json!(true));
        assert_eq!(config["openconfig-spanning-tree-ext:cost"], json!(5));
    }

    #[test]
    fn test_global_portfast_protocol_check() {
        let have = StpConfig::new();
        let commands = parse("global:\n  enabled_protocol: mst\n  portfast: true\n");
        let err = ModifyRequestBuilder::new(&have).build(&commands).unwrap_err();
        assert!(err.is_validation());

        // false outside pvst is dropped, not rejected
        let commands = parse("global:\n  enabled_protocol: mst\n  portfast: false\n");
        let requests = ModifyRequestBuilder::new(&have).build(&commands).unwrap();
        let config = &requests[0].data.as_ref().unwrap()["openconfig-spanning-tree:global"]["config"];
        assert!(config.get("openconfig-spanning-tree-ext:portfast").is_none());

        let have = parse("global:\n  enabled_protocol: pvst\n");
        let commands = parse("global:\n  portfast: true\n");
        assert!(ModifyRequestBuilder::new(&have).build(&commands).is_ok());
    }

    #[test]
    fn test_interfaces_request() {
        let commands = parse(
            r"
interfaces:
  - intf_name: Ethernet0
    edge_port: true
    link_type: shared
    guard: root
    cost: 20
",
        );
        let have = StpConfig::new();
        let requests = ModifyRequestBuilder::new(&have).build(&commands).unwrap();

        assert_eq!(
            requests[0].data,
            Some(json!({
                "openconfig-spanning-tree:interfaces": {
                    "interface": [{
                        "name": "Ethernet0",
                        "config": {
                            "name": "Ethernet0",
                            "edge-port": "EDGE_ENABLE",
                            "link-type": "SHARED",
                            "guard": "ROOT",
                            "bpdu-guard": false,
                            "bpdu-filter": false,
                            "openconfig-spanning-tree-ext:uplink-fast": false,
                            "openconfig-spanning-tree-ext:cost": 20,
                            "openconfig-spanning-tree-ext:spanning-tree-enable": true
                        }
                    }]
                }
            }))
        );
    }

    #[test]
    fn test_interface_portfast_follows_protocol() {
        let commands = parse("interfaces:\n  - intf_name: Ethernet0\n    portfast: true\n");
        let have = parse("global:\n  enabled_protocol: pvst\n");
        let requests = ModifyRequestBuilder::new(&have).build(&commands).unwrap();
        let config = &requests[0].data.as_ref().unwrap()["openconfig-spanning-tree:interfaces"]
            ["interface"][0]["config"];
        assert_eq!(config["openconfig-spanning-tree-ext:portfast"], json!(true));

        let have = parse("global:\n  enabled_protocol: mst\n");
        let err = ModifyRequestBuilder::new(&have).build(&commands).unwrap_err();
        assert!(err.is_validation());

        let commands = parse("interfaces:\n  - intf_name: Ethernet0\n    portfast: false\n    cost: 3\n");
        let requests = ModifyRequestBuilder::new(&have).build(&commands).unwrap();
        let config = &requests[0].data.as_ref().unwrap()["openconfig-spanning-tree:interfaces"]
            ["interface"][0]["config"];
        assert!(config.get("openconfig-spanning-tree-ext:portfast").is_none());
    }

    #[test]
    fn test_mstp_request() {
        let commands = parse(
            r"
mstp:
  mst_name: r1
  mst_instances:
    - mst_id: 2
      bridge_priority: 8192
      vlans: [5, '10-12']
      interfaces:
        - intf_name: Ethernet0
          port_priority: 32
",
        );
        let have = StpConfig::new();
        let requests = ModifyRequestBuilder::new(&have).build(&commands).unwrap();

        assert_eq!(requests[0].path, "data/openconfig-spanning-tree:stp/mstp");
        assert_eq!(
            requests[0].data,
            Some(json!({
                "openconfig-spanning-tree:mstp": {
                    "config": {"name": "r1"},
                    "mst-instances": {
                        "mst-instance": [{
                            "mst-id": 2,
                            "config": {"mst-id": 2, "bridge-priority": 8192, "vlan": [5, "10..12"]},
                            "interfaces": {
                                "interface": [{
                                    "name": "Ethernet0",
                                    "config": {"name": "Ethernet0", "port-priority": 32}
                                }]
                            }
                        }]
                    }
                }
            }))
        );
    }

    #[test]
    fn test_mst_interfaces_without_vlans_rejected() {
        let commands = parse(
            "mstp:\n  mst_instances:\n    - mst_id: 2\n      interfaces:\n        - intf_name: Ethernet0\n          cost: 1\n",
        );
        let err = ModifyRequestBuilder::new(&StpConfig::new())
            .build(&commands)
            .unwrap_err();
        assert!(err.is_validation());

        let have = parse("mstp:\n  mst_instances:\n    - mst_id: 2\n      vlans: [3]\n");
        assert!(ModifyRequestBuilder::new(&have).build(&commands).is_ok());
    }

    #[test]
    fn test_per_vlan_requests() {
        let commands = parse(
            r"
pvst:
  - vlan_id: 10
    hello_time: 3
rapid_pvst:
  - vlan_id: 20
    bridge_priority: 0
    interfaces:
      - intf_name: Ethernet8
        cost: 7
",
        );
        let have = StpConfig::new();
        let requests = ModifyRequestBuilder::new(&have).build(&commands).unwrap();

        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[0].path,
            "data/openconfig-spanning-tree:stp/openconfig-spanning-tree-ext:pvst"
        );
        assert_eq!(
            requests[0].data,
            Some(json!({
                "openconfig-spanning-tree-ext:pvst": {
                    "vlans": [{"vlan-id": 10, "config": {"vlan-id": 10, "hello-time": 3}}]
                }
            }))
        );
        assert_eq!(requests[1].path, "data/openconfig-spanning-tree:stp/rapid-pvst");
        assert_eq!(
            requests[1].data,
            Some(json!({
                "openconfig-spanning-tree:rapid-pvst": {
                    "vlan": [{
                        "vlan-id": 20,
                        "config": {"vlan-id": 20, "bridge-priority": 0},
                        "interfaces": {
                            "interface": [{"name": "Ethernet8", "config": {"name": "Ethernet8", "cost": 7}}]
                        }
                    }]
                }
            }))
        );
    }
}
