//! Typed OpenConfig request bodies.
//!
//! Field names follow the device model exactly, including module prefixes
//! on extension leaves. Optional leaves are omitted when unset.

use serde::Serialize;

use crate::vlan::VlanMember;

/// Body of a global section update.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalPayload {
    #[serde(rename = "openconfig-spanning-tree:global")]
    pub global: Configured<GlobalLeaves>,
}

/// A container whose leaves live under `config`.
#[derive(Debug, Clone, Serialize)]
pub struct Configured<T> {
    pub config: T,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GlobalLeaves {
    #[serde(rename = "enabled-protocol", skip_serializing_if = "Option::is_none")]
    pub enabled_protocol: Option<Vec<&'static str>>,
    #[serde(rename = "loop-guard", skip_serializing_if = "Option::is_none")]
    pub loop_guard: Option<bool>,
    #[serde(rename = "bpdu-filter", skip_serializing_if = "Option::is_none")]
    pub bpdu_filter: Option<bool>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:disabled-vlans",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub disabled_vlans: Vec<VlanMember>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:rootguard-timeout",
        skip_serializing_if = "Option::is_none"
    )]
    pub rootguard_timeout: Option<u32>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:portfast",
        skip_serializing_if = "Option::is_none"
    )]
    pub portfast: Option<bool>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:hello-time",
        skip_serializing_if = "Option::is_none"
    )]
    pub hello_time: Option<u32>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:max-age",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_age: Option<u32>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:forwarding-delay",
        skip_serializing_if = "Option::is_none"
    )]
    pub forwarding_delay: Option<u32>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:bridge-priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub bridge_priority: Option<u32>,
}

/// Body of an interfaces section update.
#[derive(Debug, Clone, Serialize)]
pub struct InterfacesPayload {
    #[serde(rename = "openconfig-spanning-tree:interfaces")]
    pub interfaces: InterfaceList<InterfaceLeaves>,
}

/// A list of interface entries.
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceList<T> {
    pub interface: Vec<InterfaceEntry<T>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceEntry<T> {
    pub name: String,
    pub config: T,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InterfaceLeaves {
    pub name: String,
    #[serde(rename = "edge-port", skip_serializing_if = "Option::is_none")]
    pub edge_port: Option<&'static str>,
    #[serde(rename = "link-type", skip_serializing_if = "Option::is_none")]
    pub link_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guard: Option<&'static str>,
    #[serde(rename = "bpdu-guard", skip_serializing_if = "Option::is_none")]
    pub bpdu_guard: Option<bool>,
    #[serde(rename = "bpdu-filter", skip_serializing_if = "Option::is_none")]
    pub bpdu_filter: Option<bool>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:portfast",
        skip_serializing_if = "Option::is_none"
    )]
    pub portfast: Option<bool>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:uplink-fast",
        skip_serializing_if = "Option::is_none"
    )]
    pub uplink_fast: Option<bool>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:bpdu-guard-port-shutdown",
        skip_serializing_if = "Option::is_none"
    )]
    pub bpdu_guard_port_shutdown: Option<bool>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:cost",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<u32>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:port-priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub port_priority: Option<u32>,
    #[serde(
        rename = "openconfig-spanning-tree-ext:spanning-tree-enable",
        skip_serializing_if = "Option::is_none"
    )]
    pub spanning_tree_enable: Option<bool>,
}

/// Cost and priority of an interface inside an instance or VLAN.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PortLeaves {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    #[serde(rename = "port-priority", skip_serializing_if = "Option::is_none")]
    pub port_priority: Option<u32>,
}

/// Body of an MSTP section update.
#[derive(Debug, Clone, Serialize)]
pub struct MstpPayload {
    #[serde(rename = "openconfig-spanning-tree:mstp")]
    pub mstp: MstpBody,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MstpBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<MstpLeaves>,
    #[serde(rename = "mst-instances", skip_serializing_if = "Option::is_none")]
    pub mst_instances: Option<MstInstanceList>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MstpLeaves {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    #[serde(rename = "max-hop", skip_serializing_if = "Option::is_none")]
    pub max_hop: Option<u32>,
    #[serde(rename = "hello-time", skip_serializing_if = "Option::is_none")]
    pub hello_time: Option<u32>,
    #[serde(rename = "max-age", skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    #[serde(rename = "forwarding-delay", skip_serializing_if = "Option::is_none")]
    pub forwarding_delay: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MstInstanceList {
    #[serde(rename = "mst-instance")]
    pub mst_instance: Vec<MstInstanceEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MstInstanceEntry {
    #[serde(rename = "mst-id")]
    pub mst_id: u16,
    pub config: MstInstanceLeaves,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<InterfaceList<PortLeaves>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MstInstanceLeaves {
    #[serde(rename = "mst-id")]
    pub mst_id: u16,
    #[serde(rename = "bridge-priority", skip_serializing_if = "Option::is_none")]
    pub bridge_priority: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vlan: Vec<VlanMember>,
}

/// Body of a PVST section update.
#[derive(Debug, Clone, Serialize)]
pub struct PvstPayload {
    #[serde(rename = "openconfig-spanning-tree-ext:pvst")]
    pub pvst: PvstBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct PvstBody {
    pub vlans: Vec<VlanEntry>,
}

/// Body of a rapid PVST section update.
#[derive(Debug, Clone, Serialize)]
pub struct RapidPvstPayload {
    #[serde(rename = "openconfig-spanning-tree:rapid-pvst")]
    pub rapid_pvst: RapidPvstBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct RapidPvstBody {
    pub vlan: Vec<VlanEntry>,
}

/// One per-VLAN entry, shared by both per-VLAN families.
#[derive(Debug, Clone, Serialize)]
pub struct VlanEntry {
    #[serde(rename = "vlan-id")]
    pub vlan_id: u16,
    pub config: VlanLeaves,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<InterfaceList<PortLeaves>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VlanLeaves {
    #[serde(rename = "vlan-id")]
    pub vlan_id: u16,
    #[serde(rename = "hello-time", skip_serializing_if = "Option::is_none")]
    pub hello_time: Option<u32>,
    #[serde(rename = "max-age", skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    #[serde(rename = "forwarding-delay", skip_serializing_if = "Option::is_none")]
    pub forwarding_delay: Option<u32>,
    #[serde(rename = "bridge-priority", skip_serializing_if = "Option::is_none")]
    pub bridge_priority: Option<u32>,
}
