//! Spanning-tree configuration tree.
//!
//! These types describe one snapshot of the device's spanning-tree
//! configuration, either desired ("want") or current ("have"). Every field is
//! optional: an absent field inherits the device default, which is not the
//! same as a field explicitly set to its default value.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::keyed::{Keyed, KeyedList};
use crate::vlan::VlanSet;

/// The root of a spanning-tree configuration snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StpConfig {
    /// Switch-wide settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<GlobalConfig>,
    /// Per-interface overrides keyed by interface name.
    #[serde(default, skip_serializing_if = "KeyedList::is_empty")]
    pub interfaces: KeyedList<InterfaceConfig>,
    /// Multiple spanning-tree settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mstp: Option<MstpConfig>,
    /// Per-VLAN spanning-tree entries keyed by VLAN ID.
    #[serde(default, skip_serializing_if = "KeyedList::is_empty")]
    pub pvst: KeyedList<VlanConfig>,
    /// Rapid per-VLAN spanning-tree entries keyed by VLAN ID.
    #[serde(default, skip_serializing_if = "KeyedList::is_empty")]
    pub rapid_pvst: KeyedList<VlanConfig>,
}

/// Switch-wide spanning-tree settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlobalConfig {
    /// Active protocol family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_protocol: Option<StpProtocol>,
    /// Loop guard on all ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_guard: Option<bool>,
    /// BPDU filter on edge ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpdu_filter: Option<bool>,
    /// VLANs on which spanning tree is disabled.
    #[serde(default, skip_serializing_if = "VlanSet::is_empty")]
    pub disabled_vlans: VlanSet,
    /// Root guard timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_guard_timeout: Option<u32>,
    /// Portfast on all ports (PVST only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfast: Option<bool>,
    /// Hello interval in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hello_time: Option<u32>,
    /// Maximum BPDU age in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    /// Forwarding delay in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwd_delay: Option<u32>,
    /// Bridge priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_priority: Option<u32>,
}

/// Spanning-tree settings of a single interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterfaceConfig {
    /// Interface name (key).
    pub intf_name: String,
    /// Edge port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_port: Option<bool>,
    /// Link type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
    /// Port guard mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<GuardMode>,
    /// BPDU guard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpdu_guard: Option<bool>,
    /// BPDU filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpdu_filter: Option<bool>,
    /// Portfast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfast: Option<bool>,
    /// Uplink fast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uplink_fast: Option<bool>,
    /// Shut the port down on BPDU guard violation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown: Option<bool>,
    /// Port path cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    /// Port priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_priority: Option<u32>,
    /// Spanning tree enabled on the port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stp_enable: Option<bool>,
}

/// Multiple spanning-tree settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MstpConfig {
    /// MST region name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mst_name: Option<String>,
    /// MST region revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    /// Maximum hop count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hop: Option<u32>,
    /// Hello interval in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hello_time: Option<u32>,
    /// Maximum BPDU age in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    /// Forwarding delay in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwd_delay: Option<u32>,
    /// MST instances keyed by instance ID.
    #[serde(default, skip_serializing_if = "KeyedList::is_empty")]
    pub mst_instances: KeyedList<MstInstance>,
}

/// A single MST instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MstInstance {
    /// Instance ID (key).
    pub mst_id: u16,
    /// Bridge priority for this instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_priority: Option<u32>,
    /// VLANs mapped to this instance.
    #[serde(default, skip_serializing_if = "VlanSet::is_empty")]
    pub vlans: VlanSet,
    /// Per-interface settings within this instance.
    #[serde(default, skip_serializing_if = "KeyedList::is_empty")]
    pub interfaces: KeyedList<PortSetting>,
}

/// A per-VLAN spanning-tree entry (PVST or rapid PVST).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VlanConfig {
    /// VLAN ID (key).
    pub vlan_id: u16,
    /// Hello interval in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hello_time: Option<u32>,
    /// Maximum BPDU age in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    /// Forwarding delay in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fwd_delay: Option<u32>,
    /// Bridge priority for this VLAN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_priority: Option<u32>,
    /// Per-interface settings within this VLAN.
    #[serde(default, skip_serializing_if = "KeyedList::is_empty")]
    pub interfaces: KeyedList<PortSetting>,
}

/// Cost and priority of an interface inside an MST instance or VLAN.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortSetting {
    /// Interface name (key).
    pub intf_name: String,
    /// Port path cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    /// Port priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_priority: Option<u32>,
}

/// Spanning-tree protocol family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StpProtocol {
    /// Multiple spanning tree.
    Mst,
    /// Per-VLAN spanning tree.
    Pvst,
    /// Rapid per-VLAN spanning tree.
    RapidPvst,
}

/// Interface link type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum LinkType {
    /// Point-to-point link.
    PointToPoint,
    /// Shared medium.
    Shared,
}

/// Interface guard mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GuardMode {
    /// Loop guard.
    Loop,
    /// Root guard.
    Root,
    /// No guard.
    None,
}

impl Keyed for InterfaceConfig {
    type Key = String;
    const KEY_FIELD: &'static str = "intf_name";

    fn key(&self) -> &String {
        &self.intf_name
    }
}

impl Keyed for PortSetting {
    type Key = String;
    const KEY_FIELD: &'static str = "intf_name";

    fn key(&self) -> &String {
        &self.intf_name
    }
}

impl Keyed for MstInstance {
    type Key = u16;
    const KEY_FIELD: &'static str = "mst_id";

    fn key(&self) -> &u16 {
        &self.mst_id
    }
}

impl Keyed for VlanConfig {
    type Key = u16;
    const KEY_FIELD: &'static str = "vlan_id";

    fn key(&self) -> &u16 {
        &self.vlan_id
    }
}

impl StpProtocol {
    /// Identity value used on the wire.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Mst => "MSTP",
            Self::Pvst => "PVST",
            Self::RapidPvst => "RAPID_PVST",
        }
    }
}

impl LinkType {
    /// Identity value used on the wire.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::PointToPoint => "P2P",
            Self::Shared => "SHARED",
        }
    }
}

impl GuardMode {
    /// Identity value used on the wire.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Loop => "LOOP",
            Self::Root => "ROOT",
            Self::None => "NONE",
        }
    }
}

impl StpConfig {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no section carries any configuration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.global.is_none()
            && self.interfaces.is_empty()
            && self.mstp.is_none()
            && self.pvst.is_empty()
            && self.rapid_pvst.is_empty()
    }

    /// Protocol currently selected in the global section, if any.
    #[must_use]
    pub fn enabled_protocol(&self) -> Option<StpProtocol> {
        self.global.as_ref().and_then(|g| g.enabled_protocol)
    }

    /// Looks up an MST instance by ID.
    #[must_use]
    pub fn mst_instance(&self, mst_id: u16) -> Option<&MstInstance> {
        self.mstp
            .as_ref()
            .and_then(|mstp| mstp.mst_instances.get(&mst_id))
    }

    /// Returns the number of top-level sections present.
    #[must_use]
    pub fn section_count(&self) -> usize {
        [
            self.global.is_some(),
            !self.interfaces.is_empty(),
            self.mstp.is_some(),
            !self.pvst.is_empty(),
            !self.rapid_pvst.is_empty(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

impl InterfaceConfig {
    /// Creates an interface entry carrying only its name.
    #[must_use]
    pub fn named(intf_name: impl Into<String>) -> Self {
        Self {
            intf_name: intf_name.into(),
            ..Self::default()
        }
    }
}

impl PortSetting {
    /// Creates a port entry carrying only its name.
    #[must_use]
    pub fn named(intf_name: impl Into<String>) -> Self {
        Self {
            intf_name: intf_name.into(),
            ..Self::default()
        }
    }
}

impl MstInstance {
    /// Creates an instance entry carrying only its ID.
    #[must_use]
    pub fn with_id(mst_id: u16) -> Self {
        Self {
            mst_id,
            ..Self::default()
        }
    }
}

impl VlanConfig {
    /// Creates a VLAN entry carrying only its ID.
    #[must_use]
    pub fn with_id(vlan_id: u16) -> Self {
        Self {
            vlan_id,
            ..Self::default()
        }
    }
}

impl fmt::Display for StpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mst => "mst",
            Self::Pvst => "pvst",
            Self::RapidPvst => "rapid_pvst",
        };
        write!(f, "{s}")
    }
}
