//! Resource paths of the spanning-tree API.

/// Root of the spanning-tree resource.
pub const STP_PATH: &str = "data/openconfig-spanning-tree:stp";

/// Prefix of leaves defined by the vendor extension model.
pub(crate) const EXT: &str = "openconfig-spanning-tree-ext:";

/// The two per-VLAN protocol families, which share a shape but not a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerVlanFamily {
    /// Classic per-VLAN spanning tree.
    Pvst,
    /// Rapid per-VLAN spanning tree.
    RapidPvst,
}

impl PerVlanFamily {
    /// Path of the section container.
    #[must_use]
    pub fn section_path(self) -> String {
        match self {
            Self::Pvst => format!("{STP_PATH}/{EXT}pvst"),
            Self::RapidPvst => format!("{STP_PATH}/rapid-pvst"),
        }
    }

    /// Path of one VLAN entry.
    #[must_use]
    pub fn vlan_path(self, vlan_id: u16) -> String {
        match self {
            Self::Pvst => format!("{}/vlans={vlan_id}", self.section_path()),
            Self::RapidPvst => format!("{}/vlan={vlan_id}", self.section_path()),
        }
    }

    /// Path of one configuration leaf of a VLAN entry.
    #[must_use]
    pub fn vlan_attr(self, vlan_id: u16, attr: &str) -> String {
        format!("{}/config/{attr}", self.vlan_path(vlan_id))
    }

    /// Path of an interface inside a VLAN entry, or one of its leaves.
    #[must_use]
    pub fn interface(self, vlan_id: u16, intf_name: &str, attr: Option<&str>) -> String {
        with_attr(
            format!("{}/interfaces/interface={intf_name}", self.vlan_path(vlan_id)),
            attr,
        )
    }

    /// Section name as used in log messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pvst => "pvst",
            Self::RapidPvst => "rapid_pvst",
        }
    }
}

fn with_attr(base: String, attr: Option<&str>) -> String {
    match attr {
        Some(attr) => format!("{base}/config/{attr}"),
        None => base,
    }
}

pub(crate) fn global() -> String {
    format!("{STP_PATH}/global")
}

pub(crate) fn global_attr(attr: &str) -> String {
    format!("{STP_PATH}/global/config/{attr}")
}

pub(crate) fn interfaces() -> String {
    format!("{STP_PATH}/interfaces")
}

pub(crate) fn interface(intf_name: &str, attr: Option<&str>) -> String {
    with_attr(format!("{STP_PATH}/interfaces/interface={intf_name}"), attr)
}

pub(crate) fn mstp() -> String {
    format!("{STP_PATH}/mstp")
}

pub(crate) fn mstp_config() -> String {
    format!("{STP_PATH}/mstp/config")
}

pub(crate) fn mstp_attr(attr: &str) -> String {
    format!("{STP_PATH}/mstp/config/{attr}")
}

pub(crate) fn mst_instances() -> String {
    format!("{STP_PATH}/mstp/mst-instances")
}

pub(crate) fn mst_instance(mst_id: u16, attr: Option<&str>) -> String {
    with_attr(
        format!("{STP_PATH}/mstp/mst-instances/mst-instance={mst_id}"),
        attr,
    )
}

pub(crate) fn mst_interface(mst_id: u16, intf_name: &str, attr: Option<&str>) -> String {
    with_attr(
        format!("{STP_PATH}/mstp/mst-instances/mst-instance={mst_id}/interfaces/interface={intf_name}"),
        attr,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_paths() {
        assert_eq!(
            interface("Ethernet4", Some("edge-port")),
            "data/openconfig-spanning-tree:stp/interfaces/interface=Ethernet4/config/edge-port"
        );
        assert_eq!(
            mst_interface(10, "Ethernet0", None),
            "data/openconfig-spanning-tree:stp/mstp/mst-instances/mst-instance=10/interfaces/interface=Ethernet0"
        );
    }

    #[test]
    fn test_per_vlan_paths() {
        assert_eq!(
            PerVlanFamily::Pvst.vlan_attr(5, "hello-time"),
            "data/openconfig-spanning-tree:stp/openconfig-spanning-tree-ext:pvst/vlans=5/config/hello-time"
        );
        assert_eq!(
            PerVlanFamily::RapidPvst.interface(5, "Ethernet0", Some("cost")),
            "data/openconfig-spanning-tree:stp/rapid-pvst/vlan=5/interfaces/interface=Ethernet0/config/cost"
        );
    }
}
