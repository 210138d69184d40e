//! Structural operations shared by every node of the configuration tree.
//!
//! Each node kind implements [`ConfigNode`]; the helpers in this module lift
//! the per-node operations over optional sections and keyed lists so the diff
//! engine, the normalizer and the simulated apply all use one matching rule.

use crate::config::defaults::{
    CIST_MST_ID, GLOBAL_BPDU_FILTER, GLOBAL_BRIDGE_PRIORITY, GLOBAL_LOOP_GUARD, GLOBAL_PORTFAST,
    INTF_BPDU_FILTER, INTF_BPDU_GUARD, INTF_EDGE_PORT, INTF_PORTFAST, INTF_SHUTDOWN,
    INTF_STP_ENABLE, INTF_UPLINK_FAST,
};
use crate::config::{
    GlobalConfig, InterfaceConfig, Keyed, KeyedList, MstInstance, MstpConfig, PortSetting,
    StpConfig, VlanConfig,
};

/// A node of the configuration tree.
pub trait ConfigNode: Clone + PartialEq {
    /// Returns true when the node carries nothing besides its identity key.
    fn is_bare(&self) -> bool;

    /// Returns the part of `self` that `have` does not already hold.
    ///
    /// Keys are preserved so the result can be matched back to `have`.
    #[must_use]
    fn diff(&self, have: &Self) -> Self;

    /// Overlays `patch` onto `self`.
    fn merge(&mut self, patch: &Self);

    /// Removes from `self` every field that `target` sets.
    fn remove(&mut self, target: &Self);

    /// Clears fields holding their implicit default; returns true if any were cleared.
    fn strip_defaults(&mut self) -> bool;
}

fn diff_leaf<T: Clone + PartialEq>(want: &Option<T>, have: &Option<T>) -> Option<T> {
    match want {
        Some(value) if have.as_ref() != Some(value) => Some(value.clone()),
        _ => None,
    }
}

fn merge_leaf<T: Clone>(slot: &mut Option<T>, patch: &Option<T>) {
    if let Some(value) = patch {
        *slot = Some(value.clone());
    }
}

fn remove_leaf<T>(slot: &mut Option<T>, target: &Option<T>) {
    if target.is_some() {
        *slot = None;
    }
}

/// Diffs two keyed lists: new entities in full, shared entities by field.
pub fn diff_list<T: Keyed + ConfigNode>(want: &KeyedList<T>, have: &KeyedList<T>) -> KeyedList<T> {
    want.iter()
        .filter_map(|item| match have.get(item.key()) {
            None => Some(item.clone()),
            Some(current) => {
                let delta = item.diff(current);
                (!delta.is_bare()).then_some(delta)
            }
        })
        .collect()
}

/// Merges `patch` into `list` entity by entity.
pub fn merge_list<T: Keyed + ConfigNode>(list: &mut KeyedList<T>, patch: &KeyedList<T>) {
    for item in patch.iter() {
        match list.get_mut(item.key()) {
            Some(current) => current.merge(item),
            None => {
                list.insert(item.clone());
            }
        }
    }
}

/// Removes `target` from `list`.
///
/// A bare target removes the whole entity; otherwise only the named fields
/// go, and an entity left bare is dropped.
pub fn remove_list<T: Keyed + ConfigNode>(list: &mut KeyedList<T>, target: &KeyedList<T>) {
    for item in target.iter() {
        let key = item.key().clone();
        let drop_entity = match list.get_mut(&key) {
            Some(_) if item.is_bare() => true,
            Some(current) => {
                current.remove(item);
                current.is_bare()
            }
            None => false,
        };
        if drop_entity {
            list.remove(&key);
        }
    }
}

fn strip_list<T: Keyed + ConfigNode>(list: &mut KeyedList<T>) -> bool {
    let mut stripped = false;
    let mut emptied = Vec::new();
    for item in list.iter_mut() {
        if item.strip_defaults() {
            stripped = true;
            if item.is_bare() {
                emptied.push(item.key().clone());
            }
        }
    }
    for key in &emptied {
        list.remove(key);
    }
    stripped
}

/// Diffs an optional section; a bare result is dropped.
pub fn diff_section<T: ConfigNode>(want: &Option<T>, have: &Option<T>) -> Option<T> {
    let delta = match (want, have) {
        (Some(want), Some(have)) => want.diff(have),
        (Some(want), None) => want.clone(),
        (None, _) => return None,
    };
    (!delta.is_bare()).then_some(delta)
}

fn merge_section<T: ConfigNode>(slot: &mut Option<T>, patch: &Option<T>) {
    match (slot.as_mut(), patch) {
        (Some(current), Some(patch)) => current.merge(patch),
        (None, Some(patch)) => *slot = Some(patch.clone()),
        (_, None) => {}
    }
}

fn remove_section<T: ConfigNode>(slot: &mut Option<T>, target: &Option<T>) {
    let (Some(current), Some(target)) = (slot.as_mut(), target) else {
        return;
    };
    current.remove(target);
    if current.is_bare() {
        *slot = None;
    }
}

fn strip_section<T: ConfigNode>(slot: &mut Option<T>) -> bool {
    let Some(current) = slot.as_mut() else {
        return false;
    };
    let stripped = current.strip_defaults();
    if current.is_bare() {
        *slot = None;
    }
    stripped
}

impl ConfigNode for StpConfig {
    fn is_bare(&self) -> bool {
        self.global.as_ref().is_none_or(ConfigNode::is_bare)
            && self.interfaces.is_empty()
            && self.mstp.as_ref().is_none_or(ConfigNode::is_bare)
            && self.pvst.is_empty()
            && self.rapid_pvst.is_empty()
    }

    fn diff(&self, have: &Self) -> Self {
        Self {
            global: diff_section(&self.global, &have.global),
            interfaces: diff_list(&self.interfaces, &have.interfaces),
            mstp: diff_section(&self.mstp, &have.mstp),
            pvst: diff_list(&self.pvst, &have.pvst),
            rapid_pvst: diff_list(&self.rapid_pvst, &have.rapid_pvst),
        }
    }

    fn merge(&mut self, patch: &Self) {
        merge_section(&mut self.global, &patch.global);
        merge_list(&mut self.interfaces, &patch.interfaces);
        merge_section(&mut self.mstp, &patch.mstp);
        merge_list(&mut self.pvst, &patch.pvst);
        merge_list(&mut self.rapid_pvst, &patch.rapid_pvst);
    }

    fn remove(&mut self, target: &Self) {
        remove_section(&mut self.global, &target.global);
        remove_list(&mut self.interfaces, &target.interfaces);
        remove_section(&mut self.mstp, &target.mstp);
        remove_list(&mut self.pvst, &target.pvst);
        remove_list(&mut self.rapid_pvst, &target.rapid_pvst);
    }

    fn strip_defaults(&mut self) -> bool {
        let global = strip_section(&mut self.global);
        let interfaces = strip_list(&mut self.interfaces);
        let mstp = strip_section(&mut self.mstp);
        global || interfaces || mstp
    }
}

impl ConfigNode for GlobalConfig {
    fn is_bare(&self) -> bool {
        self.enabled_protocol.is_none()
            && self.loop_guard.is_none()
            && self.bpdu_filter.is_none()
            && self.disabled_vlans.is_empty()
            && self.root_guard_timeout.is_none()
            && self.portfast.is_none()
            && self.hello_time.is_none()
            && self.max_age.is_none()
            && self.fwd_delay.is_none()
            && self.bridge_priority.is_none()
    }

    fn diff(&self, have: &Self) -> Self {
        Self {
            enabled_protocol: diff_leaf(&self.enabled_protocol, &have.enabled_protocol),
            loop_guard: diff_leaf(&self.loop_guard, &have.loop_guard),
            bpdu_filter: diff_leaf(&self.bpdu_filter, &have.bpdu_filter),
            disabled_vlans: self.disabled_vlans.difference(&have.disabled_vlans),
            root_guard_timeout: diff_leaf(&self.root_guard_timeout, &have.root_guard_timeout),
            portfast: diff_leaf(&self.portfast, &have.portfast),
            hello_time: diff_leaf(&self.hello_time, &have.hello_time),
            max_age: diff_leaf(&self.max_age, &have.max_age),
            fwd_delay: diff_leaf(&self.fwd_delay, &have.fwd_delay),
            bridge_priority: diff_leaf(&self.bridge_priority, &have.bridge_priority),
        }
    }

    fn merge(&mut self, patch: &Self) {
        merge_leaf(&mut self.enabled_protocol, &patch.enabled_protocol);
        merge_leaf(&mut self.loop_guard, &patch.loop_guard);
        merge_leaf(&mut self.bpdu_filter, &patch.bpdu_filter);
        self.disabled_vlans = self.disabled_vlans.union(&patch.disabled_vlans);
        merge_leaf(&mut self.root_guard_timeout, &patch.root_guard_timeout);
        merge_leaf(&mut self.portfast, &patch.portfast);
        merge_leaf(&mut self.hello_time, &patch.hello_time);
        merge_leaf(&mut self.max_age, &patch.max_age);
        merge_leaf(&mut self.fwd_delay, &patch.fwd_delay);
        merge_leaf(&mut self.bridge_priority, &patch.bridge_priority);
    }

    fn remove(&mut self, target: &Self) {
        remove_leaf(&mut self.enabled_protocol, &target.enabled_protocol);
        remove_leaf(&mut self.loop_guard, &target.loop_guard);
        remove_leaf(&mut self.bpdu_filter, &target.bpdu_filter);
        self.disabled_vlans = self.disabled_vlans.difference(&target.disabled_vlans);
        remove_leaf(&mut self.root_guard_timeout, &target.root_guard_timeout);
        remove_leaf(&mut self.portfast, &target.portfast);
        remove_leaf(&mut self.hello_time, &target.hello_time);
        remove_leaf(&mut self.max_age, &target.max_age);
        remove_leaf(&mut self.fwd_delay, &target.fwd_delay);
        remove_leaf(&mut self.bridge_priority, &target.bridge_priority);
    }

    fn strip_defaults(&mut self) -> bool {
        let loop_guard = GLOBAL_LOOP_GUARD.strip(&mut self.loop_guard);
        let bpdu_filter = GLOBAL_BPDU_FILTER.strip(&mut self.bpdu_filter);
        let portfast = GLOBAL_PORTFAST.strip(&mut self.portfast);
        let bridge_priority = GLOBAL_BRIDGE_PRIORITY.strip(&mut self.bridge_priority);
        loop_guard || bpdu_filter || portfast || bridge_priority
    }
}

impl ConfigNode for InterfaceConfig {
    fn is_bare(&self) -> bool {
        self.edge_port.is_none()
            && self.link_type.is_none()
            && self.guard.is_none()
            && self.bpdu_guard.is_none()
            && self.bpdu_filter.is_none()
            && self.portfast.is_none()
            && self.uplink_fast.is_none()
            && self.shutdown.is_none()
            && self.cost.is_none()
            && self.port_priority.is_none()
            && self.stp_enable.is_none()
    }

    fn diff(&self, have: &Self) -> Self {
        Self {
            intf_name: self.intf_name.clone(),
            edge_port: diff_leaf(&self.edge_port, &have.edge_port),
            link_type: diff_leaf(&self.link_type, &have.link_type),
            guard: diff_leaf(&self.guard, &have.guard),
            bpdu_guard: diff_leaf(&self.bpdu_guard, &have.bpdu_guard),
            bpdu_filter: diff_leaf(&self.bpdu_filter, &have.bpdu_filter),
            portfast: diff_leaf(&self.portfast, &have.portfast),
            uplink_fast: diff_leaf(&self.uplink_fast, &have.uplink_fast),
            shutdown: diff_leaf(&self.shutdown, &have.shutdown),
            cost: diff_leaf(&self.cost, &have.cost),
            port_priority: diff_leaf(&self.port_priority, &have.port_priority),
            stp_enable: diff_leaf(&self.stp_enable, &have.stp_enable),
        }
    }

    fn merge(&mut self, patch: &Self) {
        merge_leaf(&mut self.edge_port, &patch.edge_port);
        merge_leaf(&mut self.link_type, &patch.link_type);
        merge_leaf(&mut self.guard, &patch.guard);
        merge_leaf(&mut self.bpdu_guard, &patch.bpdu_guard);
        merge_leaf(&mut self.bpdu_filter, &patch.bpdu_filter);
        merge_leaf(&mut self.portfast, &patch.portfast);
        merge_leaf(&mut self.uplink_fast, &patch.uplink_fast);
        merge_leaf(&mut self.shutdown, &patch.shutdown);
        merge_leaf(&mut self.cost, &patch.cost);
        merge_leaf(&mut self.port_priority, &patch.port_priority);
        merge_leaf(&mut self.stp_enable, &patch.stp_enable);
    }

    fn remove(&mut self, target: &Self) {
        remove_leaf(&mut self.edge_port, &target.edge_port);
        remove_leaf(&mut self.link_type, &target.link_type);
        remove_leaf(&mut self.guard, &target.guard);
        remove_leaf(&mut self.bpdu_guard, &target.bpdu_guard);
        remove_leaf(&mut self.bpdu_filter, &target.bpdu_filter);
        remove_leaf(&mut self.portfast, &target.portfast);
        remove_leaf(&mut self.uplink_fast, &target.uplink_fast);
        remove_leaf(&mut self.shutdown, &target.shutdown);
        remove_leaf(&mut self.cost, &target.cost);
        remove_leaf(&mut self.port_priority, &target.port_priority);
        remove_leaf(&mut self.stp_enable, &target.stp_enable);
    }

    fn strip_defaults(&mut self) -> bool {
        let stripped = [
            INTF_EDGE_PORT.strip(&mut self.edge_port),
            INTF_BPDU_GUARD.strip(&mut self.bpdu_guard),
            INTF_BPDU_FILTER.strip(&mut self.bpdu_filter),
            INTF_PORTFAST.strip(&mut self.portfast),
            INTF_UPLINK_FAST.strip(&mut self.uplink_fast),
            INTF_SHUTDOWN.strip(&mut self.shutdown),
            INTF_STP_ENABLE.strip(&mut self.stp_enable),
        ];
        stripped.contains(&true)
    }
}

impl ConfigNode for MstpConfig {
    fn is_bare(&self) -> bool {
        self.mst_name.is_none()
            && self.revision.is_none()
            && self.max_hop.is_none()
            && self.hello_time.is_none()
            && self.max_age.is_none()
            && self.fwd_delay.is_none()
            && self.mst_instances.is_empty()
    }

    fn diff(&self, have: &Self) -> Self {
        Self {
            mst_name: diff_leaf(&self.mst_name, &have.mst_name),
            revision: diff_leaf(&self.revision, &have.revision),
            max_hop: diff_leaf(&self.max_hop, &have.max_hop),
            hello_time: diff_leaf(&self.hello_time, &have.hello_time),
            max_age: diff_leaf(&self.max_age, &have.max_age),
            fwd_delay: diff_leaf(&self.fwd_delay, &have.fwd_delay),
            mst_instances: diff_list(&self.mst_instances, &have.mst_instances),
        }
    }

    fn merge(&mut self, patch: &Self) {
        merge_leaf(&mut self.mst_name, &patch.mst_name);
        merge_leaf(&mut self.revision, &patch.revision);
        merge_leaf(&mut self.max_hop, &patch.max_hop);
        merge_leaf(&mut self.hello_time, &patch.hello_time);
        merge_leaf(&mut self.max_age, &patch.max_age);
        merge_leaf(&mut self.fwd_delay, &patch.fwd_delay);
        merge_list(&mut self.mst_instances, &patch.mst_instances);
    }

    fn remove(&mut self, target: &Self) {
        remove_leaf(&mut self.mst_name, &target.mst_name);
        remove_leaf(&mut self.revision, &target.revision);
        remove_leaf(&mut self.max_hop, &target.max_hop);
        remove_leaf(&mut self.hello_time, &target.hello_time);
        remove_leaf(&mut self.max_age, &target.max_age);
        remove_leaf(&mut self.fwd_delay, &target.fwd_delay);
        remove_list(&mut self.mst_instances, &target.mst_instances);
    }

    fn strip_defaults(&mut self) -> bool {
        self.mst_instances.remove(&CIST_MST_ID).is_some()
    }
}

impl ConfigNode for MstInstance {
    fn is_bare(&self) -> bool {
        self.bridge_priority.is_none() && self.vlans.is_empty() && self.interfaces.is_empty()
    }

    fn diff(&self, have: &Self) -> Self {
        Self {
            mst_id: self.mst_id,
            bridge_priority: diff_leaf(&self.bridge_priority, &have.bridge_priority),
            vlans: self.vlans.difference(&have.vlans),
            interfaces: diff_list(&self.interfaces, &have.interfaces),
        }
    }

    fn merge(&mut self, patch: &Self) {
        merge_leaf(&mut self.bridge_priority, &patch.bridge_priority);
        self.vlans = self.vlans.union(&patch.vlans);
        merge_list(&mut self.interfaces, &patch.interfaces);
    }

    fn remove(&mut self, target: &Self) {
        remove_leaf(&mut self.bridge_priority, &target.bridge_priority);
        self.vlans = self.vlans.difference(&target.vlans);
        remove_list(&mut self.interfaces, &target.interfaces);
    }

    fn strip_defaults(&mut self) -> bool {
        false
    }
}

impl ConfigNode for VlanConfig {
    fn is_bare(&self) -> bool {
        self.hello_time.is_none()
            && self.max_age.is_none()
            && self.fwd_delay.is_none()
            && self.bridge_priority.is_none()
            && self.interfaces.is_empty()
    }

    fn diff(&self, have: &Self) -> Self {
        Self {
            vlan_id: self.vlan_id,
            hello_time: diff_leaf(&self.hello_time, &have.hello_time),
            max_age: diff_leaf(&self.max_age, &have.max_age),
            fwd_delay: diff_leaf(&self.fwd_delay, &have.fwd_delay),
            bridge_priority: diff_leaf(&self.bridge_priority, &have.bridge_priority),
            interfaces: diff_list(&self.interfaces, &have.interfaces),
        }
    }

    fn merge(&mut self, patch: &Self) {
        merge_leaf(&mut self.hello_time, &patch.hello_time);
        merge_leaf(&mut self.max_age, &patch.max_age);
        merge_leaf(&mut self.fwd_delay, &patch.fwd_delay);
        merge_leaf(&mut self.bridge_priority, &patch.bridge_priority);
        merge_list(&mut self.interfaces, &patch.interfaces);
    }

    fn remove(&mut self, target: &Self) {
        remove_leaf(&mut self.hello_time, &target.hello_time);
        remove_leaf(&mut self.max_age, &target.max_age);
        remove_leaf(&mut self.fwd_delay, &target.fwd_delay);
        remove_leaf(&mut self.bridge_priority, &target.bridge_priority);
        remove_list(&mut self.interfaces, &target.interfaces);
    }

    fn strip_defaults(&mut self) -> bool {
        false
    }
}

impl ConfigNode for PortSetting {
    fn is_bare(&self) -> bool {
        self.cost.is_none() && self.port_priority.is_none()
    }

    fn diff(&self, have: &Self) -> Self {
        Self {
            intf_name: self.intf_name.clone(),
            cost: diff_leaf(&self.cost, &have.cost),
            port_priority: diff_leaf(&self.port_priority, &have.port_priority),
        }
    }

    fn merge(&mut self, patch: &Self) {
        merge_leaf(&mut self.cost, &patch.cost);
        merge_leaf(&mut self.port_priority, &patch.port_priority);
    }

    fn remove(&mut self, target: &Self) {
        remove_leaf(&mut self.cost, &target.cost);
        remove_leaf(&mut self.port_priority, &target.port_priority);
    }

    fn strip_defaults(&mut self) -> bool {
        false
    }
}
