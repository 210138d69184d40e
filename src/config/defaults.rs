//! Implicit device defaults.
//!
//! One table drives both default suppression during normalization and the
//! mandatory leaves the request mapper must always send.

use super::model::GlobalConfig;

/// How the device treats one leaf when it is left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafDefault<T: Copy + PartialEq + 'static> {
    /// Value the device assumes when the leaf is not configured.
    pub value: T,
    /// The leaf must be present in every update payload of its container.
    pub mandatory: bool,
    /// The leaf cannot be deleted and is reset by patching `value` instead.
    pub reset_by_patch: bool,
}

impl<T: Copy + PartialEq + 'static> LeafDefault<T> {
    const fn optional(value: T) -> Self {
        Self {
            value,
            mandatory: false,
            reset_by_patch: false,
        }
    }

    /// Returns true if `slot` holds exactly the default value.
    #[must_use]
    pub fn is_default(&self, slot: Option<T>) -> bool {
        slot == Some(self.value)
    }

    /// Clears `slot` if it holds the default value; returns true if cleared.
    pub fn strip(&self, slot: &mut Option<T>) -> bool {
        if self.is_default(*slot) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Value to place in an update payload.
    ///
    /// Mandatory leaves not set by the command carry the default.
    #[must_use]
    pub fn payload(&self, command: Option<T>) -> Option<T> {
        if self.mandatory {
            Some(command.unwrap_or(self.value))
        } else {
            command
        }
    }
}

/// Global loop guard.
pub const GLOBAL_LOOP_GUARD: LeafDefault<bool> = LeafDefault::optional(false);

/// Global BPDU filter.
pub const GLOBAL_BPDU_FILTER: LeafDefault<bool> = LeafDefault {
    value: false,
    mandatory: true,
    reset_by_patch: false,
};

/// Global portfast.
pub const GLOBAL_PORTFAST: LeafDefault<bool> = LeafDefault::optional(false);

/// Global bridge priority.
pub const GLOBAL_BRIDGE_PRIORITY: LeafDefault<u32> = LeafDefault::optional(0);

/// Interface edge port.
pub const INTF_EDGE_PORT: LeafDefault<bool> = LeafDefault::optional(false);

/// Interface BPDU guard.
pub const INTF_BPDU_GUARD: LeafDefault<bool> = LeafDefault {
    value: false,
    mandatory: true,
    reset_by_patch: true,
};

/// Interface BPDU filter.
pub const INTF_BPDU_FILTER: LeafDefault<bool> = LeafDefault {
    value: false,
    mandatory: true,
    reset_by_patch: false,
};

/// Interface portfast.
pub const INTF_PORTFAST: LeafDefault<bool> = LeafDefault::optional(false);

/// Interface uplink fast.
pub const INTF_UPLINK_FAST: LeafDefault<bool> = LeafDefault {
    value: false,
    mandatory: true,
    reset_by_patch: true,
};

/// Interface shutdown on BPDU guard violation.
pub const INTF_SHUTDOWN: LeafDefault<bool> = LeafDefault {
    value: false,
    mandatory: false,
    reset_by_patch: true,
};

/// Interface spanning-tree enable.
pub const INTF_STP_ENABLE: LeafDefault<bool> = LeafDefault {
    value: true,
    mandatory: true,
    reset_by_patch: true,
};

/// The common spanning tree instance; it always exists and is never managed.
pub const CIST_MST_ID: u16 = 0;

/// Global settings the device falls back to after the protocol is removed.
#[must_use]
pub fn global_reset_state() -> GlobalConfig {
    GlobalConfig {
        bpdu_filter: Some(GLOBAL_BPDU_FILTER.value),
        bridge_priority: Some(GLOBAL_BRIDGE_PRIORITY.value),
        loop_guard: Some(GLOBAL_LOOP_GUARD.value),
        portfast: Some(GLOBAL_PORTFAST.value),
        ..GlobalConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_only_default() {
        let mut slot = Some(false);
        assert!(INTF_EDGE_PORT.strip(&mut slot));
        assert_eq!(slot, None);

        let mut slot = Some(true);
        assert!(!INTF_EDGE_PORT.strip(&mut slot));
        assert_eq!(slot, Some(true));

        let mut slot = Some(true);
        assert!(INTF_STP_ENABLE.strip(&mut slot));
    }

    #[test]
    fn test_mandatory_payload_defaults() {
        assert_eq!(INTF_BPDU_FILTER.payload(None), Some(false));
        assert_eq!(INTF_BPDU_FILTER.payload(Some(true)), Some(true));
        assert_eq!(INTF_STP_ENABLE.payload(None), Some(true));
        assert_eq!(INTF_STP_ENABLE.payload(Some(false)), Some(false));
        assert_eq!(INTF_PORTFAST.payload(None), None);
    }

    #[test]
    fn test_global_reset_state() {
        let global = global_reset_state();
        assert_eq!(global.loop_guard, Some(false));
        assert_eq!(global.bridge_priority, Some(0));
        assert!(global.enabled_protocol.is_none());
    }
}
