//! Process-wide keyed state flags
//!
//! The bootstrap importer enables [`FULL_RELOAD_RUNNING`] for a component
//! while it rebuilds that component's stores from the system of record,
//! and disables it on completion or abort. Forwarders only read the flag:
//! while it is enabled the stores may be partially rebuilt and nothing is
//! served from them.

use dashmap::DashMap;

/// State flag: a full reload from the system of record is in progress.
pub const FULL_RELOAD_RUNNING: &str = "FULL_RELOAD_RUNNING";

/// Component id for the path hierarchy channel.
pub const PATHS_COMPONENT: &str = "paths";

/// Component id for the permission grant channel.
pub const PERMISSIONS_COMPONENT: &str = "permissions";

/// Registry of boolean state flags keyed by (component, state).
///
/// DashMap gives lock-free concurrent access with the visibility
/// guarantee readers need: a flag enabled before a read starts is
/// observed by that read, and a flag disabled before a read starts is
/// never observed.
#[derive(Debug, Default)]
pub struct StateBank {
    enabled: DashMap<(String, String), ()>,
}

impl StateBank {
    pub fn new() -> Self {
        Self {
            enabled: DashMap::new(),
        }
    }

    /// Enable a state flag for a component. Idempotent.
    pub fn enable(&self, component: &str, state: &str) {
        self.enabled
            .insert((component.to_string(), state.to_string()), ());
    }

    /// Disable a state flag for a component. Idempotent.
    pub fn disable(&self, component: &str, state: &str) {
        self.enabled
            .remove(&(component.to_string(), state.to_string()));
    }

    /// Check whether a state flag is enabled for a component.
    pub fn is_enabled(&self, component: &str, state: &str) -> bool {
        self.enabled
            .contains_key(&(component.to_string(), state.to_string()))
    }

    /// Disable every state flag for one component.
    pub fn clear_component(&self, component: &str) {
        self.enabled.retain(|(c, _), _| c.as_str() != component);
    }

    /// Disable all state flags for all components.
    pub fn clear_all(&self) {
        self.enabled.clear();
    }
}
