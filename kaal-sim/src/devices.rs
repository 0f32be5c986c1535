//! Per-panel device activation state.

use kaal_types::{DeviceId, DevicePanel, DeviceSet};
use tracing::debug;

/// The active devices of one panel. Ids are not validated.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceToggleRegistry {
    panel: DevicePanel,
    initial: DeviceSet,
    active: DeviceSet,
}

impl DeviceToggleRegistry {
    /// A registry starting from the panel's default set.
    pub fn new(panel: DevicePanel) -> Self {
        Self::with_initial(panel, panel.initial_set())
    }

    pub fn with_initial(panel: DevicePanel, initial: DeviceSet) -> Self {
        Self {
            panel,
            active: initial.clone(),
            initial,
        }
    }

    pub fn panel(&self) -> DevicePanel {
        self.panel
    }

    /// Flip membership of `id`, returning whether it is now active.
    pub fn toggle(&mut self, id: impl Into<DeviceId>) -> bool {
        let id = id.into();
        let now_active = if self.active.remove(&id) {
            false
        } else {
            self.active.insert(id.clone());
            true
        };
        debug!(panel = ?self.panel, device = %id, active = now_active, "device toggled");
        now_active
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains(id)
    }

    pub fn active(&self) -> &DeviceSet {
        &self.active
    }

    pub fn reset(&mut self) {
        self.active = self.initial.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_from_panel_defaults() {
        assert!(DeviceToggleRegistry::new(DevicePanel::Environment).is_active("led"));
        assert!(DeviceToggleRegistry::new(DevicePanel::LiveMap).is_active("led"));
        assert!(DeviceToggleRegistry::new(DevicePanel::Relays).active().is_empty());
        assert!(DeviceToggleRegistry::new(DevicePanel::Room).active().is_empty());
    }

    #[test]
    fn toggle_twice_is_identity() {
        let mut registry = DeviceToggleRegistry::new(DevicePanel::Environment);
        let before = registry.active().clone();

        for id in ["fog", "led", "no-such-device"] {
            let first = registry.toggle(id);
            let second = registry.toggle(id);
            assert_ne!(first, second);
        }
        assert_eq!(registry.active(), &before);
    }

    #[test]
    fn toggle_reports_new_membership() {
        let mut registry = DeviceToggleRegistry::new(DevicePanel::Relays);
        assert!(registry.toggle("relay2"));
        assert!(registry.is_active("relay2"));
        assert!(!registry.toggle("relay2"));
        assert!(!registry.is_active("relay2"));
    }

    #[test]
    fn is_active_matches_exact_ids() {
        let mut registry = DeviceToggleRegistry::new(DevicePanel::Environment);
        registry.toggle("fan");
        assert!(registry.is_active("fan"));
        assert!(!registry.is_active("fa"));
        assert!(!registry.is_active("fans"));
    }

    #[test]
    fn reset_restores_initial_set() {
        let mut registry = DeviceToggleRegistry::new(DevicePanel::LiveMap);
        registry.toggle("led");
        registry.toggle("hologram");
        registry.reset();
        assert_eq!(registry.active(), &DevicePanel::LiveMap.initial_set());
    }
}
