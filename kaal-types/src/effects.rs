//! Effect levels, the hologram projector and the room sequence.

use std::collections::BTreeMap;

use crate::{DeviceId, DevicePanel, DeviceSet};

/// Intensity of each environmental effect, in percent.
pub type EffectLevels = BTreeMap<DeviceId, u8>;

/// Upper bound of an effect level.
pub const MAX_LEVEL: u8 = 100;

/// Starting intensity of every environmental effect.
pub fn initial_levels() -> EffectLevels {
    [("fog", 50), ("led", 75), ("hvac", 40), ("fan", 60)]
        .into_iter()
        .map(|(id, level)| (DeviceId::from(id), level))
        .collect()
}

/// The engineer-side hologram projector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HologramState {
    pub active: bool,
    /// How well the projection is locked, in percent.
    pub sync_percentage: u8,
}

impl HologramState {
    pub const INITIAL_SYNC: u8 = 97;

    pub fn initial() -> Self {
        Self {
            active: true,
            sync_percentage: Self::INITIAL_SYNC,
        }
    }

    pub fn label(&self) -> &'static str {
        if self.active {
            "PROJECTING"
        } else {
            "STANDBY"
        }
    }
}

impl Default for HologramState {
    fn default() -> Self {
        Self::initial()
    }
}

/// The commander's room: one system at a time, or everything at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomState {
    pub active_system: Option<DeviceId>,
    pub all_active: bool,
}

impl RoomState {
    /// True while anything in the room is running.
    pub fn is_engaged(&self) -> bool {
        self.all_active || self.active_system.is_some()
    }

    /// Systems currently running.
    pub fn lit(&self) -> DeviceSet {
        if self.all_active {
            DevicePanel::Room
                .devices()
                .iter()
                .map(|(id, _)| DeviceId::from(*id))
                .collect()
        } else {
            self.active_system.iter().cloned().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_cover_environment_panel() {
        let levels = initial_levels();
        for (id, _) in DevicePanel::Environment.devices() {
            assert!(levels.get(*id).is_some_and(|l| *l <= MAX_LEVEL));
        }
        assert_eq!(levels.get("led"), Some(&75));
    }

    #[test]
    fn room_lit_set_follows_mode() {
        let mut room = RoomState::default();
        assert!(!room.is_engaged());
        assert!(room.lit().is_empty());

        room.active_system = Some(DeviceId::from("terrain"));
        assert_eq!(room.lit().len(), 1);
        assert!(room.lit().contains("terrain"));

        room.active_system = None;
        room.all_active = true;
        assert_eq!(room.lit().len(), DevicePanel::Room.devices().len());
    }

    #[test]
    fn hologram_starts_projecting() {
        let h = HologramState::default();
        assert!(h.active);
        assert_eq!(h.sync_percentage, 97);
        assert_eq!(h.label(), "PROJECTING");
    }
}
