//! Snapshot - a point-in-time view of the whole dashboard.

use crate::{
    DevicePanel, DeviceSet, DiagnosticsReading, EffectLevels, FaultState, HologramState, Millis,
    Mode, RoomState, SafetyConsoleState, SchemaVersion, StatusTable,
};

/// Everything a renderer needs to draw one frame.
///
/// Snapshots are taken between timer callbacks, so they never show a
/// half-applied update (for example a committed mode whose view is not yet
/// mounted).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashboardSnapshot {
    pub version: SchemaVersion,
    /// Model time since the dashboard started.
    pub at: Millis,
    pub mode: Mode,
    /// True while a mode change is fading between view trees.
    pub transitioning: bool,
    pub status_bar: StatusTable,
    pub live_map: DeviceSet,
    pub view: ViewSnapshot,
}

impl DashboardSnapshot {
    /// Active devices of `panel`, if that panel is currently mounted.
    pub fn devices(&self, panel: DevicePanel) -> Option<DeviceSet> {
        match (panel, &self.view) {
            (DevicePanel::LiveMap, _) => Some(self.live_map.clone()),
            (DevicePanel::Environment, ViewSnapshot::Engineer(v)) => Some(v.environment.clone()),
            (DevicePanel::Relays, ViewSnapshot::Engineer(v)) => Some(v.relays.clone()),
            (DevicePanel::Room, ViewSnapshot::Commander(v)) => Some(v.room.lit()),
            _ => None,
        }
    }

    pub fn engineer(&self) -> Option<&EngineerSnapshot> {
        match &self.view {
            ViewSnapshot::Engineer(v) => Some(v),
            ViewSnapshot::Commander(_) => None,
        }
    }

    pub fn commander(&self) -> Option<&CommanderSnapshot> {
        match &self.view {
            ViewSnapshot::Commander(v) => Some(v),
            ViewSnapshot::Engineer(_) => None,
        }
    }
}

/// State of the mounted view tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "view", rename_all = "lowercase"))]
pub enum ViewSnapshot {
    Engineer(EngineerSnapshot),
    Commander(CommanderSnapshot),
}

impl ViewSnapshot {
    pub fn mode(&self) -> Mode {
        match self {
            ViewSnapshot::Engineer(_) => Mode::Engineer,
            ViewSnapshot::Commander(_) => Mode::Commander,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineerSnapshot {
    pub fault: FaultState,
    pub diagnostics: DiagnosticsReading,
    pub environment: DeviceSet,
    /// Effect intensities; only adjustable while the effect is on.
    pub levels: EffectLevels,
    pub relays: DeviceSet,
    pub hologram: HologramState,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommanderSnapshot {
    pub console: SafetyConsoleState,
    pub room: RoomState,
}
