//! Device identifiers and activation sets.

use core::borrow::Borrow;
use core::fmt;
use std::collections::BTreeSet;

/// Identifier of a togglable device.
///
/// Any string is accepted. Panels only render the ids they know about, so an
/// unknown id can be toggled but is never displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// Derived `Ord` compares the inner string, so set lookups by `&str` agree
// with lookups by `DeviceId`.
impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of currently active devices. Membership only; iteration order is
/// an implementation detail.
pub type DeviceSet = BTreeSet<DeviceId>;

/// A group of devices that one view toggles independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DevicePanel {
    /// Engineer view: environmental effects engine.
    Environment,
    /// Engineer view: hardware relay control matrix.
    Relays,
    /// Shell overlay, mounted in both modes.
    LiveMap,
    /// Commander view: the room that "awakens" around the operator.
    Room,
}

impl DevicePanel {
    pub fn title(&self) -> &'static str {
        match self {
            DevicePanel::Environment => "Environmental Effects",
            DevicePanel::Relays => "Relay Control Matrix",
            DevicePanel::LiveMap => "Live Map",
            DevicePanel::Room => "Room Systems",
        }
    }

    /// The devices this panel renders, as `(id, label)` pairs.
    pub fn devices(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            DevicePanel::Environment => &[
                ("fog", "Fog Machine"),
                ("led", "LED Panels"),
                ("hvac", "HVAC Unit"),
                ("fan", "Fan Arrays"),
            ],
            DevicePanel::Relays => &[
                ("relay1", "Relay 1 - Fog Machine Main"),
                ("relay2", "Relay 2 - LED Panels"),
                ("relay3", "Relay 3 - Fan Arrays"),
                ("relay4", "Relay 4 - HVAC Unit"),
            ],
            DevicePanel::LiveMap => &[
                ("hologram", "Hologram"),
                ("led", "LED Wall"),
                ("fog", "Fog"),
                ("fan", "Fans"),
            ],
            DevicePanel::Room => &[
                ("fog", "Atmospheric Fog"),
                ("terrain", "Terrain Table"),
                ("hologram", "Hologram Briefing"),
            ],
        }
    }

    /// Devices that start active when the panel is mounted.
    pub fn initially_active(&self) -> &'static [&'static str] {
        match self {
            DevicePanel::Environment | DevicePanel::LiveMap => &["led"],
            DevicePanel::Relays | DevicePanel::Room => &[],
        }
    }

    pub fn initial_set(&self) -> DeviceSet {
        self.initially_active().iter().copied().map(DeviceId::from).collect()
    }
}
