//! Intensity sliders for the environmental effects.

use kaal_types::{initial_levels, DeviceId, EffectLevels, MAX_LEVEL};
use tracing::debug;

use crate::devices::DeviceToggleRegistry;
use crate::outcome::{Outcome, Rejection};

#[derive(Debug, Clone, PartialEq)]
pub struct EffectMixer {
    levels: EffectLevels,
}

impl EffectMixer {
    pub fn new() -> Self {
        Self {
            levels: initial_levels(),
        }
    }

    pub fn levels(&self) -> &EffectLevels {
        &self.levels
    }

    pub fn level(&self, id: &str) -> Option<u8> {
        self.levels.get(id).copied()
    }

    /// Set the intensity of `id`, clamped to `0..=100`. The effect must be
    /// switched on in `switches`.
    pub fn set_level(&mut self, id: DeviceId, level: u8, switches: &DeviceToggleRegistry) -> Outcome {
        let Some(slot) = self.levels.get_mut(&id) else {
            return Rejection::NoLevelControl(id).into();
        };
        if !switches.is_active(id.as_str()) {
            return Rejection::DeviceInactive(id).into();
        }
        *slot = level.min(MAX_LEVEL);
        debug!(device = %id, level = *slot, "effect level set");
        Outcome::Applied
    }
}

impl Default for EffectMixer {
    fn default() -> Self {
        Self::new()
    }
}
