//! Simulation timing and randomness settings.

use std::time::Duration;

use kaal_types::Mode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from validating [`SimSettings`].
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("telemetry_update_probability must be within 0..=1, got {0}")]
    Probability(f64),
}

/// Tunables for every engine.
///
/// Missing fields deserialize to their defaults, so a config file only needs
/// to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Seed for the telemetry generator. `None` draws one from the OS.
    pub seed: Option<u64>,
    pub initial_mode: Mode,
    pub telemetry_interval_ms: u64,
    /// Chance that a subsystem is redrawn on a telemetry tick.
    pub telemetry_update_probability: f64,
    pub fault_recovery_delay_ms: u64,
    pub fault_restore_delay_ms: u64,
    pub mode_transition_ms: u64,
    pub diagnostics_interval_ms: u64,
    pub watchdog_restart_ms: u64,
    pub diagnostic_run_ms: u64,
    pub hologram_sync_interval_ms: u64,
    /// Idle time after which the room drops back to standby.
    pub room_reset_ms: u64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            seed: None,
            initial_mode: Mode::Engineer,
            telemetry_interval_ms: 5000,
            telemetry_update_probability: 0.15,
            fault_recovery_delay_ms: 3000,
            fault_restore_delay_ms: 5000,
            mode_transition_ms: 500,
            diagnostics_interval_ms: 2000,
            watchdog_restart_ms: 2000,
            diagnostic_run_ms: 3000,
            hologram_sync_interval_ms: 3000,
            room_reset_ms: 10_000,
        }
    }
}

impl SimSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let intervals = [
            ("telemetry_interval_ms", self.telemetry_interval_ms),
            ("fault_recovery_delay_ms", self.fault_recovery_delay_ms),
            ("fault_restore_delay_ms", self.fault_restore_delay_ms),
            ("mode_transition_ms", self.mode_transition_ms),
            ("diagnostics_interval_ms", self.diagnostics_interval_ms),
            ("watchdog_restart_ms", self.watchdog_restart_ms),
            ("diagnostic_run_ms", self.diagnostic_run_ms),
            ("hologram_sync_interval_ms", self.hologram_sync_interval_ms),
            ("room_reset_ms", self.room_reset_ms),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, ms)| *ms == 0) {
            return Err(SettingsError::ZeroInterval(name));
        }

        let p = self.telemetry_update_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(SettingsError::Probability(p));
        }
        Ok(())
    }

    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_millis(self.telemetry_interval_ms)
    }

    pub fn fault_recovery_delay(&self) -> Duration {
        Duration::from_millis(self.fault_recovery_delay_ms)
    }

    pub fn fault_restore_delay(&self) -> Duration {
        Duration::from_millis(self.fault_restore_delay_ms)
    }

    pub fn mode_transition(&self) -> Duration {
        Duration::from_millis(self.mode_transition_ms)
    }

    pub fn diagnostics_interval(&self) -> Duration {
        Duration::from_millis(self.diagnostics_interval_ms)
    }

    pub fn watchdog_restart(&self) -> Duration {
        Duration::from_millis(self.watchdog_restart_ms)
    }

    pub fn diagnostic_run(&self) -> Duration {
        Duration::from_millis(self.diagnostic_run_ms)
    }

    pub fn hologram_sync_interval(&self) -> Duration {
        Duration::from_millis(self.hologram_sync_interval_ms)
    }

    pub fn room_reset(&self) -> Duration {
        Duration::from_millis(self.room_reset_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimSettings::default().validate(), Ok(()));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let settings = SimSettings {
            mode_transition_ms: 0,
            ..SimSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::ZeroInterval("mode_transition_ms"))
        );
    }

    #[test]
    fn zero_room_reset_is_rejected() {
        let settings = SimSettings {
            room_reset_ms: 0,
            ..SimSettings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::ZeroInterval("room_reset_ms")));
    }

    #[test]
    fn probability_out_of_range_is_rejected() {
        let settings = SimSettings {
            telemetry_update_probability: 1.5,
            ..SimSettings::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::Probability(_))));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: SimSettings =
            serde_json::from_str(r#"{ "seed": 7, "initial_mode": "commander" }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.initial_mode, Mode::Commander);
        assert_eq!(settings.telemetry_interval(), Duration::from_secs(5));
    }
}
