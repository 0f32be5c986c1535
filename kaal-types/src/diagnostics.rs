//! Safety and diagnostics readings.

/// Health grade of a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthStatus {
    #[default]
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "OK",
            HealthStatus::Warning => "WARN",
            HealthStatus::Critical => "CRIT",
        }
    }

    /// Grade `value` against warning and critical limits (both exclusive).
    pub fn above(value: f64, warning: f64, critical: f64) -> Self {
        if value > critical {
            HealthStatus::Critical
        } else if value > warning {
            HealthStatus::Warning
        } else {
            HealthStatus::Healthy
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WatchdogStatus {
    #[default]
    Active,
    Restarting,
}

/// System monitor gauges of the safety and diagnostics panel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticsReading {
    /// Percent of rated supply.
    pub power: f64,
    /// Amperes.
    pub current_draw: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Milliseconds from trigger to relay actuation.
    pub relay_response: f64,
    pub watchdog: WatchdogStatus,
}

impl DiagnosticsReading {
    pub fn initial() -> Self {
        Self {
            power: 65.0,
            current_draw: 3.2,
            temperature: 42.0,
            relay_response: 28.0,
            watchdog: WatchdogStatus::Active,
        }
    }

    pub fn temperature_health(&self) -> HealthStatus {
        HealthStatus::above(self.temperature, 44.0, 48.0)
    }

    pub fn relay_health(&self) -> HealthStatus {
        HealthStatus::above(self.relay_response, 35.0, 40.0)
    }

    /// Worst grade across all gauges.
    pub fn overall_health(&self) -> HealthStatus {
        self.temperature_health().max(self.relay_health())
    }
}

impl Default for DiagnosticsReading {
    fn default() -> Self {
        Self::initial()
    }
}

/// Commander-side system control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SafetyConsoleState {
    pub diagnostic_running: bool,
    /// Latched by the kill switch; cleared only by a manual reset.
    pub safety_triggered: bool,
}

impl SafetyConsoleState {
    pub fn safety_label(&self) -> &'static str {
        if self.safety_triggered {
            "TRIGGERED"
        } else {
            "READY"
        }
    }

    pub fn diagnostic_label(&self) -> &'static str {
        if self.diagnostic_running {
            "CHECKING"
        } else {
            "OPERATIONAL"
        }
    }
}
