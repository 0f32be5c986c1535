//! Fault-detection types.

use core::fmt;
use core::str::FromStr;

use crate::SubsystemStatus;

/// A synthetic fault that can be injected into the fault-detection panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FaultKind {
    Temperature,
    Current,
    Voltage,
}

impl FaultKind {
    pub const ALL: [FaultKind; 3] = [FaultKind::Temperature, FaultKind::Current, FaultKind::Voltage];

    pub fn id(&self) -> &'static str {
        match self {
            FaultKind::Temperature => "temperature",
            FaultKind::Current => "current",
            FaultKind::Voltage => "voltage",
        }
    }

    /// Headline shown while the fault is detected.
    pub fn label(&self) -> &'static str {
        match self {
            FaultKind::Temperature => "Overheating",
            FaultKind::Current => "Overcurrent",
            FaultKind::Voltage => "Undervoltage",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown fault name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFaultKind(pub String);

impl fmt::Display for UnknownFaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown fault kind '{}' (expected temperature, current or voltage)",
            self.0
        )
    }
}

impl std::error::Error for UnknownFaultKind {}

impl FromStr for FaultKind {
    type Err = UnknownFaultKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temperature" | "temp" => Ok(FaultKind::Temperature),
            "current" => Ok(FaultKind::Current),
            "voltage" => Ok(FaultKind::Voltage),
            _ => Err(UnknownFaultKind(s.to_string())),
        }
    }
}

/// Stage of the fault-injection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaultPhase {
    #[default]
    Normal,
    Faulted,
    Recovering,
}

/// Metrics shown by the fault-detection panel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultMetrics {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Amperes.
    pub current_draw: f64,
    /// Volts.
    pub voltage: f64,
    /// RPM.
    pub fan_speed: u32,
    pub safety_status: SubsystemStatus,
}

impl FaultMetrics {
    pub const TEMPERATURE_THRESHOLD: f64 = 75.0;
    pub const CURRENT_THRESHOLD: f64 = 15.0;
    pub const VOLTAGE_THRESHOLD: f64 = 9.0;
    pub const FAN_SPEED_THRESHOLD: u32 = 600;

    /// The nominal reading set every reset returns to.
    pub fn baseline() -> Self {
        Self {
            temperature: 32.4,
            current_draw: 7.2,
            voltage: 11.8,
            fan_speed: 1800,
            safety_status: SubsystemStatus::Normal,
        }
    }

    /// These metrics with the out-of-band values of `kind` applied.
    pub fn with_fault(mut self, kind: FaultKind) -> Self {
        match kind {
            FaultKind::Temperature => {
                self.temperature = 78.6;
                self.fan_speed = 3600;
            }
            FaultKind::Current => {
                self.current_draw = 15.8;
                self.voltage = 10.2;
            }
            FaultKind::Voltage => {
                self.voltage = 8.4;
            }
        }
        self.safety_status = SubsystemStatus::Warning;
        self
    }
}

impl Default for FaultMetrics {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Observable state of the fault-injection engine.
///
/// `active_fault` is `Some` exactly when `phase` is not [`FaultPhase::Normal`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultState {
    pub active_fault: Option<FaultKind>,
    pub phase: FaultPhase,
    pub metrics: FaultMetrics,
}

impl FaultState {
    pub fn normal() -> Self {
        Self::default()
    }

    /// The primary auto-shutdown protocol runs for the whole fault lifecycle.
    pub fn primary_protocol_active(&self) -> bool {
        self.phase != FaultPhase::Normal
    }

    pub fn recovery_active(&self) -> bool {
        self.phase == FaultPhase::Recovering
    }

    /// Whether `kind` is the currently faulted system.
    pub fn is_faulted(&self, kind: FaultKind) -> bool {
        self.active_fault == Some(kind)
    }

    pub fn headline(&self) -> String {
        match (self.phase, self.active_fault) {
            (FaultPhase::Recovering, _) => "Recovery Mode Active".to_string(),
            (FaultPhase::Faulted, Some(kind)) => format!("Fault Detected - {}", kind.label()),
            _ => "All Systems Normal".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_fault_raises_fan_speed() {
        let m = FaultMetrics::baseline().with_fault(FaultKind::Temperature);
        assert_eq!(m.temperature, 78.6);
        assert_eq!(m.fan_speed, 3600);
        assert_eq!(m.current_draw, 7.2);
        assert_eq!(m.safety_status, SubsystemStatus::Warning);
    }

    #[test]
    fn current_fault_also_sags_voltage() {
        let m = FaultMetrics::baseline().with_fault(FaultKind::Current);
        assert_eq!(m.current_draw, 15.8);
        assert_eq!(m.voltage, 10.2);
    }

    #[test]
    fn every_fault_crosses_its_threshold() {
        let t = FaultMetrics::baseline().with_fault(FaultKind::Temperature);
        let c = FaultMetrics::baseline().with_fault(FaultKind::Current);
        let v = FaultMetrics::baseline().with_fault(FaultKind::Voltage);
        assert!(t.temperature > FaultMetrics::TEMPERATURE_THRESHOLD);
        assert!(c.current_draw > FaultMetrics::CURRENT_THRESHOLD);
        assert!(v.voltage < FaultMetrics::VOLTAGE_THRESHOLD);
    }

    #[test]
    fn parses_fault_names() {
        assert_eq!("Temperature".parse::<FaultKind>(), Ok(FaultKind::Temperature));
        assert_eq!(" voltage ".parse::<FaultKind>(), Ok(FaultKind::Voltage));
        assert!("smoke".parse::<FaultKind>().is_err());
    }

    #[test]
    fn headline_follows_phase() {
        let mut state = FaultState::normal();
        assert_eq!(state.headline(), "All Systems Normal");

        state.phase = FaultPhase::Faulted;
        state.active_fault = Some(FaultKind::Current);
        assert_eq!(state.headline(), "Fault Detected - Overcurrent");

        state.phase = FaultPhase::Recovering;
        assert_eq!(state.headline(), "Recovery Mode Active");
        assert!(state.primary_protocol_active());
    }
}
