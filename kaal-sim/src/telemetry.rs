//! Status-strip telemetry generator.
//!
//! Each tick picks a random subset of subsystems, redraws their status and
//! recomputes the displayed value from it. Subsystems that are not picked
//! keep their reading untouched, so the strip flickers rather than drifts.

use std::time::Duration;

use kaal_types::{MetricReading, MetricValue, StatusTable, SubsystemStatus};
use rand::Rng;
use tracing::debug;

use crate::event::{SimScheduler, TimerEvent};
use crate::scheduler::TimerId;

/// Statuses a redrawn subsystem can land on.
const REDRAW_STATUSES: [SubsystemStatus; 2] = [SubsystemStatus::Online, SubsystemStatus::Standby];

/// How a subsystem's value follows a redrawn status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRule {
    /// Status changes, value stays.
    Keep,
    /// Uniform integer in `low..high` while online, else the fixed word.
    WhenOnline {
        low: u32,
        high: u32,
        unit: &'static str,
        otherwise: &'static str,
    },
    /// Uniform integer in `low..high` regardless of status.
    Always {
        low: u32,
        high: u32,
        unit: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum InitialValue {
    None,
    Numeric(f64, &'static str),
    Text(&'static str),
}

/// A monitored subsystem and its redraw rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Subsystem {
    pub name: &'static str,
    pub rule: ValueRule,
    status: SubsystemStatus,
    value: InitialValue,
}

impl Subsystem {
    fn new(name: &'static str, status: SubsystemStatus, value: InitialValue, rule: ValueRule) -> Self {
        Self {
            name,
            rule,
            status,
            value,
        }
    }

    /// The reading this subsystem starts with after (re)initialization.
    pub fn initial_reading(&self) -> MetricReading {
        match self.value {
            InitialValue::None => MetricReading::bare(self.name, self.status),
            InitialValue::Numeric(v, unit) => MetricReading::numeric(self.name, self.status, v, unit),
            InitialValue::Text(t) => MetricReading::text(self.name, self.status, t),
        }
    }

    fn redraw<R: Rng + ?Sized>(&self, reading: &mut MetricReading, status: SubsystemStatus, rng: &mut R) {
        reading.status = status;
        match self.rule {
            ValueRule::Keep => {}
            ValueRule::WhenOnline {
                low,
                high,
                unit,
                otherwise,
            } => {
                if status == SubsystemStatus::Online {
                    reading.value = Some(MetricValue::Numeric(rng.gen_range(low..high) as f64));
                    reading.unit = Some(unit.to_string());
                } else {
                    reading.value = Some(MetricValue::text(otherwise));
                    reading.unit = None;
                }
            }
            ValueRule::Always { low, high, unit } => {
                reading.value = Some(MetricValue::Numeric(rng.gen_range(low..high) as f64));
                reading.unit = Some(unit.to_string());
            }
        }
    }
}

/// The subsystems of the header status strip, in display order.
pub fn standard_subsystems() -> Vec<Subsystem> {
    use SubsystemStatus::{Online, Standby};

    vec![
        Subsystem::new("Fog System", Standby, InitialValue::None, ValueRule::Keep),
        Subsystem::new(
            "LED Array",
            Online,
            InitialValue::Numeric(60.0, "%"),
            ValueRule::WhenOnline {
                low: 0,
                high: 100,
                unit: "%",
                otherwise: "STANDBY",
            },
        ),
        Subsystem::new(
            "Ventilation",
            Online,
            InitialValue::Numeric(800.0, "RPM"),
            ValueRule::WhenOnline {
                low: 600,
                high: 1200,
                unit: "RPM",
                otherwise: "IDLE",
            },
        ),
        Subsystem::new("Hologram", Standby, InitialValue::None, ValueRule::Keep),
        Subsystem::new("Audio", Online, InitialValue::Text("ON"), ValueRule::Keep),
        Subsystem::new(
            "Network",
            Online,
            InitialValue::Numeric(45.0, "ms"),
            ValueRule::Always {
                low: 30,
                high: 80,
                unit: "ms",
            },
        ),
        Subsystem::new("Power", Online, InitialValue::Text("UPS READY"), ValueRule::Keep),
    ]
}

/// Periodically redraws a [`StatusTable`].
#[derive(Debug)]
pub struct TelemetrySimulator {
    subsystems: Vec<Subsystem>,
    table: StatusTable,
    probability: f64,
    interval: Duration,
    timer: Option<TimerId>,
}

impl TelemetrySimulator {
    pub fn new(subsystems: Vec<Subsystem>, probability: f64, interval: Duration) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        let table = subsystems.iter().map(Subsystem::initial_reading).collect();
        Self {
            subsystems,
            table,
            probability,
            interval,
            timer: None,
        }
    }

    /// The header strip with its standard subsystems.
    pub fn standard(probability: f64, interval: Duration) -> Self {
        Self::new(standard_subsystems(), probability, interval)
    }

    pub fn readings(&self) -> &StatusTable {
        &self.table
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Arm the repeating tick timer. Starting twice keeps the first timer.
    pub fn start(&mut self, scheduler: &mut SimScheduler) {
        if self.timer.is_none() {
            self.timer = Some(scheduler.schedule_every(self.interval, TimerEvent::TelemetryTick));
        }
    }

    /// Cancel the tick timer. Returns whether one was pending.
    pub fn stop(&mut self, scheduler: &mut SimScheduler) -> bool {
        self.timer.take().is_some_and(|id| scheduler.cancel(id))
    }

    /// Run one telemetry tick, returning how many subsystems were redrawn.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut redrawn = 0;
        for subsystem in &self.subsystems {
            if !rng.gen_bool(self.probability) {
                continue;
            }
            let status = REDRAW_STATUSES[rng.gen_range(0..REDRAW_STATUSES.len())];
            if let Some(reading) = self.table.get_mut(subsystem.name) {
                subsystem.redraw(reading, status, rng);
                redrawn += 1;
            }
        }
        debug!(redrawn, "telemetry tick");
        redrawn
    }

    /// Restore every reading to its initial value.
    pub fn reset(&mut self) {
        self.table = self.subsystems.iter().map(Subsystem::initial_reading).collect();
    }
}
