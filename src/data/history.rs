//! Diagnostics history for sparklines.

use std::collections::VecDeque;

use kaal_sim::GaugeBand;
use kaal_types::DiagnosticsReading;

/// Maximum number of samples to keep per gauge.
const MAX_HISTORY_SIZE: usize = 60;

/// One of the system-monitor gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gauge {
    Power,
    Current,
    Temperature,
    RelayResponse,
}

impl Gauge {
    pub const ALL: [Gauge; 4] = [Gauge::Power, Gauge::Current, Gauge::Temperature, Gauge::RelayResponse];

    pub fn label(&self) -> &'static str {
        match self {
            Gauge::Power => "Power",
            Gauge::Current => "Current",
            Gauge::Temperature => "Temp",
            Gauge::RelayResponse => "Relay",
        }
    }

    pub fn band(&self) -> GaugeBand {
        match self {
            Gauge::Power => GaugeBand::POWER,
            Gauge::Current => GaugeBand::CURRENT,
            Gauge::Temperature => GaugeBand::TEMPERATURE,
            Gauge::RelayResponse => GaugeBand::RELAY_RESPONSE,
        }
    }

    pub fn value(&self, reading: &DiagnosticsReading) -> f64 {
        match self {
            Gauge::Power => reading.power,
            Gauge::Current => reading.current_draw,
            Gauge::Temperature => reading.temperature,
            Gauge::RelayResponse => reading.relay_response,
        }
    }

    /// The reading formatted with its unit.
    pub fn format(&self, reading: &DiagnosticsReading) -> String {
        let v = self.value(reading);
        match self {
            Gauge::Power => format!("{v:.1}%"),
            Gauge::Current => format!("{v:.2}A"),
            Gauge::Temperature => format!("{v:.1}°C"),
            Gauge::RelayResponse => format!("{v:.0}ms"),
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Recent diagnostics readings, one ring per gauge.
#[derive(Debug, Clone, Default)]
pub struct History {
    samples: [VecDeque<f64>; 4],
    last: Option<[f64; 4]>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading unless its gauge values repeat the previous one.
    ///
    /// Snapshots are published on every command as well as on every
    /// diagnostics tick, so identical gauges are the same sample. The
    /// watchdog is not sampled and does not count as a change.
    pub fn record(&mut self, reading: &DiagnosticsReading) -> bool {
        let values = Gauge::ALL.map(|gauge| gauge.value(reading));
        if self.last == Some(values) {
            return false;
        }
        for (gauge, value) in Gauge::ALL.into_iter().zip(values) {
            let ring = &mut self.samples[gauge.index()];
            ring.push_back(value);
            if ring.len() > MAX_HISTORY_SIZE {
                ring.pop_front();
            }
        }
        self.last = Some(values);
        true
    }

    pub fn len(&self) -> usize {
        self.samples[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Sparkline levels (0-7) for `gauge`, scaled to the gauge's band.
    pub fn sparkline(&self, gauge: Gauge) -> Vec<u8> {
        let band = gauge.band();
        let range = (band.high - band.low).max(f64::EPSILON);
        self.samples[gauge.index()]
            .iter()
            .map(|&v| {
                let normalized = ((v - band.low) / range * 7.0).round();
                normalized.clamp(0.0, 7.0) as u8
            })
            .collect()
    }
}
