//! Status-strip telemetry types.

use core::fmt;

use indexmap::IndexMap;

/// Operational status of a monitored subsystem.
///
/// `Online`/`Standby`/`Offline` describe devices in the status strip;
/// `Normal`/`Warning` describe the fault-detection safety status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SubsystemStatus {
    Online,
    Standby,
    Offline,
    Normal,
    Warning,
}

impl SubsystemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SubsystemStatus::Online => "online",
            SubsystemStatus::Standby => "standby",
            SubsystemStatus::Offline => "offline",
            SubsystemStatus::Normal => "normal",
            SubsystemStatus::Warning => "warning",
        }
    }
}

impl fmt::Display for SubsystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A displayed reading value: either a number (paired with a unit) or a
/// fixed word such as `IDLE` or `UPS READY`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum MetricValue {
    Numeric(f64),
    Text(String),
}

impl MetricValue {
    pub fn text(s: impl Into<String>) -> Self {
        MetricValue::Text(s.into())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Numeric(v) => Some(*v),
            MetricValue::Text(_) => None,
        }
    }
}

/// One row of the status strip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricReading {
    pub name: String,
    pub value: Option<MetricValue>,
    /// Only meaningful for numeric values.
    pub unit: Option<String>,
    pub status: SubsystemStatus,
}

impl MetricReading {
    /// A reading with no value; it displays its status.
    pub fn bare(name: impl Into<String>, status: SubsystemStatus) -> Self {
        Self {
            name: name.into(),
            value: None,
            unit: None,
            status,
        }
    }

    pub fn numeric(
        name: impl Into<String>,
        status: SubsystemStatus,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: Some(MetricValue::Numeric(value)),
            unit: Some(unit.into()),
            status,
        }
    }

    pub fn text(name: impl Into<String>, status: SubsystemStatus, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(MetricValue::text(value)),
            unit: None,
            status,
        }
    }

    /// Text shown in the status strip: the value with its unit, or the
    /// upper-cased status when there is no value.
    pub fn display_value(&self) -> String {
        match (&self.value, &self.unit) {
            (Some(MetricValue::Numeric(v)), Some(unit)) if unit == "%" || unit == "ms" => {
                format!("{v:.0}{unit}")
            }
            (Some(MetricValue::Numeric(v)), Some(unit)) => format!("{v:.0} {unit}"),
            (Some(MetricValue::Numeric(v)), None) => format!("{v:.0}"),
            (Some(MetricValue::Text(t)), _) => t.clone(),
            (None, _) => self.status.label().to_uppercase(),
        }
    }
}

/// Insertion-ordered table of readings keyed by subsystem name.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusTable {
    readings: IndexMap<String, MetricReading>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a reading. A replaced reading keeps its position.
    pub fn insert(&mut self, reading: MetricReading) {
        self.readings.insert(reading.name.clone(), reading);
    }

    pub fn get(&self, name: &str) -> Option<&MetricReading> {
        self.readings.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MetricReading> {
        self.readings.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricReading> {
        self.readings.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MetricReading> {
        self.readings.values_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.readings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl FromIterator<MetricReading> for StatusTable {
    fn from_iter<I: IntoIterator<Item = MetricReading>>(iter: I) -> Self {
        let mut table = StatusTable::new();
        for reading in iter {
            table.insert(reading);
        }
        table
    }
}
