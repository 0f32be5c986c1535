//! Top-level dashboard mode.

use core::fmt;
use core::str::FromStr;

/// Which view tree the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Technical system architecture for evaluators and engineers.
    #[default]
    Engineer,
    /// Strategic, mission-focused presentation.
    Commander,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Engineer => "Engineer",
            Mode::Commander => "Commander",
        }
    }

    /// Badge text shown next to the product name.
    pub fn badge(&self) -> &'static str {
        match self {
            Mode::Engineer => "TECHNICAL",
            Mode::Commander => "STRATEGIC",
        }
    }

    /// Window title published when the mode is committed.
    pub fn title(&self) -> String {
        format!("PROJECT KAAL - {} Mode", self.label())
    }

    pub fn other(&self) -> Self {
        match self {
            Mode::Engineer => Mode::Commander,
            Mode::Commander => Mode::Engineer,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Engineer => "engineer",
            Mode::Commander => "commander",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "engineer" => Ok(Mode::Engineer),
            "commander" => Ok(Mode::Commander),
            other => Err(format!("unknown mode '{other}' (expected engineer or commander)")),
        }
    }
}
