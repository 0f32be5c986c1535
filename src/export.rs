//! JSON export of dashboard state.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use kaal_sim::{Command, Dashboard, Notice, RecordingNotifier, SimSettings};
use kaal_types::{DashboardSnapshot, FaultKind, Millis};
use serde::Serialize;
use tracing::info;

/// The document written by `--export` and by the `e` key.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub generated_by: String,
    pub seed: u64,
    pub snapshot: DashboardSnapshot,
    pub notices: Vec<Notice>,
}

impl ExportDocument {
    pub fn new(seed: u64, snapshot: DashboardSnapshot, notices: Vec<Notice>) -> Self {
        Self {
            generated_by: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            seed,
            snapshot,
            notices,
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

/// Run a dashboard headless in model time and capture the result.
///
/// An optional fault is injected at time zero.
pub fn run_headless(
    settings: SimSettings,
    run_for: Duration,
    fault: Option<FaultKind>,
) -> Result<ExportDocument> {
    let recorder = RecordingNotifier::new();
    let mut dashboard =
        Dashboard::new(settings, recorder.clone()).context("Invalid simulation settings")?;

    if let Some(kind) = fault {
        let outcome = dashboard.apply(Command::SimulateFault(Some(kind)));
        if let Some(reason) = outcome.rejection() {
            anyhow::bail!("Cannot inject {} fault: {}", kind, reason);
        }
    }

    let fired = dashboard.advance_to(run_for);
    info!(fired, at = %Millis::from(run_for), "headless run finished");

    let snapshot = dashboard.snapshot();
    let seed = dashboard.seed();
    dashboard.shutdown();

    Ok(ExportDocument::new(seed, snapshot, recorder.take()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaal_types::{FaultPhase, Mode};

    fn settings() -> SimSettings {
        SimSettings {
            seed: Some(3),
            ..SimSettings::default()
        }
    }

    #[test]
    fn test_headless_fault_is_mid_recovery_at_five_seconds() {
        let doc = run_headless(settings(), Duration::from_secs(5), Some(FaultKind::Voltage)).unwrap();
        let engineer = doc.snapshot.engineer().unwrap();
        assert_eq!(engineer.fault.phase, FaultPhase::Recovering);
        assert_eq!(doc.snapshot.at, Millis::from_secs(5));
        assert_eq!(doc.seed, 3);
    }

    #[test]
    fn test_headless_fault_in_commander_mode_fails() {
        let settings = SimSettings {
            initial_mode: Mode::Commander,
            ..settings()
        };
        assert!(run_headless(settings, Duration::from_secs(1), Some(FaultKind::Current)).is_err());
    }

    #[test]
    fn test_export_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let doc = run_headless(settings(), Duration::from_secs(30), None).unwrap();
        doc.write_to(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["seed"], 3);
        assert_eq!(json["snapshot"]["mode"], "engineer");
        assert_eq!(json["snapshot"]["at"], 30_000);
        assert_eq!(json["snapshot"]["view"]["view"], "engineer");
        assert!(json["snapshot"]["status_bar"]["Network"].is_object());
        assert!(json["notices"].as_array().unwrap().is_empty());
    }
}
