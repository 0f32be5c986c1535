//! Layered configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. An optional TOML/JSON/YAML file (`--config`)
//! 3. Environment variables: `KAAL_` prefix, `__` between nested keys
//!    (e.g. `KAAL_SIM__SEED=7`, `KAAL_LOG_DIR=/tmp/kaal`)
//!
//! CLI flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};
use kaal_sim::SimSettings;
use serde::{Deserialize, Serialize};

/// Everything the console reads from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sim: SimSettings,
    /// Directory for the daily rolling log file.
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sim: SimSettings::default(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    /// Load from defaults, an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`AppConfig::load`], reading variables from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&AppConfig::default()).context("Failed to encode default settings")?,
        );

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("KAAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: AppConfig = builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.sim.validate().context("Invalid simulation settings")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaal_types::Mode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file() -> NamedTempFile {
        tempfile::Builder::new().suffix(".toml").tempfile().unwrap()
    }

    fn empty_env() -> Option<Map<String, String>> {
        Some(Map::new())
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = AppConfig::load_with_env(None, empty_env()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = toml_file();
        writeln!(
            file,
            "log_dir = \"/tmp/kaal\"\n\n[sim]\nseed = 9\nmode_transition_ms = 250\ninitial_mode = \"commander\""
        )
        .unwrap();

        let config = AppConfig::load_with_env(Some(file.path()), empty_env()).unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/tmp/kaal"));
        assert_eq!(config.sim.seed, Some(9));
        assert_eq!(config.sim.mode_transition_ms, 250);
        assert_eq!(config.sim.initial_mode, Mode::Commander);
        assert_eq!(config.sim.telemetry_interval_ms, 5000);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = toml_file();
        writeln!(file, "[sim]\nseed = 9").unwrap();

        let env = Map::from([
            ("KAAL_SIM__SEED".to_string(), "21".to_string()),
            ("KAAL_SIM__FAULT_RESTORE_DELAY_MS".to_string(), "1000".to_string()),
        ]);
        let config = AppConfig::load_with_env(Some(file.path()), Some(env)).unwrap();
        assert_eq!(config.sim.seed, Some(21));
        assert_eq!(config.sim.fault_restore_delay_ms, 1000);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let env = Map::from([("KAAL_SIM__TELEMETRY_INTERVAL_MS".to_string(), "0".to_string())]);
        assert!(AppConfig::load_with_env(None, Some(env)).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let missing = Path::new("/definitely/not/here.toml");
        assert!(AppConfig::load_with_env(Some(missing), empty_env()).is_err());
    }
}
