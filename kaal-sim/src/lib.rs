//! # kaal-sim
//!
//! Simulation engines behind the KAAL command-room dashboard.
//!
//! Everything here runs on model time. A [`Dashboard`] owns a [`Scheduler`]
//! and the engines; callers advance it explicitly, so tests are deterministic
//! and never sleep. With the `tokio` feature, [`driver`] runs a dashboard in
//! real time inside a task.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//!
//! use kaal_sim::{Command, Dashboard, RecordingNotifier, SimSettings};
//! use kaal_types::{FaultKind, FaultPhase};
//!
//! let settings = SimSettings { seed: Some(1), ..SimSettings::default() };
//! let mut dashboard = Dashboard::new(settings, RecordingNotifier::new()).unwrap();
//!
//! let outcome = dashboard.apply(Command::SimulateFault(Some(FaultKind::Temperature)));
//! assert!(outcome.is_applied());
//!
//! dashboard.advance_to(Duration::from_secs(3));
//! let snap = dashboard.snapshot();
//! let fault = &snap.engineer().unwrap().fault;
//! assert_eq!(fault.phase, FaultPhase::Recovering);
//! ```
//!
//! ## Engines
//!
//! - [`TelemetrySimulator`]: the header status strip
//! - [`FaultInjectionEngine`]: one fault at a time with timed recovery
//! - [`DeviceToggleRegistry`]: per-panel device activation
//! - [`ModeController`]: Engineer/Commander switching with a cross-fade
//! - [`DiagnosticsMonitor`] and [`SafetyConsole`]: engineer and commander panels
//! - [`HologramProjector`], [`EffectMixer`] and [`RoomSequence`]: projector,
//!   effect intensities and the room that resets itself when idle

mod console;
mod dashboard;
mod devices;
mod diagnostics;
mod event;
mod fault;
mod hologram;
mod levels;
mod mode;
mod notify;
mod outcome;
mod room;
mod scheduler;
mod settings;
mod telemetry;
mod view;

#[cfg(feature = "tokio")]
pub mod driver;

pub use console::SafetyConsole;
pub use dashboard::{Command, Dashboard};
pub use devices::DeviceToggleRegistry;
pub use diagnostics::{DiagnosticsMonitor, GaugeBand};
pub use event::{SimScheduler, TimerEvent};
pub use fault::FaultInjectionEngine;
pub use hologram::HologramProjector;
pub use levels::EffectMixer;
pub use mode::ModeController;
pub use notify::{Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use outcome::{Outcome, Rejection};
pub use room::RoomSequence;
pub use scheduler::{Scheduler, TimerId};
pub use settings::{SettingsError, SimSettings};
pub use telemetry::{standard_subsystems, Subsystem, TelemetrySimulator, ValueRule};
pub use view::{CommanderView, EngineerView, MountedView};

#[cfg(feature = "tokio")]
pub use driver::{DriverError, DriverEvent, DriverHandle};
