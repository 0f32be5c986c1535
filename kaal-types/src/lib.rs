//! # kaal-types
//!
//! Core data model for the KAAL command-room simulation. These are the plain
//! values that the simulation engines in `kaal-sim` produce and that any
//! renderer (the terminal console, a JSON export, a test) reads.
//!
//! ## Features
//!
//! - `serde`: JSON (or any serde format) serialization of every type
//!
//! ## Example
//!
//! ```rust
//! use kaal_types::{FaultKind, FaultMetrics, FaultPhase, FaultState};
//!
//! let state = FaultState::normal();
//! assert_eq!(state.phase, FaultPhase::Normal);
//! assert_eq!(state.metrics, FaultMetrics::baseline());
//!
//! let faulted = FaultMetrics::baseline().with_fault(FaultKind::Temperature);
//! assert!(faulted.temperature > FaultMetrics::TEMPERATURE_THRESHOLD);
//! ```
//!
//! ## Schema Version
//!
//! The current schema version is **1**. It is embedded in every
//! [`DashboardSnapshot`] so exported documents can be checked by readers.

mod device;
mod diagnostics;
mod duration;
mod effects;
mod fault;
mod mode;
mod snapshot;
mod telemetry;
mod version;

pub use device::*;
pub use diagnostics::*;
pub use duration::*;
pub use effects::*;
pub use fault::*;
pub use mode::*;
pub use snapshot::*;
pub use telemetry::*;
pub use version::*;

/// Current schema version of [`DashboardSnapshot`].
pub const SCHEMA_VERSION: u32 = 1;
