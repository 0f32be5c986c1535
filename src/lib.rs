//! # kaal-console
//!
//! A terminal dashboard for the Project KAAL command room, driven by the
//! [`kaal_sim`] simulation.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │ events  │───▶│   app    │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (keys)  │    │ (state)  │    │(render) │    │         │  │
//! │  └─────────┘    └────┬─────┘    └─────────┘    └─────────┘  │
//! │                      │ ▲                                    │
//! │             commands ▼ │ snapshots, notices                 │
//! │                 ┌──────────┐                                │
//! │                 │  driver  │ kaal_sim::driver (tokio task)  │
//! │                 └──────────┘                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, panel navigation and the command outbox
//! - **[`events`]**: Keyboard handling
//! - **[`ui`]**: Rendering with ratatui, one module per mode plus shared parts
//! - **[`data`]**: Diagnostics history for sparklines, duration parsing
//! - **[`config`]**: Layered configuration (defaults, file, environment)
//! - **[`export`]**: JSON export and the headless run used by `--export`
//! - **[`logging`]**: File-based tracing setup
//!
//! ## Usage
//!
//! ```bash
//! # Interactive dashboard
//! kaal-console --seed 7
//!
//! # Headless: inject a fault, run 5s of model time, write JSON
//! kaal-console --export state.json --run-for 5s --fault voltage
//! ```
//!
//! ### Headless export as a library
//!
//! ```
//! use std::time::Duration;
//! use kaal_console::export::run_headless;
//! use kaal_sim::SimSettings;
//!
//! let settings = SimSettings { seed: Some(7), ..SimSettings::default() };
//! let doc = run_headless(settings, Duration::from_secs(10), None).unwrap();
//! assert_eq!(doc.seed, 7);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod export;
pub mod logging;
pub mod ui;

pub use app::App;
pub use config::AppConfig;
pub use export::{run_headless, ExportDocument};
