//! Console-side data helpers.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing of duration strings (e.g., "30s", "500ms") and clock formatting
//! - [`history`]: Diagnostics history for sparklines

pub mod duration;
pub mod history;

pub use history::{Gauge, History};
