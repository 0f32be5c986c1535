//! Terminal UI rendering using ratatui.
//!
//! Each mode has its own submodule with a `render` function for the body.
//!
//! ## Submodules
//!
//! - [`engineer`]: Fault injection, live diagnostics and device panels
//! - [`commander`]: Safety console and room systems
//! - [`devices`]: Toggleable device lists shared by both modes and the live map
//! - [`common`]: Shared components (header, status strip, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Telemetry (common::render_strip)     │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├───────────────────────────┬──────────┤
//! │                           │          │
//! │ Body                      │ Live map │
//! │ (engineer/commander)      │          │
//! │                           │          │
//! ├───────────────────────────┴──────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlay rendered on top:
//!    - common::render_help
//! ```

pub mod commander;
pub mod common;
pub mod devices;
pub mod engineer;
pub mod theme;

pub use theme::Theme;
