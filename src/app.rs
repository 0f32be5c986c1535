//! Application state and interaction logic.
//!
//! `App` never touches the simulation directly. Key handlers queue
//! [`Command`]s in an outbox that the main loop forwards to the driver, and
//! the main loop feeds published snapshots and driver events back in.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use kaal_sim::{Command, DriverEvent, Notice, Outcome};
use kaal_types::{DashboardSnapshot, DevicePanel, FaultKind, Mode, MAX_LEVEL};

use crate::data::History;
use crate::export::ExportDocument;
use crate::ui::Theme;

/// How long a status message stays in the footer.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub show_live_map: bool,

    pub snapshot: DashboardSnapshot,
    pub history: History,
    /// Seed the dashboard runs with, drawn or configured.
    pub seed: u64,

    // Device panel navigation
    pub focused_panel: usize,
    pub selected_device: usize,

    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,

    /// Every notice received, kept for export.
    pub notices: Vec<Notice>,

    pending_title: Option<String>,
    outbox: Vec<Command>,
}

impl App {
    /// Create an App around the dashboard's first snapshot.
    pub fn new(snapshot: DashboardSnapshot, seed: u64) -> Self {
        Self::with_theme(snapshot, seed, Theme::auto_detect())
    }

    pub fn with_theme(snapshot: DashboardSnapshot, seed: u64, theme: Theme) -> Self {
        let mut app = Self {
            running: true,
            show_help: false,
            show_live_map: true,
            pending_title: Some(snapshot.mode.title()),
            snapshot,
            history: History::new(),
            seed,
            focused_panel: 0,
            selected_device: 0,
            theme,
            status_message: None,
            notices: Vec::new(),
            outbox: Vec::new(),
        };
        app.record_history();
        app
    }

    pub fn mode(&self) -> Mode {
        self.snapshot.mode
    }

    /// Device panels that can take focus, in cycling order.
    pub fn panels(&self) -> Vec<DevicePanel> {
        let mut panels = match self.snapshot.view.mode() {
            Mode::Engineer => vec![DevicePanel::Environment, DevicePanel::Relays],
            Mode::Commander => vec![DevicePanel::Room],
        };
        if self.show_live_map {
            panels.push(DevicePanel::LiveMap);
        }
        panels
    }

    pub fn focused_panel(&self) -> Option<DevicePanel> {
        self.panels().get(self.focused_panel).copied()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Queue a command for the driver.
    pub fn send(&mut self, command: Command) {
        self.outbox.push(command);
    }

    /// Drain queued commands.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    /// Window title to set, if it changed since the last call.
    pub fn take_title(&mut self) -> Option<String> {
        self.pending_title.take()
    }

    /// Replace the displayed state with a newly published snapshot.
    pub fn apply_snapshot(&mut self, snapshot: DashboardSnapshot) {
        let view_changed = snapshot.view.mode() != self.snapshot.view.mode();
        self.snapshot = snapshot;

        if view_changed {
            // A remounted view starts from fresh engines.
            self.history.clear();
            self.focused_panel = 0;
            self.selected_device = 0;
        }
        self.clamp_selection();
        self.record_history();
    }

    fn record_history(&mut self) {
        if let Some(engineer) = self.snapshot.engineer() {
            self.history.record(&engineer.diagnostics);
        }
    }

    /// React to an outcome or notice from the driver.
    pub fn handle_event(&mut self, event: DriverEvent) {
        match event {
            DriverEvent::Outcome {
                outcome: Outcome::Ignored(reason),
                ..
            } => {
                self.set_status_message(format!("Ignored: {reason}"));
            }
            DriverEvent::Outcome { .. } => {}
            DriverEvent::Notice(notice) => {
                if let Notice::ModeCommitted { title, .. } = &notice {
                    self.pending_title = Some(title.clone());
                }
                self.set_status_message(notice.message());
                self.notices.push(notice);
            }
        }
    }

    /// Request the given mode.
    pub fn request_mode(&mut self, mode: Mode) {
        self.send(Command::RequestMode(mode));
    }

    /// Request the mode that is not current.
    pub fn toggle_mode(&mut self) {
        self.request_mode(self.mode().other());
    }

    pub fn inject_fault(&mut self, kind: FaultKind) {
        self.send(Command::SimulateFault(Some(kind)));
    }

    pub fn reset_fault(&mut self) {
        self.send(Command::SimulateFault(None));
    }

    /// Move focus to the next device panel.
    pub fn cycle_panel(&mut self) {
        let count = self.panels().len().max(1);
        self.focused_panel = (self.focused_panel + 1) % count;
        self.selected_device = 0;
    }

    /// Move selection down by one device.
    pub fn select_next(&mut self) {
        if let Some(panel) = self.focused_panel() {
            let max = panel.devices().len().saturating_sub(1);
            self.selected_device = (self.selected_device + 1).min(max);
        }
    }

    /// Move selection up by one device.
    pub fn select_prev(&mut self) {
        self.selected_device = self.selected_device.saturating_sub(1);
    }

    /// Toggle the selected device of the focused panel.
    pub fn toggle_selected(&mut self) {
        let Some(panel) = self.focused_panel() else {
            return;
        };
        if let Some((id, _)) = panel.devices().get(self.selected_device) {
            self.send(Command::toggle(panel, *id));
        }
    }

    /// Nudge the level of the selected environmental effect by `delta`
    /// percent. The dashboard refuses it while the effect is switched off.
    pub fn adjust_level(&mut self, delta: i16) {
        if self.focused_panel() != Some(DevicePanel::Environment) {
            return;
        }
        let Some((id, _)) = DevicePanel::Environment.devices().get(self.selected_device) else {
            return;
        };
        let Some(current) = self
            .snapshot
            .engineer()
            .and_then(|view| view.levels.get(*id).copied())
        else {
            return;
        };
        let level = (i16::from(current) + delta).clamp(0, i16::from(MAX_LEVEL)) as u8;
        self.send(Command::SetLevel {
            device: (*id).into(),
            level,
        });
    }

    pub fn toggle_live_map(&mut self) {
        self.show_live_map = !self.show_live_map;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let panels = self.panels();
        if self.focused_panel >= panels.len() {
            self.focused_panel = 0;
            self.selected_device = 0;
        }
        if let Some(panel) = panels.get(self.focused_panel) {
            let max = panel.devices().len().saturating_sub(1);
            self.selected_device = self.selected_device.min(max);
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        ExportDocument::new(self.seed, self.snapshot.clone(), self.notices.clone()).write_to(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaal_sim::{Dashboard, RecordingNotifier, Rejection, SimSettings};

    fn dashboard(mode: Mode) -> Dashboard {
        let settings = SimSettings {
            seed: Some(1),
            initial_mode: mode,
            ..SimSettings::default()
        };
        Dashboard::new(settings, RecordingNotifier::new()).unwrap()
    }

    fn app(mode: Mode) -> App {
        App::with_theme(dashboard(mode).snapshot(), 1, Theme::dark())
    }

    #[test]
    fn test_engineer_panels_cycle_through_live_map() {
        let mut app = app(Mode::Engineer);
        assert_eq!(
            app.panels(),
            vec![DevicePanel::Environment, DevicePanel::Relays, DevicePanel::LiveMap]
        );
        app.cycle_panel();
        app.cycle_panel();
        assert_eq!(app.focused_panel(), Some(DevicePanel::LiveMap));
        app.cycle_panel();
        assert_eq!(app.focused_panel(), Some(DevicePanel::Environment));
    }

    #[test]
    fn test_hiding_live_map_moves_focus() {
        let mut app = app(Mode::Commander);
        app.cycle_panel();
        assert_eq!(app.focused_panel(), Some(DevicePanel::LiveMap));
        app.toggle_live_map();
        assert_eq!(app.focused_panel(), Some(DevicePanel::Room));
    }

    #[test]
    fn test_toggle_selected_queues_command() {
        let mut app = app(Mode::Engineer);
        app.select_next();
        app.select_next();
        app.toggle_selected();
        assert_eq!(
            app.take_commands(),
            vec![Command::toggle(DevicePanel::Environment, "hvac")]
        );
        assert!(app.take_commands().is_empty());
    }

    #[test]
    fn test_adjust_level_steps_from_snapshot() {
        let mut app = app(Mode::Engineer);
        app.select_next();
        app.adjust_level(5);
        assert_eq!(
            app.take_commands(),
            vec![Command::SetLevel {
                device: "led".into(),
                level: 80
            }]
        );

        app.select_prev();
        app.adjust_level(-60);
        assert_eq!(
            app.take_commands(),
            vec![Command::SetLevel {
                device: "fog".into(),
                level: 0
            }]
        );
    }

    #[test]
    fn test_adjust_level_needs_environment_focus() {
        let mut app = app(Mode::Engineer);
        app.cycle_panel();
        app.adjust_level(5);
        assert!(app.take_commands().is_empty());
    }

    #[test]
    fn test_selection_stops_at_last_device() {
        let mut app = app(Mode::Commander);
        for _ in 0..10 {
            app.select_next();
        }
        assert_eq!(app.selected_device, DevicePanel::Room.devices().len() - 1);
    }

    #[test]
    fn test_mode_commit_notice_sets_title_and_message() {
        let mut app = app(Mode::Engineer);
        assert_eq!(app.take_title().as_deref(), Some("PROJECT KAAL - Engineer Mode"));

        app.handle_event(DriverEvent::Notice(Notice::mode_committed(Mode::Commander)));
        assert_eq!(app.take_title().as_deref(), Some("PROJECT KAAL - Commander Mode"));
        assert_eq!(app.get_status_message(), Some("PROJECT KAAL - Commander Mode"));
        assert_eq!(app.notices.len(), 1);
    }

    #[test]
    fn test_ignored_outcome_is_reported() {
        let mut app = app(Mode::Engineer);
        app.handle_event(DriverEvent::Outcome {
            command: Command::ResetWatchdog,
            outcome: Outcome::Ignored(Rejection::WatchdogRestarting),
        });
        assert_eq!(
            app.get_status_message(),
            Some("Ignored: watchdog restart already in progress")
        );
    }

    #[test]
    fn test_view_swap_resets_navigation_and_history() {
        let mut d = dashboard(Mode::Engineer);
        let mut app = App::with_theme(d.snapshot(), 1, Theme::dark());
        d.advance_by(Duration::from_secs(10));
        app.apply_snapshot(d.snapshot());
        assert!(app.history.len() > 1);
        app.cycle_panel();

        let _ = d.apply(Command::RequestMode(Mode::Commander));
        d.advance_by(Duration::from_millis(500));
        app.apply_snapshot(d.snapshot());

        assert_eq!(app.focused_panel(), Some(DevicePanel::Room));
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_export_state_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let app = app(Mode::Commander);

        app.export_state(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["snapshot"]["view"]["view"], "commander");
        assert_eq!(json["seed"], 1);
    }

    #[test]
    fn test_export_keeps_drawn_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drawn.json");
        let d = Dashboard::new(SimSettings::default(), RecordingNotifier::new()).unwrap();
        assert_eq!(d.settings().seed, None);

        let app = App::with_theme(d.snapshot(), d.seed(), Theme::dark());
        app.export_state(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["seed"].as_u64(), Some(d.seed()));
    }
}
