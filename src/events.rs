use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use kaal_sim::Command;
use kaal_types::{FaultKind, Mode};

use crate::app::App;

/// File written by the `e` key.
const EXPORT_FILE: &str = "kaal_export.json";

/// Percent per `+`/`-` press.
const LEVEL_STEP: i16 = 5;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // Mode switching
        KeyCode::Char('1') => app.request_mode(Mode::Engineer),
        KeyCode::Char('2') => app.request_mode(Mode::Commander),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_mode(),

        // Device panels
        KeyCode::Char('p') => app.cycle_panel(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('m') => app.toggle_live_map(),

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        code => match app.mode() {
            Mode::Engineer => handle_engineer_key(app, code),
            Mode::Commander => handle_commander_key(app, code),
        },
    }
}

fn handle_engineer_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('t') => app.inject_fault(FaultKind::Temperature),
        KeyCode::Char('i') => app.inject_fault(FaultKind::Current),
        KeyCode::Char('v') => app.inject_fault(FaultKind::Voltage),
        KeyCode::Char('x') => app.reset_fault(),
        KeyCode::Char('w') => app.send(Command::ResetWatchdog),
        KeyCode::Char('h') => app.send(Command::ToggleHologram),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_level(LEVEL_STEP),
        KeyCode::Char('-') => app.adjust_level(-LEVEL_STEP),
        _ => {}
    }
}

fn handle_commander_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('d') => app.send(Command::RunDiagnostic),
        KeyCode::Char('s') => app.send(Command::TriggerSafety),
        KeyCode::Char('r') => app.send(Command::ResetSafety),
        KeyCode::Char('a') => app.send(Command::ActivateRoom),
        _ => {}
    }
}
