//! Commander mode: safety console and room systems.

use kaal_types::{CommanderSnapshot, DevicePanel, HealthStatus};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::devices;

/// Render the commander body.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = app.snapshot.commander() else {
        return;
    };

    let [console_area, room_area] =
        Layout::horizontal([Constraint::Fill(3), Constraint::Fill(2)]).areas(area);
    let [room_area, sequence_area, _] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(room_area);

    render_console(frame, app, view, console_area);
    devices::render_panel(frame, app, DevicePanel::Room, room_area);
    render_room_sequence(frame, app, view, sequence_area);
}

/// One line under the room panel: what runs now and how to run everything.
fn render_room_sequence(frame: &mut Frame, app: &App, view: &CommanderSnapshot, area: Rect) {
    let room = &view.room;
    let state = if room.all_active {
        Span::styled(" ALL SYSTEMS ACTIVE", app.theme.status_style(HealthStatus::Healthy))
    } else if room.is_engaged() {
        Span::styled(" SEQUENCE RUNNING", app.theme.status_style(HealthStatus::Healthy))
    } else {
        Span::styled(" STANDBY", app.theme.dim())
    };
    let line = Line::from(vec![state, Span::styled("   [a] Activate all", app.theme.dim())]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_console(frame: &mut Frame, app: &App, view: &CommanderSnapshot, area: Rect) {
    let console = &view.console;

    let (safety_style, border) = if console.safety_triggered {
        (
            app.theme.status_style(HealthStatus::Critical),
            Style::default().fg(app.theme.critical),
        )
    } else {
        (
            app.theme.status_style(HealthStatus::Healthy),
            Style::default().fg(app.theme.border),
        )
    };

    let diagnostic_style = if console.diagnostic_running {
        Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD)
    } else {
        app.theme.status_style(HealthStatus::Healthy)
    };

    let hint = if console.safety_triggered {
        " [r] Reset safety to resume operations"
    } else if console.diagnostic_running {
        " Diagnostic in progress..."
    } else {
        " [d] Run diagnostic   [s] Trigger safety"
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Safety system     "),
            Span::styled(console.safety_label(), safety_style),
        ]),
        Line::from(vec![
            Span::raw("  Diagnostics       "),
            Span::styled(console.diagnostic_label(), diagnostic_style),
        ]),
        Line::from(""),
        Line::from(Span::styled(hint, app.theme.dim())),
    ];

    let block = Block::default()
        .title(" Safety Console ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Theme;
    use kaal_sim::{Command, Dashboard, RecordingNotifier, SimSettings};
    use kaal_types::Mode;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        terminal.draw(|frame| render(frame, app, frame.area())).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_console_shows_latched_safety() {
        let mut dashboard = Dashboard::new(
            SimSettings {
                seed: Some(4),
                initial_mode: Mode::Commander,
                ..SimSettings::default()
            },
            RecordingNotifier::new(),
        )
        .unwrap();

        let app = App::with_theme(dashboard.snapshot(), 4, Theme::dark());
        let text = screen(&app);
        assert!(text.contains("READY"));
        assert!(text.contains("OPERATIONAL"));
        assert!(text.contains("Room Systems"));

        let _ = dashboard.apply(Command::TriggerSafety);
        let app = App::with_theme(dashboard.snapshot(), 4, Theme::dark());
        let text = screen(&app);
        assert!(text.contains("TRIGGERED"));
        assert!(text.contains("Reset safety"));
    }

    #[test]
    fn test_room_sequence_line() {
        let mut dashboard = Dashboard::new(
            SimSettings {
                seed: Some(4),
                initial_mode: Mode::Commander,
                ..SimSettings::default()
            },
            RecordingNotifier::new(),
        )
        .unwrap();
        let app = App::with_theme(dashboard.snapshot(), 4, Theme::dark());
        assert!(screen(&app).contains("STANDBY"));

        let _ = dashboard.apply(Command::ActivateRoom);
        let app = App::with_theme(dashboard.snapshot(), 4, Theme::dark());
        let text = screen(&app);
        assert!(text.contains("ALL SYSTEMS ACTIVE"));
        assert!(text.contains("(3/3)"));
    }
}
