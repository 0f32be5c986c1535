//! Toggleable device panels.

use kaal_types::DevicePanel;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;

/// Render one device panel as a list with on/off markers.
///
/// The panel is skipped when the snapshot has no set for it, which only
/// happens for a panel of the view that is not mounted.
pub fn render_panel(frame: &mut Frame, app: &App, panel: DevicePanel, area: Rect) {
    let Some(active) = app.snapshot.devices(panel) else {
        return;
    };

    let focused = app.focused_panel() == Some(panel);
    let levels = match panel {
        DevicePanel::Environment => app.snapshot.engineer().map(|view| &view.levels),
        _ => None,
    };

    let items: Vec<ListItem> = panel
        .devices()
        .iter()
        .map(|(id, label)| {
            let on = active.contains(*id);
            let (marker, style) = if on {
                ("●", Style::default().fg(app.theme.healthy))
            } else {
                ("○", app.theme.dim())
            };
            let mut spans = vec![
                Span::styled(format!(" {marker} "), style),
                Span::raw(*label),
                Span::styled(if on { "  ON" } else { "  OFF" }, style),
            ];
            if let Some(level) = levels.and_then(|levels| levels.get(*id)) {
                spans.push(Span::styled(format!(" {level:>3}%"), style));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" {} ({}/{}) ", panel.title(), active.len(), panel.devices().len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.panel_border(focused));

    let list = List::new(items).block(block).highlight_style(app.theme.selected);

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.selected_device));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Theme;
    use kaal_sim::{Dashboard, RecordingNotifier, SimSettings};
    use kaal_types::Mode;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App, panel: DevicePanel) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal
            .draw(|frame| render_panel(frame, app, panel, frame.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_initial_led_is_on() {
        let dashboard = Dashboard::new(
            SimSettings {
                seed: Some(2),
                ..SimSettings::default()
            },
            RecordingNotifier::new(),
        )
        .unwrap();
        let app = App::with_theme(dashboard.snapshot(), 2, Theme::dark());

        let rows = render(&app, DevicePanel::Environment);
        assert!(rows[0].contains("(1/4)"));
        let led = rows.iter().find(|row| row.contains("LED Panels")).unwrap();
        assert!(led.contains("●"));
        assert!(led.contains("ON"));
        assert!(led.contains("75%"));
        let fog = rows.iter().find(|row| row.contains("Fog Machine")).unwrap();
        assert!(fog.contains("OFF"));
        assert!(fog.contains("50%"));
    }

    #[test]
    fn test_room_shows_one_lit_system() {
        let mut dashboard = Dashboard::new(
            SimSettings {
                seed: Some(2),
                initial_mode: Mode::Commander,
                ..SimSettings::default()
            },
            RecordingNotifier::new(),
        )
        .unwrap();
        let _ = dashboard.apply(kaal_sim::Command::toggle(DevicePanel::Room, "fog"));
        let _ = dashboard.apply(kaal_sim::Command::toggle(DevicePanel::Room, "terrain"));
        let app = App::with_theme(dashboard.snapshot(), 2, Theme::dark());

        let rows = render(&app, DevicePanel::Room);
        assert!(rows[0].contains("(1/3)"));
        let terrain = rows.iter().find(|row| row.contains("Terrain Table")).unwrap();
        assert!(terrain.contains("ON"));
        let fog = rows.iter().find(|row| row.contains("Atmospheric Fog")).unwrap();
        assert!(fog.contains("OFF"));
    }

    #[test]
    fn test_hidden_panel_draws_nothing() {
        let dashboard = Dashboard::new(
            SimSettings {
                seed: Some(2),
                initial_mode: Mode::Commander,
                ..SimSettings::default()
            },
            RecordingNotifier::new(),
        )
        .unwrap();
        let app = App::with_theme(dashboard.snapshot(), 2, Theme::dark());

        let rows = render(&app, DevicePanel::Relays);
        assert!(rows.iter().all(|row| row.trim().is_empty()));
    }
}
