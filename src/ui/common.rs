//! Common UI components shared across modes.
//!
//! This module contains the header bar, telemetry strip, tab bar, status
//! bar, and help overlay.

use std::time::Duration;

use kaal_types::Mode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_clock;

/// Render the header bar.
///
/// Displays: product name, mode badge, transition indicator, model clock.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.snapshot;

    let mut spans = vec![
        Span::styled(" PROJECT KAAL ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!(" {} ", snapshot.mode.badge()),
            app.theme.mode_style(snapshot.mode),
        ),
        Span::raw(format!(" {} Mode ", snapshot.mode.label())),
    ];

    if snapshot.transitioning {
        spans.push(Span::styled(
            "⟳ switching ",
            Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::raw("│ "));
    spans.push(Span::styled(
        format_clock(Duration::from(snapshot.at)),
        app.theme.dim(),
    ));

    spans.push(Span::styled(format!(" │ seed {}", app.seed), app.theme.dim()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status strip: one entry per subsystem reading.
pub fn render_strip(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];

    for (i, reading) in app.snapshot.status_bar.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", app.theme.dim()));
        }
        spans.push(Span::styled("● ", app.theme.subsystem_style(reading.status)));
        spans.push(Span::raw(format!("{}: ", reading.name)));
        spans.push(Span::styled(
            reading.display_value(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing both modes.
///
/// Highlights the mounted mode.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Engineer "), Line::from(" 2:Commander ")];

    let selected = match app.mode() {
        Mode::Engineer => 0,
        Mode::Commander => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows a temporary status message if one is live, otherwise the controls
/// for the current mode.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.mode() {
        Mode::Engineer => "t/i/v:fault x:reset w:watchdog p:panel ␣:toggle Tab:mode ?:help q:quit",
        Mode::Commander => "d:diagnostic s:safety r:reset p:panel ␣:toggle Tab:mode ?:help q:quit",
    };

    let focus = app
        .focused_panel()
        .map(|panel| panel.title())
        .unwrap_or("-");

    let paragraph = Paragraph::new(format!(" {} | {}", focus, controls))
        .style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Modes"),
        Line::from("  1 / 2       Engineer / Commander"),
        Line::from("  Tab         Switch mode"),
        Line::from(""),
        section(" Engineer"),
        Line::from("  t / i / v   Temperature / current / voltage fault"),
        Line::from("  x           Reset fault"),
        Line::from("  w           Reset watchdog"),
        Line::from("  h           Toggle hologram"),
        Line::from("  + / -       Raise / lower selected effect"),
        Line::from(""),
        section(" Commander"),
        Line::from("  d           Run diagnostic"),
        Line::from("  s           Trigger safety"),
        Line::from("  r           Reset safety"),
        Line::from("  a           Activate all room systems"),
        Line::from(""),
        section(" Devices"),
        Line::from("  p           Cycle panels"),
        Line::from("  ↑/↓ k/j     Select device"),
        Line::from("  Space/Enter Toggle device"),
        Line::from("  m           Show/hide live map"),
        Line::from(""),
        section(" General"),
        Line::from("  e           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let help_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 52u16.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
