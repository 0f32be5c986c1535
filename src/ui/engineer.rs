//! Engineer mode: fault injection, system diagnostics, the hologram and
//! device panels.

use kaal_types::{
    DevicePanel, EngineerSnapshot, FaultKind, FaultMetrics, FaultPhase, HealthStatus,
    WatchdogStatus,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::Gauge;
use crate::ui::devices;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Samples shown per sparkline.
const SPARKLINE_WIDTH: usize = 16;

/// Render the engineer body.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = app.snapshot.engineer() else {
        return;
    };

    let [left, right] = Layout::horizontal([Constraint::Fill(3), Constraint::Fill(2)]).areas(area);
    let [fault_area, diagnostics_area] =
        Layout::vertical([Constraint::Length(12), Constraint::Min(8)]).areas(left);
    let [environment_area, relays_area, hologram_area] = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(4),
    ])
    .areas(right);

    render_fault(frame, app, view, fault_area);
    render_diagnostics(frame, app, view, diagnostics_area);
    devices::render_panel(frame, app, DevicePanel::Environment, environment_area);
    devices::render_panel(frame, app, DevicePanel::Relays, relays_area);
    render_hologram(frame, app, view, hologram_area);
}

fn render_hologram(frame: &mut Frame, app: &App, view: &EngineerSnapshot, area: Rect) {
    let hologram = view.hologram;
    let style = if hologram.active {
        Style::default().fg(app.theme.healthy).add_modifier(Modifier::BOLD)
    } else {
        app.theme.dim()
    };

    let lines = vec![
        Line::from(vec![
            Span::raw("  "),
            Span::styled(hologram.label(), style),
            Span::raw(format!("   sync {}%", hologram.sync_percentage)),
        ]),
        Line::from(Span::styled("  [h] Toggle projector", app.theme.dim())),
    ];

    let block = Block::default()
        .title(" Hologram ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_fault(frame: &mut Frame, app: &App, view: &EngineerSnapshot, area: Rect) {
    let fault = &view.fault;
    let metrics = &fault.metrics;

    let headline_style = match fault.phase {
        FaultPhase::Normal => app.theme.status_style(HealthStatus::Healthy),
        FaultPhase::Faulted => app.theme.status_style(HealthStatus::Critical),
        FaultPhase::Recovering => app.theme.status_style(HealthStatus::Warning),
    };

    let metric = |label: &str, value: String, limit: String, over: bool| {
        let style = if over {
            app.theme.status_style(HealthStatus::Critical)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(format!("  {label:<12}")),
            Span::styled(format!("{value:>9}"), style),
            Span::styled(format!("   limit {limit}"), app.theme.dim()),
        ])
    };

    let protocol = |label: &str, active: bool| {
        let (text, style) = if active {
            ("ACTIVE", Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD))
        } else {
            ("STANDBY", app.theme.dim())
        };
        Line::from(vec![Span::raw(format!("  {label:<20}")), Span::styled(text, style)])
    };

    let mut lines = vec![
        Line::from(Span::styled(format!(" {}", fault.headline()), headline_style)),
        Line::from(""),
        metric(
            "Temperature",
            format!("{:.1}°C", metrics.temperature),
            format!("{:.0}°C", FaultMetrics::TEMPERATURE_THRESHOLD),
            metrics.temperature > FaultMetrics::TEMPERATURE_THRESHOLD,
        ),
        metric(
            "Current",
            format!("{:.1}A", metrics.current_draw),
            format!("{:.0}A", FaultMetrics::CURRENT_THRESHOLD),
            metrics.current_draw > FaultMetrics::CURRENT_THRESHOLD,
        ),
        metric(
            "Voltage",
            format!("{:.1}V", metrics.voltage),
            format!("{:.0}V", FaultMetrics::VOLTAGE_THRESHOLD),
            metrics.voltage < FaultMetrics::VOLTAGE_THRESHOLD,
        ),
        metric(
            "Fan speed",
            format!("{} RPM", metrics.fan_speed),
            format!("{} RPM", FaultMetrics::FAN_SPEED_THRESHOLD),
            metrics.fan_speed < FaultMetrics::FAN_SPEED_THRESHOLD,
        ),
        Line::from(vec![
            Span::raw(format!("  {:<12}", "Safety")),
            Span::styled(
                format!("{:>9}", metrics.safety_status.label().to_uppercase()),
                app.theme.subsystem_style(metrics.safety_status),
            ),
        ]),
        Line::from(""),
        protocol("Primary protocol", fault.primary_protocol_active()),
        protocol("Recovery protocol", fault.recovery_active()),
    ];

    let buttons: Vec<Span> = FaultKind::ALL
        .iter()
        .zip(["t", "i", "v"])
        .flat_map(|(kind, key)| {
            let style = if fault.is_faulted(*kind) {
                app.theme.status_style(HealthStatus::Critical)
            } else {
                Style::default()
            };
            [
                Span::styled(format!(" [{key}] {}", kind.label()), style),
                Span::raw(" "),
            ]
        })
        .collect();
    lines.push(Line::from(buttons));

    let block = Block::default()
        .title(" Fault Injection ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_diagnostics(frame: &mut Frame, app: &App, view: &EngineerSnapshot, area: Rect) {
    let reading = &view.diagnostics;

    let header = Row::new(vec!["Gauge", "Value", "Trend", "Status"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = Gauge::ALL
        .iter()
        .map(|gauge| {
            let health = match gauge {
                Gauge::Temperature => reading.temperature_health(),
                Gauge::RelayResponse => reading.relay_health(),
                Gauge::Power | Gauge::Current => HealthStatus::Healthy,
            };
            Row::new(vec![
                Cell::from(gauge.label()),
                Cell::from(gauge.format(reading)),
                Cell::from(render_sparkline(&app.history.sparkline(*gauge))),
                Cell::from(health.symbol()).style(app.theme.status_style(health)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(9),
        Constraint::Length(SPARKLINE_WIDTH as u16),
        Constraint::Length(6),
    ];

    let (watchdog, watchdog_style) = match reading.watchdog {
        WatchdogStatus::Active => ("ACTIVE", app.theme.status_style(HealthStatus::Healthy)),
        WatchdogStatus::Restarting => ("RESTARTING", app.theme.status_style(HealthStatus::Warning)),
    };

    let overall = reading.overall_health();
    let title = Line::from(vec![
        Span::raw(" System Diagnostics "),
        Span::styled(format!("[{}]", overall.symbol()), app.theme.status_style(overall)),
        Span::raw(" watchdog "),
        Span::styled(watchdog, watchdog_style),
        Span::raw(" "),
    ]);

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}

fn render_sparkline(data: &[u8]) -> String {
    data.iter()
        .rev()
        .take(SPARKLINE_WIDTH)
        .rev()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect()
}
