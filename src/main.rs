use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use kaal_console::{
    config::AppConfig,
    data::duration::parse_duration,
    events,
    export::run_headless,
    logging::init_tracing,
    ui, App,
};
use kaal_sim::{driver, DriverHandle};
use kaal_types::{DevicePanel, FaultKind, Mode};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "kaal-console")]
#[command(about = "Project KAAL command-room dashboard with simulated telemetry and fault injection")]
struct Args {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the simulation's random generator
    #[arg(long)]
    seed: Option<u64>,

    /// Mode to start in (engineer or commander)
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Run headless, write the final state to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Model time to run before exporting (e.g., "30s", "2m")
    #[arg(long, default_value = "30s", requires = "export")]
    run_for: String,

    /// Fault to inject at the start of a headless run
    #[arg(long, requires = "export")]
    fault: Option<FaultKind>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.sim.seed = Some(seed);
    }
    if let Some(mode) = args.mode {
        config.sim.initial_mode = mode;
    }
    if let Some(log_dir) = args.log_dir {
        config.log_dir = log_dir;
    }

    let _guard = init_tracing(&config.log_dir)?;
    info!(?config, "starting");

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        let run_for = parse_duration(&args.run_for)
            .with_context(|| format!("Invalid --run-for '{}'", args.run_for))?;
        let doc = run_headless(config.sim, run_for, args.fault)?;
        doc.write_to(&export_path)?;
        println!("Exported dashboard state to: {}", export_path.display());
        return Ok(());
    }

    run_tui(config)
}

/// Run the TUI against a driver on a background runtime
fn run_tui(config: AppConfig) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let mut handle = {
        let _enter = rt.enter();
        driver::spawn(config.sim.clone())?
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // The driver reports the seed it drew when none was configured.
    let mut app = App::new(handle.latest(), handle.seed());

    let result = run_app(&mut terminal, &mut app, &mut handle);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match rt.block_on(handle.stop()) {
        Ok(dashboard) => info!(at = ?dashboard.now(), "driver stopped"),
        Err(e) => error!(error = %e, "driver did not stop cleanly"),
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    handle: &mut DriverHandle,
) -> Result<()> {
    let mut snapshots = handle.subscribe();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 80;
    const MIN_HEIGHT: u16 = 24;

    while app.running {
        for command in app.take_commands() {
            if let Err(e) = handle.submit(command) {
                app.set_status_message(format!("Command dropped: {}", e));
            }
        }

        while let Some(event) = handle.try_event() {
            app.handle_event(event);
        }

        if snapshots.has_changed().unwrap_or(false) {
            let snapshot = snapshots.borrow_and_update().clone();
            app.apply_snapshot(snapshot);
        }

        if let Some(title) = app.take_title() {
            execute!(terminal.backend_mut(), SetTitle(title))?;
        }

        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = Paragraph::new(msg)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Telemetry strip
                Constraint::Length(1), // Tabs
                Constraint::Min(12),   // Body
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_strip(frame, app, chunks[1]);
            ui::common::render_tabs(frame, app, chunks[2]);

            let (body, live_map) = if app.show_live_map {
                let [body, live_map] =
                    Layout::horizontal([Constraint::Min(60), Constraint::Length(28)])
                        .areas(chunks[3]);
                (body, Some(live_map))
            } else {
                (chunks[3], None)
            };

            match app.snapshot.view.mode() {
                Mode::Engineer => ui::engineer::render(frame, app, body),
                Mode::Commander => ui::commander::render(frame, app, body),
            }

            // Cross-fade while the next view is pending
            if app.snapshot.transitioning {
                frame.buffer_mut().set_style(body, app.theme.dim());
            }

            if let Some(area) = live_map {
                let [area, _] =
                    Layout::vertical([Constraint::Length(6), Constraint::Min(0)]).areas(area);
                ui::devices::render_panel(frame, app, DevicePanel::LiveMap, area);
            }

            ui::common::render_status_bar(frame, app, chunks[4]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}
