use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use healthwatch::app::{write_summary, App};
use healthwatch::config::Settings;
use healthwatch::data::duration::parse_duration;
use healthwatch::data::DashboardData;
use healthwatch::events;
use healthwatch::source::{FileSource, RecordSource, StreamSource, WebSocketSource};
use healthwatch::ui;
use healthwatch_types::{HealthRecord, InboundMessage};

/// Redraw interval while a map transition is running.
const ANIMATION_FRAME: Duration = Duration::from_millis(30);

#[derive(Parser, Debug)]
#[command(name = "healthwatch", version)]
#[command(about = "Real-time terminal dashboard for streamed health observations")]
struct Args {
    /// WebSocket endpoint to connect to (ws:// or wss://)
    #[arg(short, long, conflicts_with_all = ["stdin", "file"])]
    connect: Option<String>,

    /// Read newline-delimited JSON messages from stdin
    #[arg(long, conflicts_with_all = ["connect", "file"])]
    stdin: bool,

    /// Tail a newline-delimited JSON file of recorded messages
    #[arg(short, long, conflicts_with_all = ["connect", "stdin"])]
    file: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep at most this many records in memory
    #[arg(long)]
    capacity: Option<usize>,

    /// Keepalive ping interval in whole seconds (e.g., "5m", "30s")
    #[arg(long)]
    ping_interval: Option<String>,

    /// Treat connection loss as final instead of reconnecting
    #[arg(long)]
    no_reconnect: bool,

    /// Log file (the terminal is used by the dashboard)
    #[arg(long, default_value = "healthwatch.log")]
    log_file: PathBuf,

    /// Export the summary of --file to a JSON file and exit
    #[arg(short, long, requires = "file")]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let settings = load_settings(&args)?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        if let Some(ref file) = args.file {
            return export_to_file(file, export_path, &settings);
        }
    }

    // Sources spawn their tasks on this runtime; the TUI runs on the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let source = create_source(&args, &settings)?;
    tracing::info!(source = source.description(), "starting dashboard");

    run_tui(source, &settings)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}

/// Load configuration and apply command-line overrides.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;

    if let Some(ref url) = args.connect {
        settings.endpoint = Some(url.clone());
    }
    if let Some(capacity) = args.capacity {
        settings.buffer_capacity = Some(capacity);
    }
    if let Some(ref interval) = args.ping_interval {
        let interval = parse_duration(interval)
            .with_context(|| format!("Invalid ping interval: {}", interval))?;
        settings.set_ping_interval(interval)?;
    }
    if args.no_reconnect {
        settings.reconnect.enabled = false;
    }

    Ok(settings)
}

/// Pick the record source from the arguments, falling back to the configured endpoint.
fn create_source(args: &Args, settings: &Settings) -> Result<Box<dyn RecordSource>> {
    if args.stdin {
        return Ok(Box::new(StreamSource::spawn(tokio::io::stdin(), "stdin")));
    }
    if let Some(ref path) = args.file {
        return Ok(Box::new(FileSource::new(path)));
    }
    match settings.endpoint {
        Some(ref url) => Ok(Box::new(WebSocketSource::spawn(url, settings.websocket_options()))),
        None => anyhow::bail!(
            "No data source: pass --connect <url>, --stdin or --file <path>, or set `endpoint` in the configuration"
        ),
    }
}

/// Run the TUI with the given record source
fn run_tui(source: Box<dyn RecordSource>, settings: &Settings) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, settings);
    app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, settings.refresh_interval());

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        let timeout = if app.is_animating(Instant::now()) {
            ANIMATION_FRAME
        } else {
            refresh_interval
        };

        if let Some(event) = events::poll_event(timeout)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, ui::TABS_ROW),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    tracing::info!(records = app.buffer.received(), "dashboard closed");
    Ok(())
}

/// Read every record from a newline-delimited JSON file.
fn read_records(path: &Path) -> Result<Vec<HealthRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut records = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match InboundMessage::parse(line) {
            Ok(InboundMessage::Record(record)) => records.push(record),
            Ok(InboundMessage::Control(_)) => {}
            Err(e) => tracing::warn!(line = number + 1, error = %e, "skipping malformed line"),
        }
    }
    Ok(records)
}

/// Export the dashboard summary of a recorded file
fn export_to_file(input: &Path, export_path: &Path, settings: &Settings) -> Result<()> {
    let records = read_records(input)?;
    let data = DashboardData::from_records(&records, &settings.density);
    write_summary(&data, export_path)?;

    println!(
        "Exported summary of {} records to: {}",
        data.record_count,
        export_path.display()
    );
    Ok(())
}
