use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use inlong_audit::config::Settings;
use inlong_audit::data::{AuditId, Baseline, QueryWindow, TimeStaticsDim, ViewOptions};
use inlong_audit::{
    events, logging, ui, AccessBackend, App, AuditView, DataSource, FileAccessBackend, FileSource,
    StreamSource,
};

#[derive(Parser, Debug)]
#[command(name = "inlong-audit")]
#[command(about = "Terminal console for InLong audit statistics")]
struct Args {
    /// Path to an audit query result (JSON)
    #[arg(short, long, default_value = "audit.json", conflicts_with_all = ["connect"])]
    file: PathBuf,

    /// Connect to a TCP endpoint streaming query results (host:port)
    #[arg(short, long, conflicts_with_all = ["file"])]
    connect: Option<String>,

    /// Refresh interval in seconds (only used with --file)
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Time dimension: MINUTE, HOUR or DAY
    #[arg(short, long)]
    dim: Option<TimeStaticsDim>,

    /// First day of the query window (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last day of the query window (ignored for MINUTE)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Audit id of the reference column for percentage differences
    #[arg(short, long)]
    baseline: Option<AuditId>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Export chart and table to a JSON file and exit
    #[arg(short, long, conflicts_with_all = ["connect"])]
    export: Option<PathBuf>,

    /// Access records (JSON) shown in the access view
    #[arg(short, long)]
    access: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(args.log_file.as_deref())?;

    let settings = Settings::load(args.config.as_deref())
        .with_context(|| "Failed to load settings".to_string())?;

    let mut options = settings.view_options();
    if let Some(id) = args.baseline {
        options.baseline = Baseline::Audit(id);
    }

    let dim = args.dim.or(settings.dim).unwrap_or_default();
    let start_date = args
        .start_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let window = QueryWindow {
        start_date,
        end_date: args.end_date.unwrap_or(start_date),
        time_statics_dim: dim,
    };
    window.validate()?;
    info!(
        start = %window.start_date,
        end = %window.effective_end(),
        dim = %window.time_statics_dim,
        "query window"
    );

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return export_to_file(&args.file, &export_path, &options, &window);
    }

    let access = match args.access {
        Some(ref path) => Some(Box::new(FileAccessBackend::open(path)?) as Box<dyn AccessBackend>),
        None => None,
    };

    // Handle TCP connection mode
    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, options, window, access);
    }

    // Default: file-based mode
    let source = Box::new(FileSource::new(&args.file));
    run_tui(source, options, window, access, Duration::from_secs(args.refresh))
}

/// Run with a TCP stream data source
fn run_with_tcp(
    addr: &str,
    options: ViewOptions,
    window: QueryWindow,
    access: Option<Box<dyn AccessBackend>>,
) -> Result<()> {
    // The runtime must outlive the TUI: the reader task runs on it.
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                println!("Connected!");
                Ok(Box::new(StreamSource::spawn(stream, addr)) as Box<dyn DataSource>)
            }
            Err(e) => {
                error!(%addr, error = %e, "connection failed");
                Err(anyhow::anyhow!("Failed to connect to {}: {}", addr, e))
            }
        }
    })?;

    // For TCP, we poll continuously (no refresh interval needed)
    run_tui(source, options, window, access, Duration::from_millis(100))
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    options: ViewOptions,
    window: QueryWindow,
    access: Option<Box<dyn AccessBackend>>,
    refresh_interval: Duration,
) -> Result<()> {
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
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, options, window);
    if let Some(backend) = access {
        app = app.with_access(backend);
    }
    let _ = app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

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

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Export chart series and table rows for one query result to a JSON file
fn export_to_file(
    input: &Path,
    export_path: &Path,
    options: &ViewOptions,
    window: &QueryWindow,
) -> Result<()> {
    let view = AuditView::load(input, options)?;

    let mut export = view.to_export();
    if let Some(obj) = export.as_object_mut() {
        obj.insert("query".to_string(), serde_json::to_value(window)?);
    }

    let json = serde_json::to_string_pretty(&export)?;
    std::fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    info!(path = %export_path.display(), "exported audit view");
    println!("Exported audit view to: {}", export_path.display());
    Ok(())
}
