use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use netwatch::{
    events, ui, App, HttpProber, ProbeScheduler, Prober, RouteSignal, Settings, SettingsOverrides,
};

#[derive(Parser, Debug)]
#[command(name = "netwatch")]
#[command(about = "Shows whether this machine is online, with a history of status changes")]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// URL to probe for reachability
    #[arg(short, long)]
    url: Option<String>,

    /// Time between probes (e.g., "10s", "500ms")
    #[arg(short, long)]
    interval: Option<String>,

    /// Probe timeout; must be shorter than the interval (e.g., "5s")
    #[arg(short, long)]
    timeout: Option<String>,

    /// Log filter directive (overrides the settings file, not RUST_LOG)
    #[arg(long)]
    log_filter: Option<String>,

    /// Append logs to this file (the TUI owns the terminal otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Probe once, print "online" or "offline" and exit (0 = online)
    #[arg(long)]
    once: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let overrides = SettingsOverrides {
        probe_url: args.url.clone(),
        poll_interval: args.interval.clone(),
        probe_timeout: args.timeout.clone(),
        log_filter: args.log_filter.clone(),
    };
    let settings = Settings::load(args.config.as_deref(), &overrides)?;

    init_logging(&settings.log_filter, args.log_file.as_deref(), args.once)?;

    let prober = HttpProber::builder()
        .url(settings.probe_url.clone())
        .timeout(settings.probe_timeout)
        .build()?;

    // Handle one-shot mode (non-interactive)
    if args.once {
        return run_once(&prober);
    }

    run_with_scheduler(prober, &settings)
}

/// Configure `tracing` output.
///
/// Logs go to `log_file` if given, to stderr in one-shot mode, and nowhere
/// otherwise since the TUI owns the terminal.
fn init_logging(filter: &str, log_file: Option<&Path>, once: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    if let Some(path) = log_file {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if once {
        tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(io::stderr).init();
    }

    Ok(())
}

/// Probe once and report the result on stdout.
fn run_once(prober: &HttpProber) -> Result<ExitCode> {
    let rt = tokio::runtime::Runtime::new()?;

    match rt.block_on(prober.probe()) {
        Ok(()) => {
            println!("online");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::info!("probe failed: {}", e);
            println!("offline");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Start the scheduler in a background runtime and run the TUI on this thread.
fn run_with_scheduler(prober: HttpProber, settings: &Settings) -> Result<ExitCode> {
    // Build a tokio runtime; its worker threads drive the scheduler while the TUI blocks here
    let rt = tokio::runtime::Runtime::new()?;

    let target = prober.target().to_string();
    let (handle, signal) = rt.block_on(async {
        let signal = RouteSignal::spawn(settings.signal_interval);
        let handle = ProbeScheduler::new(Arc::new(prober))
            .poll_interval(settings.poll_interval)
            .spawn(&signal);
        (handle, signal)
    });

    let app = App::new(handle.feed(), handle.control(), target, settings.poll_interval);
    let result = run_tui(app);

    // Release the repeating timer, any in-flight probe and the signal watcher
    rt.block_on(handle.shutdown());
    drop(signal);

    result.map(|()| ExitCode::SUCCESS)
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
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
        let _ = leave_terminal(&mut io::stdout());
        original_hook(panic);
    }));

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    leave_terminal(terminal.backend_mut())?;
    terminal.show_cursor()?;

    result
}

/// Undo `EnterAlternateScreen` and `EnableMouseCapture`.
fn leave_terminal<W: io::Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, DisableMouseCapture)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.refresh();

        if let Some(title) = app.take_pending_title() {
            execute!(terminal.backend_mut(), SetTitle(title))?;
        }

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(200))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}
