use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod config;
mod error;
mod feed;
mod layout;
mod models;
mod tui;

use app::App;
use config::Config;
use error::{AppError, Result};
use feed::{decode_item, FeedFetcher, FeedSource};
use tui::{draw, handle_key_event};

/// Appends log lines to the log file. Lines also go to stderr in the headless
/// modes, and whenever the file could not be opened.
struct LogWriter {
    file: Option<std::sync::Arc<std::sync::Mutex<std::fs::File>>>,
    echo_stderr: bool,
}

impl LogWriter {
    fn to_stderr(&self) -> bool {
        self.echo_stderr || self.file.is_none()
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.write_all(buf);
            }
        }
        if self.to_stderr() {
            io::stderr().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
        if self.to_stderr() {
            io::stderr().flush()?;
        }
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            file: self.file.clone(),
            echo_stderr: self.echo_stderr,
        }
    }
}

fn init_logging(path: &Path, echo_stderr: bool) {
    let file = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
        });

    let file = match file {
        Ok(file) => Some(std::sync::Arc::new(std::sync::Mutex::new(file))),
        Err(err) => {
            eprintln!("Warning: unable to open {}: {err}", path.display());
            None
        }
    };

    // Only warnings and errors unless RUST_LOG says otherwise
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(LogWriter { file, echo_stderr })
        .init();
}

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Interactive,
    Dump,
    Check,
}

/// Flags select a headless mode, anything else is an extra feed source.
fn parse_args<I>(args: I, sources: &mut Vec<FeedSource>) -> Result<Mode>
where
    I: IntoIterator<Item = String>,
{
    let mut mode = Mode::Interactive;
    for arg in args {
        match arg.as_str() {
            "--dump" => mode = Mode::Dump,
            "--check" => mode = Mode::Check,
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(AppError::Config(format!(
                    "unknown option {flag:?} (expected --dump, --check or feed sources)"
                )));
            }
            _ => sources.push(arg.parse()?),
        }
    }
    Ok(mode)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let config = Config::load()?;
    let mut sources = config.feed_sources()?;
    let mode = parse_args(std::env::args().skip(1), &mut sources)?;

    init_logging(&config.log_path(), mode != Mode::Interactive);

    match mode {
        Mode::Dump => dump_feed(&config, sources).await,
        Mode::Check => {
            let report = check_sources(&FeedFetcher::new()?, &sources, &mut io::stdout()).await?;
            Ok(if report.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Mode::Interactive => {
            run_interactive(&config, sources).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print the decoded feed in its wire form; report skipped records on stderr.
async fn dump_feed(config: &Config, sources: Vec<FeedSource>) -> Result<ExitCode> {
    let mut app = App::new(config, sources)?;
    app.refresh_blocking().await;

    println!("{}", serde_json::to_string_pretty(&app.feed.items)?);
    for rejected in &app.feed.rejected {
        eprintln!("record {}: {}", rejected.index, rejected.error);
    }

    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Default, PartialEq, Eq)]
struct CheckReport {
    sources: usize,
    failed_sources: usize,
    records: usize,
    invalid: usize,
}

impl CheckReport {
    /// Every source was read and every record decoded.
    fn passed(&self) -> bool {
        self.sources > 0 && self.failed_sources == 0 && self.invalid == 0
    }
}

/// Fetch each source on its own and report the outcome of every record.
async fn check_sources(
    fetcher: &FeedFetcher,
    sources: &[FeedSource],
    out: &mut impl Write,
) -> Result<CheckReport> {
    let mut report = CheckReport {
        sources: sources.len(),
        ..CheckReport::default()
    };

    if sources.is_empty() {
        writeln!(out, "no feed sources given")?;
    }

    for source in sources {
        let records = match fetcher.fetch_records(source).await {
            Ok(records) => records,
            Err(e) => {
                report.failed_sources += 1;
                writeln!(out, "{source}: error  {e}")?;
                continue;
            }
        };

        writeln!(out, "{source}:")?;
        for (index, record) in records.iter().enumerate() {
            match decode_item(record) {
                Ok(item) => writeln!(out, "{index:>4}  ok     {}", item.kind())?,
                Err(e) => {
                    report.invalid += 1;
                    writeln!(out, "{index:>4}  error  {e}")?;
                }
            }
        }
        report.records += records.len();
    }

    writeln!(
        out,
        "{} records, {} invalid, {} of {} sources unreadable",
        report.records, report.invalid, report.failed_sources, report.sources
    )?;
    Ok(report)
}

async fn run_interactive(config: &Config, sources: Vec<FeedSource>) -> Result<()> {
    let mut app = App::new(config, sources)?;
    app.start_refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("Event loop failed: {}", e);
    }
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Poll for a completed refresh
        app.poll_refresh_result();

        // Poll for events with timeout so the refresh task can make progress
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = handle_key_event(key, app.show_help) {
                        if app.handle_action(action)? {
                            return Ok(());
                        }
                    }
                }
                _ => {}
            }
        }
    }
}
