//! Trinity CLI: binary entry point and terminal session management.
//!
//! The CLI bridges [`trinity_engine`] (page state) and [`trinity_tui`]
//! (rendering), with RAII terminal management that restores the terminal on
//! every exit path.
//!
//! ```text
//! main() -> load config -> UiMode::Full     -> TerminalSession -> run_page()
//!                       -> UiMode::Headless -> run_headless() -> stdout
//! ```
//!
//! # Event loop
//!
//! The full-screen page renders on a fixed 16ms cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`trinity_tui::InputPump`])
//! 3. Apply finished background actions (`app.tick()`)
//! 4. Render frame

use std::{
    env,
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    process::ExitCode,
    sync::Mutex,
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use trinity_config::{ResolvedConfig, TrinityConfig};
use trinity_engine::{App, inspector_from_config, run_headless};
use trinity_tui::{InputPump, draw, handle_events};
use trinity_types::UiMode;

const UI_ENV: &str = "TRINITY_UI";
const FRAME_DURATION: Duration = Duration::from_millis(16);

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than write over the page.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => warnings.push(format!(
                "Failed to open log file {}: {e}",
                candidate.display()
            )),
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = trinity_config::app_dir() {
        candidates.push(dir.join("logs").join("trinity.log"));
    }
    candidates.push(PathBuf::from(".trinity").join("logs").join("trinity.log"));
    candidates
}

/// The config file wins; `TRINITY_UI` applies only when it leaves `ui` unset.
fn ui_mode(config: Option<&TrinityConfig>, resolved: &ResolvedConfig) -> UiMode {
    let configured = config
        .and_then(|c| c.app.as_ref())
        .is_some_and(|app| app.ui.is_some());
    if configured {
        return resolved.ui_mode;
    }
    match env::var(UI_ENV) {
        Ok(raw) => raw.parse::<UiMode>().unwrap_or_else(|err| {
            tracing::warn!("Ignoring {UI_ENV}: {err}");
            resolved.ui_mode
        }),
        Err(_) => resolved.ui_mode,
    }
}

/// Raw mode plus alternate screen, restored on drop.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                Err(err.into())
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let config = TrinityConfig::load().context("loading configuration")?;
    let defaults = TrinityConfig::default();
    let resolved = ResolvedConfig::resolve(config.as_ref().unwrap_or(&defaults))
        .context("resolving configuration")?;
    tracing::info!(model = %resolved.model_url, "Configuration resolved");

    match ui_mode(config.as_ref(), &resolved) {
        UiMode::Headless => {
            let mut inspector = inspector_from_config(&resolved)?;
            let report = run_headless(&mut inspector).await;
            print!("{}", report.render());
            Ok(if report.succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        UiMode::Full => {
            let mut app = App::from_config(&resolved)?;
            let result = {
                let mut session = TerminalSession::new()?;
                run_page(&mut session.terminal, &mut app).await
            };
            if let Err(err) = result {
                eprintln!("Error: {err:?}");
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_page<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    app.mount();

    let result: Result<()> = loop {
        frames.tick().await;

        match handle_events(app, &mut input) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        app.tick();

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
