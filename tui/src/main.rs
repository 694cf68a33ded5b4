//! Aura TUI Entry Point
//!
//! Launches the Aura wellness companion in the terminal.
//!
//! Usage:
//!   aura [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>     Config file (default: ~/.config/aura/config.toml)
//!   -p, --provider <NAME>   ollama | gemini
//!   -m, --model <MODEL>     Model name for the chosen provider
//!       --log-file <FILE>   Log destination (default: ~/.local/state/aura/aura.log)
//!       --seed <N>          Seed games and dashboards for reproducible runs
//!
//! Logs go to a file because the terminal belongs to the UI. Set `RUST_LOG`
//! to change the level.

use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use aura_tui::App;
use companion_core::backend::build_backend;
use companion_core::config::{default_config_path, load_config_from_path, ConfigOverrides, Provider};
use companion_core::LlmResponder;

/// Aura - your personal wellness companion
#[derive(Parser, Debug)]
#[command(name = "aura")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "AURA_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reply provider (ollama, gemini)
    #[arg(short = 'p', long)]
    provider: Option<Provider>,

    /// Model name
    #[arg(short = 'm', long)]
    model: Option<String>,

    /// Log file path
    #[arg(long, env = "AURA_LOG_FILE", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Seed for games and dashboards
    #[arg(long)]
    seed: Option<u64>,
}

/// `$XDG_STATE_HOME/aura/aura.log`, falling back to the data dir
fn default_log_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("aura").join("aura.log"))
}

/// Install the file logger. Without a usable path, logging is off.
fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let Some(path) = path.or_else(default_log_path) else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {parent:?}"))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {path:?}"))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.log_file.clone())?;

    let mut config = load_config_from_path(args.config.clone().or_else(default_config_path))
        .context("Failed to load configuration")?;
    let mut overrides = ConfigOverrides::new();
    if let Some(provider) = args.provider {
        overrides = overrides.with_provider(provider);
    }
    if let Some(model) = args.model.clone() {
        overrides = overrides.with_model(model);
    }
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        provider = %config.provider,
        model = config.model(),
        source = %config.source(),
        "Starting Aura"
    );

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: aura requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin/stdout are piped, or SSH ran without -t.");
        std::process::exit(1);
    }

    let backend = build_backend(&config.backend_config(), config.request_timeout);
    let responder = LlmResponder::new(backend, config.model()).with_temperature(config.temperature);
    responder.check_backend().await;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut app = App::new(&config, Arc::new(responder), rng);

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Aura exited with an error");
    } else if let Some(goodbye) = app.goodbye() {
        println!("\n\x1b[35mAura:\x1b[0m {goodbye}\n");
    }

    result
}
