//! Fruitbowl - a terminal client for the fruits catalog API.
//!
//! The prompt shows the current route; protected routes require a login,
//! and the session is kept between runs until `logout`.

mod app;
mod input;
mod render;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fruitbowl_core::Config;

use app::App;
use input::parse_command;

/// Log file name inside the cache directory
const LOG_FILE: &str = "fruitbowl.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a file so they never interleave with the prompt. Falls back
/// to stderr if the log directory cannot be created.
fn init_tracing(log_dir: &Path) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if std::fs::create_dir_all(log_dir).is_err() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(filter)
            .init();
        return None;
    }

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load();
    let log_dir = config
        .as_ref()
        .ok()
        .and_then(|c| c.cache_dir().ok())
        .unwrap_or_else(|| PathBuf::from("./cache"));
    let _log_guard = init_tracing(&log_dir);
    info!("Fruitbowl starting");

    let config = config.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });

    let mut app = App::new(config)?;
    app.start().await;

    let result = run(&mut app).await;

    info!("Fruitbowl shutting down");
    result
}

async fn run(app: &mut App) -> Result<()> {
    let stdin = io::stdin();
    loop {
        println!("{}", app.render());
        print!("{}", app.prompt());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            return Ok(());
        }

        match parse_command(&line) {
            Ok(command) => {
                if app.handle(command).await? {
                    return Ok(());
                }
            }
            Err(e) => app.status_message = Some(e.to_string()),
        }
    }
}
