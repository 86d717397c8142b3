mod app;
mod config;
mod consent;
mod dialog;
mod error;
mod keylog;
mod keys;
mod session;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use app::Outcome;
use config::AppConfig;

/// Records keystrokes into app_key_log.txt, only while this terminal is
/// focused and only after you agree to it.
#[derive(Parser, Debug)]
#[command(name = "safe_keycap", version, about)]
struct Cli {}

// Diagnostics go to stderr and stay off unless RUST_LOG asks for them, so the
// screen and the key log are never mixed with tracing output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let _cli = Cli::parse();
    init_tracing();

    match app::run(&AppConfig::default())? {
        Outcome::Exited => Ok(ExitCode::SUCCESS),
        Outcome::ConsentRefused => {
            eprintln!("User did not give consent.");
            Ok(ExitCode::from(1))
        }
    }
}
