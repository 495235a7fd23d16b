//! chess-cli - two players, one keyboard.
//!
//! Reads moves from standard input, prints the board after every move and
//! stops at checkmate or stalemate.

mod command;
mod config;
mod session;

use anyhow::Context;
use chess_core::Color;
use chess_rules::Game;
use clap::Parser;
use config::CliConfig;
use session::Session;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Two-player chess in the terminal.
#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Two-player chess in the terminal")]
struct Args {
    /// Path to the configuration file (defaults to ./chess.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "chess_rules=trace"
    #[arg(long)]
    log_level: Option<String>,

    /// Do not list legal destinations with `moves`
    #[arg(long)]
    no_hints: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = CliConfig::load(args.config.as_deref()).context("loading configuration")?;
    init_logging(args.log_level.as_deref(), &config);

    tracing::info!(?config, "starting chess-cli");
    let hints = config.show_hints && !args.no_hints;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(Game::new(), stdin.lock(), stdout.lock(), &config, hints)?;
    let status = session.run().context("terminal I/O failed")?;

    let game = session.into_game();
    tracing::info!(
        ?status,
        white_captures = game.captured_pieces(Color::White).len(),
        black_captures = game.captured_pieces(Color::Black).len(),
        "session finished"
    );
    Ok(())
}

/// Installs the fmt subscriber on stderr.
///
/// `--log-level` wins, then `RUST_LOG`, then the configured level.
fn init_logging(flag: Option<&str>, config: &CliConfig) {
    let filter = match flag {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
