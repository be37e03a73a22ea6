//! Reversi network client entry point.
//!
//! Connects to a Reversi server, mirrors the match into a [`BoardModel`], and
//! drives it from the terminal.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  ├─ Cli::parse() + load_or_default()   -- arguments layered over TOML
//!  ├─ NetworkClient::connect()           -- spawns the receive loop thread
//!  ├─ render thread                      -- model.watch() → console::render
//!  └─ stdin loop                         -- "row col" → PlayMoveUseCase
//! ```
//!
//! The render thread owns all printing of the board, so the receive loop
//! never blocks on the terminal.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reversi_client::application::{MoveRequestOutcome, MoveSubmitter, PlayMoveUseCase};
use reversi_client::infrastructure::config::{load_or_default, ClientConfig};
use reversi_client::infrastructure::console::{self, ConsoleCommand};
use reversi_client::infrastructure::network::NetworkClient;
use reversi_core::BoardModel;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Play Reversi against a remote server from the terminal.
#[derive(Debug, Parser)]
#[command(name = "reversi-client", about = "Terminal client for a Reversi game server", version)]
struct Cli {
    /// Server host name or IP address.  Overrides `[server] host`.
    host: Option<String>,

    /// Server TCP port.  Overrides `[server] port`.
    port: Option<u16>,

    /// Optional TOML configuration file.
    #[arg(long, env = "REVERSI_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset.  Overrides `[logging] level`.
    #[arg(long)]
    log_level: Option<String>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Loads the config file (if any) and applies command-line overrides.
    fn into_config(self) -> anyhow::Result<ClientConfig> {
        let mut config = load_or_default(self.config.as_deref())
            .context("failed to load configuration")?;
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let print_config = cli.print_config;
    let config = cli.into_config()?;

    if print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Reversi client starting");

    let model = Arc::new(BoardModel::new());
    let changes = model.watch();

    let client = Arc::new(
        NetworkClient::connect(&config.server.host, config.server.port, Arc::clone(&model))
            .with_context(|| {
                format!(
                    "could not reach server at {}:{}",
                    config.server.host, config.server.port
                )
            })?,
    );
    info!(session = %client.session_id(), peer = client.peer(), "connected");

    // ── Render thread ─────────────────────────────────────────────────────────
    let render_model = Arc::clone(&model);
    thread::Builder::new()
        .name("reversi-render".to_string())
        .spawn(move || {
            for _ in changes {
                let snapshot = render_model.snapshot();
                print!("{}", console::render(&snapshot));
                if snapshot.status.is_terminal() {
                    break;
                }
            }
        })
        .context("failed to spawn render thread")?;

    // ── Input loop ────────────────────────────────────────────────────────────
    let submitter: Arc<dyn MoveSubmitter> = client.clone();
    let play = PlayMoveUseCase::new(Arc::clone(&model), submitter);
    println!("{}", console::HELP);

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        if client.is_closed() {
            break;
        }
        match console::parse_command(&line) {
            Some(ConsoleCommand::Quit) => break,
            Some(ConsoleCommand::Help) => println!("{}", console::HELP),
            Some(ConsoleCommand::Move { row, col }) => match play.request(row, col) {
                MoveRequestOutcome::Sent => {}
                MoveRequestOutcome::NotYourTurn => println!("Wait for your turn."),
                MoveRequestOutcome::Invalid => println!("({row}, {col}) is not available."),
                MoveRequestOutcome::Rejected(e) => {
                    warn!("move rejected: {e}");
                    println!("Move not sent: {e}");
                }
            },
            None => println!("{}", console::HELP),
        }
    }

    client.close();
    info!(status = ?model.status(), "Reversi client stopped");
    Ok(())
}
