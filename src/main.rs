//! marknote service binary.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id → trace → CORS → timeout → body limit
//!                                                              │
//!                                                              ▼
//!                                                     session cookie layer
//!                                                              │
//!                          ┌───────────────────────────────────┼──────────────────────┐
//!                          ▼                                   ▼                      ▼
//!                  POST/GET /text                       POST /errorCheck       POST /rendered
//!                  NoteStore ──▶ SessionStore           GrammarClient ──▶ LanguageTool   renderer
//!                          │                                   │                      │
//!                          └──────────────▶ AppError / JSON / HTML ◀──────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use marknote::config::load_config;
use marknote::observability::{logging, metrics};
use marknote::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "marknote")]
#[command(about = "Session notes, grammar checking and Markdown rendering", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "MARKNOTE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("marknote v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        grammar_url = %config.grammar.url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    shutdown.trigger_on_signals();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
