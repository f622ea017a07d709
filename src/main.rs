//! Title-Scout main entry point
//!
//! This is the command-line interface that starts the title lookup server.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use title_scout::config::{load_config_with_hash, Config};
use title_scout::server::{bind, serve, AppState, TITLE_ROUTE};
use tracing_subscriber::EnvFilter;

/// Title-Scout: concurrent page-title lookups over HTTP
///
/// Serves `GET /I/want/title?address=...`, fetching every requested address
/// in parallel and listing each page's `<title>`.
#[derive(Parser, Debug)]
#[command(name = "title-scout")]
#[command(version = "1.0.0")]
#[command(about = "Concurrent page-title lookup server", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration file
    #[arg(short, long)]
    port: Option<u16>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    tracing::info!(
        "Fetch timeout: {}ms, body cap: {} bytes, max concurrent fetches: {}",
        config.fetcher.timeout_ms,
        config.fetcher.max_body_bytes,
        match config.fetcher.max_concurrent_fetches {
            0 => "unbounded".to_string(),
            n => n.to_string(),
        }
    );

    let state = AppState::from_config(&config).context("failed to build HTTP client")?;
    let listener = bind(&config.server)
        .await
        .with_context(|| {
            format!(
                "failed to bind {}:{}",
                config.server.bind_address, config.server.port
            )
        })?;

    tracing::info!(
        "Server running on http://{}{}",
        listener.local_addr()?,
        TITLE_ROUTE
    );

    serve(listener, state).await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("title_scout=info,tower_http=warn,warn"),
            1 => EnvFilter::new("title_scout=debug,tower_http=debug,info"),
            2 => EnvFilter::new("title_scout=trace,tower_http=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
