//! chatplan - chat transcript to place plan
//!
//! **Module Identity:**
//! - Name: chatplan
//! - Default port: 5730
//!
//! Serves a three-page web flow: upload a chat transcript, refine the
//! keywords a language model found in it, then review the places a search
//! provider returned for the generated queries.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};

use chatplan_app::config::resolve_credentials;
use chatplan_app::services::{GooglePlacesClient, OpenAiClient};
use chatplan_app::AppState;
use chatplan_common::config::{load_toml_config, resolve_config_path};
use chatplan_common::logging::init_tracing;

/// Command-line arguments for chatplan
#[derive(Parser, Debug)]
#[command(name = "chatplan")]
#[command(about = "Chat transcript to place plan web app")]
#[command(version)]
struct Args {
    /// Path to chatplan.toml (default: ~/.config/chatplan/chatplan.toml)
    #[arg(short, long, env = "CHATPLAN_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind (overrides TOML)
    #[arg(short, long, env = "CHATPLAN_BIND")]
    bind: Option<String>,

    /// Port to listen on (overrides TOML)
    #[arg(short, long, env = "CHATPLAN_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // TOML first: it carries the log level
    let config_path = resolve_config_path(args.config.as_deref());
    let toml_config = load_toml_config(config_path.as_deref())?;

    init_tracing(&toml_config.logging);

    info!("Starting chatplan v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Build: {} ({}) {}",
        env!("GIT_HASH"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TIMESTAMP")
    );
    match &config_path {
        Some(path) if path.exists() => info!("Config: {}", path.display()),
        Some(path) => warn!("Config file not found at {}, using defaults", path.display()),
        None => warn!("No config directory available, using defaults"),
    }

    let credentials = match resolve_credentials(&toml_config) {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("{}", e);
            return Err(anyhow::anyhow!("Missing API credentials"));
        }
    };

    let llm = OpenAiClient::new(credentials.openai_api_key.clone(), &toml_config.llm)
        .map_err(|e| anyhow::anyhow!("Failed to create language-model client: {}", e))?;
    info!("Language model: {} via {}", llm.model(), toml_config.llm.base_url);

    let places = GooglePlacesClient::new(credentials.google_maps_api_key.clone(), &toml_config.places)
        .map_err(|e| anyhow::anyhow!("Failed to create place-search client: {}", e))?;
    info!("Place search: {}", toml_config.places.base_url);

    let state = AppState::new(Arc::new(llm), Arc::new(places));
    let session_ttl = Duration::from_secs(toml_config.server.session_ttl_secs);
    match state.sessions.spawn_sweeper(session_ttl) {
        Some(_) => info!("Session idle TTL: {}s", session_ttl.as_secs()),
        None => warn!("Session expiry disabled (session_ttl_secs = 0)"),
    }
    let app = chatplan_app::build_router(state);

    let bind = args.bind.unwrap_or(toml_config.server.bind);
    let port = args.port.unwrap_or(toml_config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
