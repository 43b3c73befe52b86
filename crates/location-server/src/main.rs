//! Location MCP server over Streamable HTTP.
//!
//! Serves `get_location_by_id`, `search_locations_by_name` and
//! `get_locations_by_state` at `http://<host>:<port><path>` (default
//! `http://0.0.0.0:8080/mcp`). See `config` for the environment it reads.

mod client;
mod config;
mod format;
mod server;

use std::io::IsTerminal;

use axum::Router;
use clap::Parser;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use client::{LocationClient, LocationClientError};
use config::{ConfigError, ServerConfig};
use server::LocationServer;

#[derive(Parser)]
#[command(name = "location-server")]
#[command(about = "MCP server exposing the auction location directory", long_about = None)]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// HTTP path of the MCP endpoint
    #[arg(long, default_value = "/mcp", value_parser = parse_path)]
    path: String,
}

#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] LocationClientError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn parse_path(raw: &str) -> Result<String, String> {
    if raw.starts_with('/') {
        Ok(raw.to_string())
    } else {
        Err(format!("path must start with '/', got {raw:?}"))
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("location_server=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

async fn run(args: Args) -> Result<(), Error> {
    let config = ServerConfig::from_env()?;
    if config.bearer_token.is_none() {
        warn!("BEARER_TOKEN is not set; directory requests will be sent without credentials");
    }

    let client = LocationClient::new(&config)?;
    let service = StreamableHttpService::new(
        move || Ok(LocationServer::new(client.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = if args.path == "/" {
        Router::new().fallback_service(service)
    } else {
        Router::new().nest_service(&args.path, service)
    };

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        %addr,
        path = %args.path,
        api_base = %config.api_base,
        "location server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("location server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, shutting down"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl+C; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
