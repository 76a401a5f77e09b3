//! Google Analytics MCP Server
//!
//! Bridges the Google Analytics Data API to the Model Context Protocol.

mod api;
mod auth;
mod config;
mod debug;
mod error;
mod hints;
mod property;
mod server;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use crate::api::DataClient;
use crate::auth::OAuth2Client;
use crate::config::Config;
use crate::debug::DebugLogger;
use crate::server::AnalyticsServer;

#[derive(Parser, Debug)]
#[command(name = "google-analytics-mcp")]
#[command(author, version, about = "Google Analytics MCP Server", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Enable debug mode (logs all tool calls)
    #[arg(short, long)]
    debug: bool,
}

/// Logs go to stderr; stdout carries the MCP protocol.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config))?;
    let debug_enabled = args.debug || config.debug;

    init_tracing(debug_enabled);

    let debug = Arc::new(DebugLogger::new(debug_enabled));

    tracing::info!(config = %args.config, "Google Analytics MCP Server starting");
    if config.uses_static_token() {
        tracing::info!("Auth: static access token");
    } else {
        tracing::info!(token_url = %config.token_url, "Auth: OAuth2 refresh token");
    }
    tracing::info!(base_url = %config.api_base_url(), "Data API");
    if let Some(path) = debug.trace_path() {
        tracing::info!(path = %path.display(), "Trace file");
    }

    let auth_client = OAuth2Client::new(config.clone())?;
    let data_client = DataClient::new(config.api_base_url(), auth_client, config.timeout())?;

    let server = AnalyticsServer::new(Arc::new(data_client), debug.clone());

    tracing::debug!("Starting MCP server on stdio transport");

    let service = server.serve(stdio()).await?;
    debug.log("MCP server started, waiting for messages...");

    service.waiting().await?;

    tracing::info!("MCP server shutting down");

    Ok(())
}
