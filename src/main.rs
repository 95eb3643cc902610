//! Zendesk gateway - MCP server for Zendesk tickets and help center content
//!
//! This binary runs as an MCP server using stdio transport, forwarding
//! ticket submissions and help center queries to the Zendesk REST API.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `ZENDESK_URL`: API base URL (e.g., `https://acme.zendesk.com/api/v2`)
//! - `ZENDESK_USER`: agent e-mail used with the API token
//! - `ZENDESK_API_KEY`: the API token
//! - `ZENDESK_TICKET_URL` (optional): prefix for ticket links
//! - `ZENDESK_FIELD_MAP` (optional): path to the custom field mapping file
//!
//! # Usage
//!
//! ```bash
//! ZENDESK_URL=https://acme.zendesk.com/api/v2 ZENDESK_USER=agent@acme.com \
//!     ZENDESK_API_KEY=xxx ./zendesk-gateway
//! ```

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, EnvFilter};

use zendesk_gateway::{config, server, zendesk_client};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // Log to stderr; stdout carries the MCP JSON-RPC stream
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("zendesk_gateway=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting Zendesk gateway v{}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::from_env().context("Failed to load configuration")?;

    tracing::debug!(
        base_url = %config.base_url,
        custom_fields = config.custom_fields.len(),
        "Configuration loaded"
    );

    let client =
        zendesk_client::ZendeskClient::new(&config).context("Failed to create Zendesk client")?;

    let server = server::ZendeskServer::new(client, config.custom_fields.clone());

    tracing::info!("Server initialized, starting stdio transport");

    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })
        .context("Failed to start server")?;

    tracing::info!("Server running, waiting for requests");

    service
        .waiting()
        .await
        .context("Server error during operation")?;

    tracing::info!("Server shutting down");

    Ok(())
}
