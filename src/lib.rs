//! # Zendesk gateway
//!
//! An MCP (Model Context Protocol) server that forwards support ticket
//! submissions and help center queries to the Zendesk REST API.
//!
//! ## Features
//!
//! - **Tickets**: Normalize form submissions (flat or labeled-field bodies,
//!   custom fields by ID or by configured name) and create tickets
//! - **Attachments**: Upload files and attach them through one upload token
//! - **Help center**: Categories, sections, articles, search, labels, votes
//! - **Security**: The API token is never logged or exposed in replies
//!
//! ## Architecture
//!
//! - [`config`] - Settings loaded once from environment variables
//! - [`error`] - Error type with token sanitization
//! - [`models`] - Ticket envelope, attachment and help center types
//! - [`normalizer`] - Form parameters to [`TicketRequest`](models::TicketRequest)
//! - [`endpoints`] - Operation to path, query and verb
//! - [`zendesk_client`] - Authenticated HTTP transport and gateway operations
//! - [`relay`] - JSON envelope, redirect and HTML replies
//! - [`server`] - MCP server implementation with tool routing
//! - [`tools`] - Tool input parameter structs
//!
//! ## Failure handling
//!
//! Each inbound call makes at most one outbound call per file or ticket,
//! with a fixed 10 second timeout and no retries. Every failure degrades to
//! a generic `{"success": 0}` reply.
//!
//! ## Example
//!
//! ```ignore
//! use zendesk_gateway::config::Config;
//! use zendesk_gateway::models::HelpCenterQuery;
//! use zendesk_gateway::zendesk_client::ZendeskClient;
//!
//! async fn example() -> Result<(), zendesk_gateway::error::ZendeskError> {
//!     let config = Config::from_env()?;
//!     let client = ZendeskClient::new(&config)?;
//!
//!     let query = HelpCenterQuery::new().with_per_page(Some(10)).with_sideload(true);
//!     if let Some(articles) = client.articles(query).await {
//!         println!("{}", articles);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod relay;
pub mod server;
pub mod tools;
pub mod zendesk_client;
