//! MCP tool inputs for the Zendesk gateway.
//!
//! This module contains the input types for the MCP tools that expose
//! ticket submission and help center queries.

mod inputs;

pub use inputs::*;
