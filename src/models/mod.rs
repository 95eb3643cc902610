//! Data models for the Zendesk API.
//!
//! This module contains the ticket creation envelope, attachment upload
//! types, help center query parameters, and response helpers.

mod attachment;
mod common;
mod help_center;
mod ticket;

pub use attachment::*;
pub use common::*;
pub use help_center::*;
pub use ticket::*;
