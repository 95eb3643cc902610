//! Error types for the Zendesk gateway.
//!
//! This module defines `ZendeskError`, the error type used inside the
//! gateway. Errors never cross the gateway boundary: the public operations
//! on [`ZendeskClient`](crate::zendesk_client::ZendeskClient) log them and
//! degrade to an absent result.
//!
//! # Security
//!
//! All error messages are sanitized to ensure the API token is never leaked
//! in logs. Use `sanitize_message()` when constructing messages from
//! external sources.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all gateway operations.
#[derive(Error, Debug)]
pub enum ZendeskError {
    /// Configuration error - missing or invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP response returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The (truncated) response body.
        body: String,
    },

    /// Request timed out.
    #[error("request timed out after {duration:?} ({operation})")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response decoded to an empty or falsy value.
    #[error("empty response from {operation}")]
    EmptyResponse {
        /// The operation that returned nothing usable.
        operation: String,
    },

    /// A decoded response lacks a field the caller depends on.
    #[error("response is missing {field}")]
    MissingField {
        /// Dotted path of the missing field (e.g. `ticket.id`).
        field: &'static str,
    },

    /// An uploaded file could not be read from its temporary location.
    #[error("could not read attachment {filename}: {source}")]
    Attachment {
        /// Original filename of the attachment.
        filename: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ZendeskError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        ZendeskError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ZendeskError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ZendeskError::Validation(message.into())
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        ZendeskError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates an empty-response error.
    pub fn empty_response(operation: impl Into<String>) -> Self {
        ZendeskError::EmptyResponse {
            operation: operation.into(),
        }
    }

    /// Sanitizes a message by replacing every occurrence of the API token
    /// with `[REDACTED]`.
    #[must_use]
    pub fn sanitize_message(message: &str, api_key: &str) -> String {
        if api_key.is_empty() {
            return message.to_string();
        }
        message.replace(api_key, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, api_key: &str) -> String {
        Self::sanitize_message(&self.to_string(), api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_error() {
        let err = ZendeskError::missing_env("ZENDESK_API_KEY");
        assert!(err.to_string().contains("ZENDESK_API_KEY"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_validation_error() {
        let err = ZendeskError::validation("ticket body is empty");
        assert_eq!(err.to_string(), "validation error: ticket body is empty");
    }

    #[test]
    fn test_timeout_error() {
        let err = ZendeskError::timeout(Duration::from_secs(10), "POST /tickets.json");
        let msg = err.to_string();
        assert!(msg.contains("timed out"));
        assert!(msg.contains("10s"));
        assert!(msg.contains("/tickets.json"));
    }

    #[test]
    fn test_missing_field_error() {
        let err = ZendeskError::MissingField { field: "ticket.id" };
        assert_eq!(err.to_string(), "response is missing ticket.id");
    }

    #[test]
    fn test_sanitize_message_removes_api_key() {
        let api_key = "zd_token_12345";
        let message = format!("request to agent@example.com/token:{} failed", api_key);
        let sanitized = ZendeskError::sanitize_message(&message, api_key);
        assert!(!sanitized.contains(api_key));
        assert!(sanitized.contains("[REDACTED]"));
    }

    #[test]
    fn test_sanitize_message_empty_key() {
        let message = "Some error message";
        assert_eq!(ZendeskError::sanitize_message(message, ""), message);
    }

    #[test]
    fn test_sanitized_display() {
        let err = ZendeskError::HttpStatus {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: "bad credentials for secret123".to_string(),
        };
        let display = err.sanitized_display("secret123");
        assert!(display.contains("401"));
        assert!(!display.contains("secret123"));
    }
}
