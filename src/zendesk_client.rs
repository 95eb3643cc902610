//! HTTP client for the Zendesk REST API.
//!
//! This module provides the `ZendeskClient` struct, which performs
//! authenticated calls against the Zendesk API and exposes the gateway
//! operations: ticket creation, attachment upload, and help center queries.
//!
//! # Failure semantics
//!
//! Every call is made once: there is no retry and no backoff. Network
//! failures, timeouts, non-2xx statuses, undecodable bodies and falsy
//! decoded bodies are all logged and surface as `None`. Callers cannot
//! tell them apart.
//!
//! # Security
//!
//! The API token is never logged. All error messages are sanitized before
//! logging.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{redirect, Client, StatusCode};
use serde_json::Value;

use crate::config::Config;
use crate::endpoints::{resolve, Operation};
use crate::error::ZendeskError;
use crate::models::{
    created_ticket_id, is_truthy, upload_token, ApiResponse, AttachmentUpload, HelpCenterQuery,
    TicketRequest, UploadedFile, Vote,
};

/// Per-call timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Maximum number of redirects followed per call.
const MAX_REDIRECTS: usize = 10;

/// User-Agent sent with every call.
const USER_AGENT: &str = "MozillaXYZ/1.0";

/// Maximum length of an error body kept for logging.
const MAX_ERROR_BODY_LEN: usize = 500;

/// HTTP client for the Zendesk API.
///
/// Cloning is cheap; the underlying connection pool is shared.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = ZendeskClient::new(&config)?;
///
/// if let Some(articles) = client.articles(HelpCenterQuery::new().with_sideload(true)).await {
///     println!("{}", articles);
/// }
/// ```
#[derive(Clone)]
pub struct ZendeskClient {
    /// The underlying HTTP client.
    http: Client,

    /// API base URL without trailing slash.
    base_url: String,

    /// Basic-auth username, `{user}/token`.
    auth_user: String,

    /// API token.
    /// SECURITY: Never log this value!
    api_key: String,

    /// Optional prefix for human-readable ticket links.
    ticket_url: Option<String>,
}

impl ZendeskClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, ZendeskError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ZendeskError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_user: format!("{}/token", config.user),
            api_key: config.api_key().to_string(),
            ticket_url: config.ticket_url.clone(),
        })
    }

    /// Returns the API token for sanitizing error messages.
    ///
    /// This should ONLY be used for sanitization, never for logging.
    pub(crate) fn api_key_for_sanitization(&self) -> &str {
        &self.api_key
    }

    /// Returns the human-readable link for a ticket, when a ticket URL
    /// prefix is configured.
    pub fn ticket_link(&self, ticket_id: u64) -> Option<String> {
        self.ticket_url
            .as_ref()
            .map(|prefix| format!("{}{}", prefix, ticket_id))
    }

    /// Validates that an ID is a numeric string.
    ///
    /// IDs are interpolated into paths, so anything else is rejected
    /// before a call is made.
    fn validate_id(id: &str, field_name: &str) -> Result<(), ZendeskError> {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ZendeskError::validation(format!(
                "{} must be a numeric string, got: {:?}",
                field_name,
                id.chars().take(50).collect::<String>()
            )));
        }
        Ok(())
    }

    /// Executes one call and decodes the response.
    ///
    /// This is the transport: one attempt, Basic auth, JSON decoding.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, timeout, non-2xx status, or a
    /// body that does not decode to a truthy JSON value.
    pub async fn execute(
        &self,
        operation: &Operation,
        body: Option<Vec<u8>>,
    ) -> Result<Value, ZendeskError> {
        let endpoint = resolve(operation);
        let url = format!("{}{}", self.base_url, endpoint.path_and_query());
        let label = endpoint.label();

        tracing::debug!(
            method = %endpoint.method,
            path = %endpoint.path,
            "Making Zendesk API request"
        );

        let mut req = self
            .http
            .request(endpoint.method.clone(), &url)
            .basic_auth(&self.auth_user, Some(&self.api_key))
            .header(CONTENT_TYPE, endpoint.content_type())
            .header(ACCEPT, endpoint.accept());

        if let Some(body) = body {
            req = req.body(body);
        }

        let response = req.send().await.map_err(|e| Self::transport_error(e, &label))?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.handle_http_error(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(e, &label))?;

        tracing::trace!(body = %body, "Zendesk API response");

        Self::decode(&body, &label)
    }

    /// Executes one call, logging any failure and returning `None`.
    async fn call(&self, operation: &Operation, body: Option<Vec<u8>>) -> ApiResponse {
        match self.execute(operation, body).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    error = %e.sanitized_display(&self.api_key),
                    "Zendesk API call failed"
                );
                None
            }
        }
    }

    fn transport_error(e: reqwest::Error, label: &str) -> ZendeskError {
        if e.is_timeout() {
            return ZendeskError::timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS), label);
        }
        ZendeskError::Http(e)
    }

    /// Decodes a response body, treating empty and falsy bodies as errors.
    fn decode(body: &str, label: &str) -> Result<Value, ZendeskError> {
        if body.trim().is_empty() {
            return Err(ZendeskError::empty_response(label));
        }
        let value: Value = serde_json::from_str(body)?;
        if !is_truthy(&value) {
            return Err(ZendeskError::empty_response(label));
        }
        Ok(value)
    }

    /// Converts a non-2xx response into an error with a sanitized,
    /// truncated body.
    async fn handle_http_error(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> ZendeskError {
        let body = response.text().await.unwrap_or_default();
        let body = ZendeskError::sanitize_message(&body, &self.api_key);
        let body = if body.chars().count() > MAX_ERROR_BODY_LEN {
            format!(
                "{}...[truncated]",
                body.chars().take(MAX_ERROR_BODY_LEN).collect::<String>()
            )
        } else {
            body
        };

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Rate limited by Zendesk");
        }

        ZendeskError::HttpStatus { status, body }
    }

    // ========================================================================
    // Tickets
    // ========================================================================

    /// Creates a ticket and returns its ID.
    ///
    /// Returns `None` unless the response decodes and carries a non-zero
    /// `ticket.id`. A partial response is never returned.
    pub async fn submit_ticket(&self, ticket: &TicketRequest) -> Option<u64> {
        let payload = match serde_json::to_vec(&ticket.envelope()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode ticket envelope");
                return None;
            }
        };

        let response = self.call(&Operation::CreateTicket, Some(payload)).await?;

        match created_ticket_id(&response) {
            Some(id) => {
                tracing::info!(ticket_id = id, "Created Zendesk ticket");
                Some(id)
            }
            None => {
                tracing::error!(
                    error = %ZendeskError::MissingField { field: "ticket.id" },
                    "Ticket creation returned no ticket"
                );
                None
            }
        }
    }

    /// Uploads one file and records the token Zendesk assigns.
    ///
    /// The content is consumed by the call.
    pub async fn upload_attachment(
        &self,
        upload: &mut AttachmentUpload,
        chain_token: Option<&str>,
    ) {
        let operation = Operation::UploadAttachment {
            filename: upload.filename.clone(),
            token: chain_token.map(str::to_string),
        };
        let content = std::mem::take(&mut upload.content);

        upload.token = self
            .call(&operation, Some(content))
            .await
            .as_ref()
            .and_then(upload_token);
    }

    /// Uploads files in order and returns the upload token to attach to
    /// the ticket.
    ///
    /// Files without content, or whose content cannot be read, are skipped.
    /// Each upload after the first token is obtained is chained onto that
    /// token.
    pub async fn submit_attachments(&self, files: &[UploadedFile]) -> Option<String> {
        let mut token: Option<String> = None;

        for file in files {
            let Some(path) = &file.path else {
                tracing::debug!(filename = %file.name, "Skipping attachment without content");
                continue;
            };

            let content = match tokio::fs::read(path).await {
                Ok(content) => content,
                Err(source) => {
                    let e = ZendeskError::Attachment {
                        filename: file.name.clone(),
                        source,
                    };
                    tracing::warn!(error = %e, "Skipping unreadable attachment");
                    continue;
                }
            };

            let mut upload = AttachmentUpload {
                filename: file.upload_name(),
                content,
                token: None,
            };
            self.upload_attachment(&mut upload, token.as_deref()).await;

            // Only the first token is kept; later uploads chain onto it.
            if token.is_none() {
                token = upload.token;
            }
        }

        token
    }

    // ========================================================================
    // Help center
    // ========================================================================

    /// Lists help center categories. `query` is passed through verbatim.
    pub async fn categories(&self, query: &str) -> ApiResponse {
        self.call(
            &Operation::ListCategories {
                query: query.to_string(),
            },
            None,
        )
        .await
    }

    /// Lists help center sections. `query` is passed through verbatim.
    pub async fn sections(&self, query: &str) -> ApiResponse {
        self.call(
            &Operation::ListSections {
                query: query.to_string(),
            },
            None,
        )
        .await
    }

    /// Lists article labels. `query` is passed through verbatim.
    pub async fn labels(&self, query: &str) -> ApiResponse {
        self.call(
            &Operation::ListLabels {
                query: query.to_string(),
            },
            None,
        )
        .await
    }

    /// Fetches a single article.
    pub async fn article(&self, article_id: &str, query: HelpCenterQuery) -> ApiResponse {
        self.checked_id(article_id, "article_id")?;
        self.call(
            &Operation::GetArticle {
                article_id: article_id.to_string(),
                query,
            },
            None,
        )
        .await
    }

    /// Lists articles.
    pub async fn articles(&self, query: HelpCenterQuery) -> ApiResponse {
        self.call(&Operation::ListArticles { query }, None).await
    }

    /// Lists the articles of one section.
    pub async fn section_articles(&self, section_id: &str, query: HelpCenterQuery) -> ApiResponse {
        self.checked_id(section_id, "section_id")?;
        self.call(
            &Operation::ListSectionArticles {
                section_id: section_id.to_string(),
                query,
            },
            None,
        )
        .await
    }

    /// Searches articles. The query string is required and passed through
    /// verbatim.
    pub async fn search(&self, query: &str) -> ApiResponse {
        if query.trim().is_empty() {
            tracing::warn!("Search called without a query string");
            return None;
        }
        self.call(
            &Operation::Search {
                query: query.to_string(),
            },
            None,
        )
        .await
    }

    /// Votes an article up or down.
    ///
    /// Any vote value other than `up` or `down` returns `None` without a
    /// network call.
    pub async fn vote(&self, article_id: &str, vote: &str) -> ApiResponse {
        let Some(vote) = Vote::parse(vote) else {
            tracing::debug!(vote = %vote, "Ignoring invalid vote value");
            return None;
        };
        self.checked_id(article_id, "article_id")?;
        self.call(
            &Operation::Vote {
                article_id: article_id.to_string(),
                vote,
            },
            None,
        )
        .await
    }

    fn checked_id(&self, id: &str, field_name: &str) -> Option<()> {
        match Self::validate_id(id, field_name) {
            Ok(()) => Some(()),
            Err(e) => {
                tracing::warn!(error = %e, "Rejected help center request");
                None
            }
        }
    }
}
