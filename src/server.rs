//! MCP server implementation for the Zendesk gateway.
//!
//! This module defines the `ZendeskServer` struct that implements the MCP
//! `ServerHandler` trait. Each tool mirrors one plugin action and returns
//! the rendered caller-facing reply.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};

use crate::config::FieldMapping;
use crate::endpoints::passthrough_query;
use crate::error::ZendeskError;
use crate::models::{sideload_enabled, CustomFields, HelpCenterQuery, UploadedFile};
use crate::normalizer::{collect_custom_fields, normalize_ticket, CustomFieldMode, FormParams};
use crate::relay::{help_center_reply, support_ticket_html, ticket_reply, Reply, SubmitControls};
use crate::tools::{
    ArticleInput, ArticlesInput, QueryInput, SectionArticlesInput, SubmitTicketInput,
    SupportTicketInput, VoteInput,
};
use crate::zendesk_client::ZendeskClient;

/// The Zendesk gateway MCP server.
#[derive(Clone)]
pub struct ZendeskServer {
    /// Zendesk client for API operations.
    client: ZendeskClient,
    /// Named field to custom field ID mappings.
    field_map: Vec<FieldMapping>,
    /// Tool router for MCP tool dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ZendeskServer {
    /// Creates a new server instance.
    ///
    /// # Arguments
    ///
    /// * `client` - The Zendesk client for API operations
    /// * `field_map` - Custom field mappings used in config-mapped mode
    pub fn new(client: ZendeskClient, field_map: Vec<FieldMapping>) -> Self {
        Self {
            client,
            field_map,
            tool_router: Self::tool_router(),
        }
    }

    /// Returns "pong"; used to verify the server is running.
    #[tool(description = "Test connectivity to the Zendesk gateway MCP server. Returns 'pong' if the server is running correctly.")]
    fn ping(&self) -> String {
        tracing::debug!("ping tool called");
        "pong".to_string()
    }

    /// Submit a support ticket.
    ///
    /// The body may be flat text or an object of labeled fields. Custom
    /// fields come from numeric field names when `mapFieldIds` is set,
    /// otherwise from the configured field map.
    #[tool(description = "Submit a Zendesk support ticket from form fields (subject, priority, type, body, name, email, custom fields) with optional file attachments. Returns {success, ticketId, msg} or a redirect target.")]
    async fn submit_ticket(
        &self,
        Parameters(input): Parameters<SubmitTicketInput>,
    ) -> Result<String, String> {
        tracing::debug!(
            fields = input.fields.len(),
            attachments = input.attachments.len(),
            "submit_ticket tool called"
        );

        let controls = SubmitControls::from_params(&input.fields);
        let mode = CustomFieldMode::from_params(&input.fields);
        let custom_fields = collect_custom_fields(&input.fields, mode, &self.field_map);

        let ticket_id = self
            .create_ticket(&input.fields, "body", custom_fields, &input.uploaded_files())
            .await;

        let reply = ticket_reply(ticket_id, &controls, input.ajax.unwrap_or(true));
        Ok(reply.render())
    }

    /// Submit a ticket from the legacy embedded support form.
    ///
    /// Uses `comment` as the body and the configured field map for custom
    /// fields. Replies with an HTML snippet.
    #[tool(description = "Submit a Zendesk support ticket from the legacy embedded form (comment is the ticket body). Returns an HTML success or error snippet.")]
    async fn support_ticket(
        &self,
        Parameters(input): Parameters<SupportTicketInput>,
    ) -> Result<String, String> {
        tracing::debug!(fields = input.fields.len(), "support_ticket tool called");

        let custom_fields =
            collect_custom_fields(&input.fields, CustomFieldMode::ConfigMapped, &self.field_map);

        let ticket_id = self
            .create_ticket(&input.fields, "comment", custom_fields, &input.uploaded_files())
            .await;

        let link = ticket_id.and_then(|id| self.client.ticket_link(id));
        Ok(Reply::Html(support_ticket_html(ticket_id, link.as_deref())).render())
    }

    /// List help center categories.
    #[tool(description = "List Zendesk help center categories. The optional query string is forwarded as-is.")]
    async fn categories(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "categories tool called");

        let data = self
            .client
            .categories(&passthrough_query(input.query.as_deref()))
            .await;
        Ok(help_center_reply(data).render())
    }

    /// List help center sections.
    #[tool(description = "List Zendesk help center sections (category sub-divisions). The optional query string is forwarded as-is.")]
    async fn sections(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "sections tool called");

        let data = self
            .client
            .sections(&passthrough_query(input.query.as_deref()))
            .await;
        Ok(help_center_reply(data).render())
    }

    /// Get a single help center article.
    #[tool(description = "Get a single Zendesk help center article. Sections and categories are sideloaded unless sideload is \"false\".")]
    async fn article(
        &self,
        Parameters(input): Parameters<ArticleInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(article_id = %input.article_id, "article tool called");

        let query =
            HelpCenterQuery::new().with_sideload(sideload_enabled(input.sideload.as_deref()));
        let data = self.client.article(&input.article_id, query).await;
        Ok(help_center_reply(data).render())
    }

    /// List help center articles.
    #[tool(description = "List Zendesk help center articles with optional page and per_page. Sections and categories are sideloaded unless sideload is \"false\".")]
    async fn articles(
        &self,
        Parameters(input): Parameters<ArticlesInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "articles tool called");

        let query = HelpCenterQuery::new()
            .with_page(input.page)
            .with_per_page(input.per_page)
            .with_sideload(sideload_enabled(input.sideload.as_deref()));
        let data = self.client.articles(query).await;
        Ok(help_center_reply(data).render())
    }

    /// List the articles of one section.
    #[tool(description = "List the articles in one Zendesk help center section with optional page and per_page. Sections and categories are sideloaded unless sideload is \"false\".")]
    async fn section_articles(
        &self,
        Parameters(input): Parameters<SectionArticlesInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(section_id = %input.section_id, "section_articles tool called");

        let query = HelpCenterQuery::new()
            .with_page(input.page)
            .with_per_page(input.per_page)
            .with_sideload(sideload_enabled(input.sideload.as_deref()));
        let data = self.client.section_articles(&input.section_id, query).await;
        Ok(help_center_reply(data).render())
    }

    /// Search help center articles.
    #[tool(description = "Search Zendesk help center articles. The query string (e.g. \"query=reset+password\") is required and forwarded as-is.")]
    async fn search(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "search tool called");

        let data = self
            .client
            .search(&passthrough_query(input.query.as_deref()))
            .await;
        Ok(help_center_reply(data).render())
    }

    /// Vote an article up or down.
    #[tool(description = "Vote a Zendesk help center article up or down. vote must be \"up\" or \"down\".")]
    async fn vote(
        &self,
        Parameters(input): Parameters<VoteInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(article_id = %input.article_id, vote = %input.vote, "vote tool called");

        let data = self.client.vote(&input.article_id, &input.vote).await;
        Ok(help_center_reply(data).render())
    }

    /// List article labels.
    #[tool(description = "List the labels used on Zendesk help center articles. The optional query string is forwarded as-is.")]
    async fn labels(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "labels tool called");

        let data = self
            .client
            .labels(&passthrough_query(input.query.as_deref()))
            .await;
        Ok(help_center_reply(data).render())
    }

    /// Uploads attachments, normalizes the form, and creates the ticket.
    ///
    /// Validation failures are logged and reported as a failed submission.
    async fn create_ticket(
        &self,
        fields: &FormParams,
        body_field: &str,
        custom_fields: CustomFields,
        files: &[UploadedFile],
    ) -> Option<u64> {
        let mut ticket = match normalize_ticket(fields, body_field, custom_fields, None) {
            Ok(ticket) => ticket,
            Err(e) => {
                tracing::warn!(error = %self.sanitize_error(&e), "Rejected ticket submission");
                return None;
            }
        };

        if !files.is_empty() {
            ticket.upload_token = self.client.submit_attachments(files).await;
        }

        self.client.submit_ticket(&ticket).await
    }

    /// Sanitizes an error message to remove the API token.
    fn sanitize_error(&self, error: &ZendeskError) -> String {
        error.sanitized_display(self.client.api_key_for_sanitization())
    }
}

#[tool_handler]
impl ServerHandler for ZendeskServer {
    /// Returns server information for the MCP initialize handshake.
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "The Zendesk gateway submits support tickets and reads the Zendesk help center. \
                 Use submit_ticket (or support_ticket for the legacy form) to open tickets, \
                 categories, sections, articles, section_articles, article and labels to browse \
                 content, search to find articles, and vote to rate them. \
                 Start with 'ping' to verify connectivity."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
