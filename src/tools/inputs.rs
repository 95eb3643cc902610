//! Tool input parameter structs for MCP tools.
//!
//! This module defines the input types for each MCP tool, with
//! JSON Schema derivation for MCP tool discovery.
//!
//! # Input Sanitization
//!
//! Inputs with identifier or query fields implement `sanitize()`, which
//! trims whitespace. Ticket form fields and the `sideload` flag are passed
//! on untouched: only the exact string `"false"` disables sideloading.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::UploadedFile;

/// Helper function to trim an optional string.
fn trim_option(s: &Option<String>) -> Option<String> {
    s.as_ref().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// A file attached to a ticket submission.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AttachmentInput {
    /// Original filename (e.g., "screen shot.png").
    pub name: String,

    /// Local path of the file content. Leave empty for a file slot that
    /// holds no content.
    #[serde(default)]
    pub path: String,
}

impl From<&AttachmentInput> for UploadedFile {
    fn from(input: &AttachmentInput) -> Self {
        UploadedFile::new(input.name.clone(), input.path.trim())
    }
}

/// Input parameters for the submit_ticket tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SubmitTicketInput {
    /// Form fields in submission order: subject, priority
    /// (low/normal/high/urgent), type (question/incident/problem/task),
    /// body (text, or an object of labeled fields), name, email, success,
    /// failed, redirect, mapFieldIds, plus any custom fields.
    pub fields: Map<String, Value>,

    /// Files to attach to the ticket.
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,

    /// Reply with a JSON envelope (default) instead of a redirect target.
    #[serde(default)]
    pub ajax: Option<bool>,
}

impl SubmitTicketInput {
    /// Files to upload, in order.
    pub fn uploaded_files(&self) -> Vec<UploadedFile> {
        self.attachments.iter().map(UploadedFile::from).collect()
    }
}

/// Input parameters for the support_ticket tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SupportTicketInput {
    /// Form fields: subject, priority, type, comment (the ticket body),
    /// name, email, plus any configured custom fields.
    pub fields: Map<String, Value>,

    /// Files to attach to the ticket.
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
}

impl SupportTicketInput {
    /// Files to upload, in order.
    pub fn uploaded_files(&self) -> Vec<UploadedFile> {
        self.attachments.iter().map(UploadedFile::from).collect()
    }
}

/// Input parameters for tools that pass a query string straight through
/// (categories, sections, labels, search).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// Raw query string forwarded to Zendesk (e.g., "per_page=10&sort_by=position").
    #[serde(default)]
    pub query: Option<String>,
}

impl QueryInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            query: trim_option(&self.query),
        }
    }
}

/// Input parameters for the article tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ArticleInput {
    /// Numeric ID of the article.
    pub article_id: String,

    /// Pass "false" to skip sideloading sections and categories.
    #[serde(default)]
    pub sideload: Option<String>,
}

impl ArticleInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            article_id: self.article_id.trim().to_string(),
            sideload: self.sideload,
        }
    }
}

/// Input parameters for the articles tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ArticlesInput {
    /// Page number (1-based).
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of articles per page.
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Pass "false" to skip sideloading sections and categories.
    #[serde(default)]
    pub sideload: Option<String>,
}

impl ArticlesInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            page: self.page,
            per_page: self.per_page,
            sideload: self.sideload,
        }
    }
}

/// Input parameters for the section_articles tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SectionArticlesInput {
    /// Numeric ID of the section.
    pub section_id: String,

    /// Page number (1-based).
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of articles per page.
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Pass "false" to skip sideloading sections and categories.
    #[serde(default)]
    pub sideload: Option<String>,
}

impl SectionArticlesInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            section_id: self.section_id.trim().to_string(),
            page: self.page,
            per_page: self.per_page,
            sideload: self.sideload,
        }
    }
}

/// Input parameters for the vote tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VoteInput {
    /// Numeric ID of the article.
    pub article_id: String,

    /// "up" or "down".
    pub vote: String,
}

impl VoteInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            article_id: self.article_id.trim().to_string(),
            vote: self.vote.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sideload_enabled;

    #[test]
    fn test_submit_ticket_input_keeps_field_order() {
        let json = r#"{
            "fields": {
                "subject": "Help",
                "body": {"orderNumber": "123", "notes": "hello"},
                "25004123": "VIP"
            }
        }"#;
        let input: SubmitTicketInput = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = input.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["subject", "body", "25004123"]);
        assert!(input.attachments.is_empty());
        assert!(input.ajax.is_none());
    }

    #[test]
    fn test_attachment_input_conversion() {
        let json = r#"{
            "fields": {"body": "x"},
            "attachments": [
                {"name": "a b.png", "path": "/tmp/upload1"},
                {"name": "empty.txt"}
            ]
        }"#;
        let input: SubmitTicketInput = serde_json::from_str(json).unwrap();
        let files = input.uploaded_files();
        assert_eq!(files.len(), 2);
        assert!(files[0].path.is_some());
        assert_eq!(files[0].upload_name(), "a_b.png");
        assert!(files[1].path.is_none());
    }

    #[test]
    fn test_articles_input_sanitize_keeps_sideload_verbatim() {
        let json = r#"{"page": 2, "sideload": " false "}"#;
        let input: ArticlesInput =
            serde_json::from_str::<ArticlesInput>(json).unwrap().sanitize();
        assert_eq!(input.page, Some(2));
        assert_eq!(input.per_page, None);
        assert_eq!(input.sideload.as_deref(), Some(" false "));
        assert!(sideload_enabled(input.sideload.as_deref()));
    }

    #[test]
    fn test_only_exact_false_disables_sideload() {
        for raw in [" false ", "FALSE", "False", "0", ""] {
            let input = SectionArticlesInput {
                section_id: " 42 ".to_string(),
                page: None,
                per_page: None,
                sideload: Some(raw.to_string()),
            }
            .sanitize();
            assert_eq!(input.section_id, "42");
            assert!(sideload_enabled(input.sideload.as_deref()), "{raw:?}");
        }

        let input = ArticleInput {
            article_id: "7".to_string(),
            sideload: Some("false".to_string()),
        }
        .sanitize();
        assert!(!sideload_enabled(input.sideload.as_deref()));
    }

    #[test]
    fn test_query_input_sanitize() {
        let input = QueryInput {
            query: Some("   ".to_string()),
        }
        .sanitize();
        assert!(input.query.is_none());
    }

    #[test]
    fn test_vote_input() {
        let json = r#"{"article_id": " 42 ", "vote": "up"}"#;
        let input: VoteInput = serde_json::from_str::<VoteInput>(json).unwrap().sanitize();
        assert_eq!(input.article_id, "42");
        assert_eq!(input.vote, "up");
    }
}
