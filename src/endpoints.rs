//! Maps gateway operations to Zendesk REST endpoints.
//!
//! Paths are relative to the configured API base URL. Resolution is pure:
//! it never validates IDs or touches the network.

use reqwest::Method;

use crate::models::{HelpCenterQuery, Vote};

/// `Content-Type` for JSON calls.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// `Content-Type` for raw file uploads.
pub const BINARY_CONTENT_TYPE: &str = "application/binary";

/// `Accept` header for raw file uploads.
pub const UPLOAD_ACCEPT: &str = "application/json; charset=utf-8";

/// A logical gateway operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create a ticket from a JSON envelope.
    CreateTicket,
    /// Upload one file, optionally chained onto an earlier upload token.
    UploadAttachment {
        /// Filename as sent, already sanitized.
        filename: String,
        /// Token of an earlier upload in the same batch.
        token: Option<String>,
    },
    /// List help center categories.
    ListCategories {
        /// Raw query string passed through as-is.
        query: String,
    },
    /// List help center sections.
    ListSections {
        /// Raw query string passed through as-is.
        query: String,
    },
    /// Fetch one article.
    GetArticle {
        /// Article ID.
        article_id: String,
        /// Sideload parameters.
        query: HelpCenterQuery,
    },
    /// List articles.
    ListArticles {
        /// Paging and sideload parameters.
        query: HelpCenterQuery,
    },
    /// List articles in one section.
    ListSectionArticles {
        /// Section ID.
        section_id: String,
        /// Paging and sideload parameters.
        query: HelpCenterQuery,
    },
    /// Search articles.
    Search {
        /// Raw search query string passed through as-is.
        query: String,
    },
    /// Vote an article up or down.
    Vote {
        /// Article ID.
        article_id: String,
        /// Vote direction.
        vote: Vote,
    },
    /// List article labels.
    ListLabels {
        /// Raw query string passed through as-is.
        query: String,
    },
}

/// How the request body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// JSON (or no body at all).
    Json,
    /// Raw file bytes.
    Binary,
}

/// A concrete REST target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// HTTP verb.
    pub method: Method,
    /// Path relative to the API base URL.
    pub path: String,
    /// Query string without the leading `?`; empty means none.
    pub query: String,
    /// Body encoding.
    pub payload: PayloadKind,
}

impl Endpoint {
    fn new(method: Method, path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: query.into(),
            payload: PayloadKind::Json,
        }
    }

    /// Path plus `?query` when a query is present.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// The `Content-Type` header value.
    pub fn content_type(&self) -> &'static str {
        match self.payload {
            PayloadKind::Json => JSON_CONTENT_TYPE,
            PayloadKind::Binary => BINARY_CONTENT_TYPE,
        }
    }

    /// The `Accept` header value.
    pub fn accept(&self) -> &'static str {
        match self.payload {
            PayloadKind::Json => JSON_CONTENT_TYPE,
            PayloadKind::Binary => UPLOAD_ACCEPT,
        }
    }

    /// Short `METHOD path` label for logs and errors.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Resolves an operation to its endpoint.
pub fn resolve(operation: &Operation) -> Endpoint {
    match operation {
        Operation::CreateTicket => Endpoint::new(Method::POST, "/tickets.json", ""),
        Operation::UploadAttachment { filename, token } => {
            let mut query = format!("filename={}", urlencoding::encode(filename));
            if let Some(token) = token.as_deref().filter(|t| !t.is_empty()) {
                query.push_str("&token=");
                query.push_str(&urlencoding::encode(token));
            }
            Endpoint {
                payload: PayloadKind::Binary,
                ..Endpoint::new(Method::POST, "/uploads.json", query)
            }
        }
        Operation::ListCategories { query } => {
            Endpoint::new(Method::GET, "/help_center/en-us/categories.json", query.as_str())
        }
        Operation::ListSections { query } => {
            Endpoint::new(Method::GET, "/help_center/en-us/sections.json", query.as_str())
        }
        Operation::GetArticle { article_id, query } => Endpoint::new(
            Method::GET,
            format!("/help_center/en-us/articles/{}.json", article_id),
            query.to_query_string(),
        ),
        Operation::ListArticles { query } => Endpoint::new(
            Method::GET,
            "/help_center/en-us/articles.json",
            query.to_query_string(),
        ),
        Operation::ListSectionArticles { section_id, query } => Endpoint::new(
            Method::GET,
            format!("/help_center/en-us/sections/{}/articles.json", section_id),
            query.to_query_string(),
        ),
        Operation::Search { query } => {
            Endpoint::new(Method::GET, "/help_center/articles/search.json", query.as_str())
        }
        Operation::Vote { article_id, vote } => Endpoint::new(
            Method::POST,
            format!("/help_center/articles/{}/{}.json", article_id, vote.as_str()),
            "",
        ),
        Operation::ListLabels { query } => {
            Endpoint::new(Method::GET, "/help_center/articles/labels.json", query.as_str())
        }
    }
}

/// Strips a leading `?` from a passthrough query string.
pub fn passthrough_query(raw: Option<&str>) -> String {
    raw.map(|q| q.trim().trim_start_matches('?').to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_ticket() {
        let endpoint = resolve(&Operation::CreateTicket);
        assert_eq!(endpoint.method, Method::POST);
        assert_eq!(endpoint.path_and_query(), "/tickets.json");
        assert_eq!(endpoint.content_type(), "application/json");
    }

    #[test]
    fn test_upload_first_file() {
        let endpoint = resolve(&Operation::UploadAttachment {
            filename: "screen_shot (1).png".to_string(),
            token: None,
        });
        assert_eq!(endpoint.method, Method::POST);
        assert_eq!(
            endpoint.path_and_query(),
            "/uploads.json?filename=screen_shot%20%281%29.png"
        );
        assert_eq!(endpoint.content_type(), "application/binary");
        assert_eq!(endpoint.accept(), "application/json; charset=utf-8");
    }

    #[test]
    fn test_upload_chained_file() {
        let endpoint = resolve(&Operation::UploadAttachment {
            filename: "log.txt".to_string(),
            token: Some("abc123".to_string()),
        });
        assert_eq!(endpoint.path_and_query(), "/uploads.json?filename=log.txt&token=abc123");
    }

    #[test]
    fn test_passthrough_listings() {
        let endpoint = resolve(&Operation::ListCategories {
            query: "per_page=5".to_string(),
        });
        assert_eq!(endpoint.method, Method::GET);
        assert_eq!(
            endpoint.path_and_query(),
            "/help_center/en-us/categories.json?per_page=5"
        );

        let endpoint = resolve(&Operation::ListSections { query: String::new() });
        assert_eq!(endpoint.path_and_query(), "/help_center/en-us/sections.json");

        let endpoint = resolve(&Operation::ListLabels { query: String::new() });
        assert_eq!(endpoint.path_and_query(), "/help_center/articles/labels.json");
    }

    #[test]
    fn test_get_article_with_sideload() {
        let endpoint = resolve(&Operation::GetArticle {
            article_id: "360012345".to_string(),
            query: HelpCenterQuery::new().with_sideload(true),
        });
        assert_eq!(
            endpoint.path_and_query(),
            "/help_center/en-us/articles/360012345.json?include=sections,categories"
        );
    }

    #[test]
    fn test_list_section_articles() {
        let endpoint = resolve(&Operation::ListSectionArticles {
            section_id: "42".to_string(),
            query: HelpCenterQuery::new().with_page(Some(3)).with_sideload(false),
        });
        assert_eq!(
            endpoint.path_and_query(),
            "/help_center/en-us/sections/42/articles.json?page=3"
        );
    }

    #[test]
    fn test_search_passes_query_verbatim() {
        let endpoint = resolve(&Operation::Search {
            query: "query=reset+password&locale=en-us".to_string(),
        });
        assert_eq!(
            endpoint.path_and_query(),
            "/help_center/articles/search.json?query=reset+password&locale=en-us"
        );
    }

    #[test]
    fn test_vote() {
        let endpoint = resolve(&Operation::Vote {
            article_id: "7".to_string(),
            vote: Vote::Down,
        });
        assert_eq!(endpoint.method, Method::POST);
        assert_eq!(endpoint.path_and_query(), "/help_center/articles/7/down.json");
    }

    #[test]
    fn test_passthrough_query() {
        assert_eq!(passthrough_query(Some("?a=1&b=2")), "a=1&b=2");
        assert_eq!(passthrough_query(Some("a=1")), "a=1");
        assert_eq!(passthrough_query(None), "");
    }
}
