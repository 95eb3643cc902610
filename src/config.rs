//! Configuration management for the Zendesk gateway.
//!
//! Settings are loaded once from environment variables at startup and then
//! passed by reference into the client and server. Nothing reads them
//! through a global.

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::ZendeskError;

/// Maps a named form field to a Zendesk custom field ID.
///
/// Used by the config-mapped custom field mode: when the named field is
/// present and non-empty in a submission, its value is sent as
/// `custom_fields[field_id]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    /// Name of the submitted form field.
    pub field_name: String,
    /// Numeric Zendesk custom field ID.
    pub field_id: String,
}

/// Shape of the optional custom field mapping file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldMapFile {
    #[serde(default)]
    custom_fields: Vec<FieldMapping>,
}

/// Process-wide Zendesk settings.
///
/// The API token is never printed, not even through `Debug`.
#[derive(Clone)]
pub struct Config {
    /// Zendesk API base URL (e.g., `https://acme.zendesk.com/api/v2`).
    pub base_url: String,

    /// Agent e-mail used for token authentication (`{user}/token`).
    pub user: String,

    /// Zendesk API token.
    /// This value must never be logged or included in error messages.
    api_key: String,

    /// Optional prefix for human-readable ticket links.
    pub ticket_url: Option<String>,

    /// Named field to custom field ID mappings.
    pub custom_fields: Vec<FieldMapping>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("api_key", &"[REDACTED]")
            .field("ticket_url", &self.ticket_url)
            .field("custom_fields", &self.custom_fields)
            .finish()
    }
}

impl Config {
    /// Builds a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if the base URL or API key fail
    /// validation.
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ZendeskError> {
        let base_url = Self::validate_base_url(base_url.into())?;
        let api_key = api_key.into();
        Self::validate_api_key(&api_key)?;

        Ok(Config {
            base_url,
            user: user.into(),
            api_key,
            ticket_url: None,
            custom_fields: Vec::new(),
        })
    }

    /// Sets the ticket link prefix. Empty values are ignored.
    pub fn with_ticket_url(mut self, ticket_url: impl Into<String>) -> Self {
        let ticket_url = ticket_url.into();
        self.ticket_url = Some(ticket_url).filter(|u| !u.trim().is_empty());
        self
    }

    /// Sets the custom field mappings.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if any field ID is not numeric.
    pub fn with_custom_fields(mut self, fields: Vec<FieldMapping>) -> Result<Self, ZendeskError> {
        Self::validate_field_mappings(&fields)?;
        self.custom_fields = fields;
        Ok(self)
    }

    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `ZENDESK_URL`: API base URL of the Zendesk account
    /// - `ZENDESK_USER`: agent e-mail used with the API token
    /// - `ZENDESK_API_KEY`: the API token
    ///
    /// # Optional Environment Variables
    ///
    /// - `ZENDESK_TICKET_URL`: prefix for ticket links in HTML replies
    /// - `ZENDESK_FIELD_MAP`: path to a JSON custom field mapping file
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if any required variable is missing
    /// or if values fail validation.
    pub fn from_env() -> Result<Self, ZendeskError> {
        let base_url = Self::get_required_env("ZENDESK_URL")?;
        let user = Self::get_required_env("ZENDESK_USER")?;
        let api_key = Self::get_required_env("ZENDESK_API_KEY")?;

        let mut config = Self::new(base_url, user, api_key)?;

        if let Ok(ticket_url) = env::var("ZENDESK_TICKET_URL") {
            config = config.with_ticket_url(ticket_url);
        }

        if let Ok(path) = env::var("ZENDESK_FIELD_MAP") {
            if !path.trim().is_empty() {
                let fields = Self::load_field_map(Path::new(path.trim()))?;
                config = config.with_custom_fields(fields)?;
            }
        }

        Ok(config)
    }

    /// Returns the API token.
    ///
    /// Only the transport client and error sanitization should call this.
    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Reads the custom field mapping file.
    ///
    /// The file holds `{"customFields": [{"fieldName": ..., "fieldId": ...}]}`.
    pub fn load_field_map(path: &Path) -> Result<Vec<FieldMapping>, ZendeskError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ZendeskError::invalid_config(format!(
                "cannot read custom field map {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse_field_map(&raw)
    }

    fn parse_field_map(raw: &str) -> Result<Vec<FieldMapping>, ZendeskError> {
        let file: FieldMapFile = serde_json::from_str(raw).map_err(|e| {
            ZendeskError::invalid_config(format!("invalid custom field map: {}", e))
        })?;
        Self::validate_field_mappings(&file.custom_fields)?;
        Ok(file.custom_fields)
    }

    fn validate_field_mappings(fields: &[FieldMapping]) -> Result<(), ZendeskError> {
        for field in fields {
            if !crate::normalizer::is_numeric_key(&field.field_id) {
                return Err(ZendeskError::invalid_config(format!(
                    "custom field {} has non-numeric fieldId {:?}",
                    field.field_name, field.field_id
                )));
            }
        }
        Ok(())
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, ZendeskError> {
        env::var(name)
            .map_err(|_| ZendeskError::missing_env(name))
            .and_then(|value| {
                if value.trim().is_empty() {
                    Err(ZendeskError::missing_env(name))
                } else {
                    Ok(value)
                }
            })
    }

    /// Validates and normalizes the base URL.
    fn validate_base_url(url: String) -> Result<String, ZendeskError> {
        let url = url.trim().trim_end_matches('/').to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ZendeskError::invalid_config(
                "ZENDESK_URL must start with http:// or https://",
            ));
        }

        let parsed = Url::parse(&url)
            .map_err(|e| ZendeskError::invalid_config(format!("invalid ZENDESK_URL: {}", e)))?;
        if parsed.host_str().is_none() {
            return Err(ZendeskError::invalid_config("ZENDESK_URL has no host"));
        }

        Ok(url)
    }

    /// Validates the API key is not a placeholder value.
    fn validate_api_key(key: &str) -> Result<(), ZendeskError> {
        let key_lower = key.to_lowercase();
        let placeholder_patterns = ["your_api_key", "your_token", "placeholder", "xxx", "changeme"];

        if placeholder_patterns.iter().any(|p| key_lower.contains(p)) {
            return Err(ZendeskError::invalid_config(
                "ZENDESK_API_KEY appears to be a placeholder value",
            ));
        }

        Ok(())
    }
}
