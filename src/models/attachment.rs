//! Attachment models for the Zendesk Uploads API.

use std::path::PathBuf;

use serde_json::Value;

/// A file handed over by the caller for attaching to a ticket.
///
/// `path` is the temporary location holding the file content. A file
/// without one carries no content and is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original filename as submitted.
    pub name: String,
    /// Temporary storage location, if any.
    pub path: Option<PathBuf>,
}

impl UploadedFile {
    /// Creates a file descriptor. An empty path means no content.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: name.into(),
            path: (!path.as_os_str().is_empty()).then_some(path),
        }
    }

    /// The filename sent to Zendesk.
    pub fn upload_name(&self) -> String {
        sanitize_filename(&self.name)
    }
}

/// One file's upload: the bytes sent and the token Zendesk handed back.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    /// Sanitized filename.
    pub filename: String,
    /// Raw file content.
    pub content: Vec<u8>,
    /// Upload token from the response, when the upload succeeded.
    pub token: Option<String>,
}

/// Replaces spaces with underscores.
pub fn sanitize_filename(name: &str) -> String {
    name.replace(' ', "_")
}

/// Extracts `upload.token` from an upload response.
pub fn upload_token(response: &Value) -> Option<String> {
    response
        .get("upload")?
        .get("token")?
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
