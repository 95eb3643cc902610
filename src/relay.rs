//! Turns gateway results into caller-facing replies.
//!
//! Programmatic callers get a JSON envelope, form posts get a redirect
//! target, and the legacy embedded form gets a fixed HTML snippet. Every
//! failure collapses into the same generic reply with no diagnostic detail.

use serde::Serialize;
use serde_json::Value;

use crate::models::non_empty_text;
use crate::normalizer::FormParams;

/// JSON reply envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// `1` on success, `0` on failure.
    pub success: u8,

    /// ID of the created ticket.
    #[serde(rename = "ticketId", skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<u64>,

    /// Decoded Zendesk response for help center calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Caller-supplied success or failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl Envelope {
    /// A created ticket.
    pub fn ticket_created(ticket_id: u64, msg: Option<String>) -> Self {
        Self {
            success: 1,
            ticket_id: Some(ticket_id),
            data: None,
            msg,
        }
    }

    /// Relayed help center data.
    pub fn data(data: Value) -> Self {
        Self {
            success: 1,
            ticket_id: None,
            data: Some(data),
            msg: None,
        }
    }

    /// A generic failure.
    pub fn failure(msg: Option<String>) -> Self {
        Self {
            success: 0,
            ticket_id: None,
            data: None,
            msg,
        }
    }
}

/// A caller-facing reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// JSON envelope for programmatic callers.
    Json(Envelope),
    /// Redirect target for form posts.
    Redirect(String),
    /// HTML snippet for the legacy embedded form.
    Html(String),
}

impl Reply {
    /// Renders the reply as text.
    ///
    /// Redirects render as `{"redirect": target}`.
    pub fn render(&self) -> String {
        match self {
            Reply::Json(envelope) => serde_json::to_string(envelope)
                .unwrap_or_else(|_| r#"{"success":0}"#.to_string()),
            Reply::Redirect(target) => serde_json::json!({ "redirect": target }).to_string(),
            Reply::Html(html) => html.clone(),
        }
    }
}

/// Control parameters of a ticket submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitControls {
    /// Success message (JSON) or redirect path prefix (form post).
    pub success: Option<String>,
    /// Failure message (JSON) or redirect path (form post).
    pub failed: Option<String>,
}

impl SubmitControls {
    /// Reads `success` and `failed` from form parameters.
    ///
    /// A `redirect` parameter is accepted on the form but never used as a
    /// target: the outcome always picks `success` or `failed`.
    pub fn from_params(params: &FormParams) -> Self {
        Self {
            success: non_empty_text(params.get("success")),
            failed: non_empty_text(params.get("failed")),
        }
    }
}

/// Builds the reply to a ticket submission.
///
/// On success a JSON caller gets `{success: 1, ticketId, msg}` and a form
/// post is redirected to `{success}/{ticketId}` (`/{ticketId}` without a
/// success path). On failure a JSON caller gets `{success: 0, msg}` and a
/// form post is redirected to `failed`, or to an empty target without one.
pub fn ticket_reply(ticket_id: Option<u64>, controls: &SubmitControls, json: bool) -> Reply {
    match (ticket_id, json) {
        (Some(id), true) => Reply::Json(Envelope::ticket_created(id, controls.success.clone())),
        (Some(id), false) => Reply::Redirect(format!(
            "{}/{}",
            controls.success.as_deref().unwrap_or_default(),
            id
        )),
        (None, true) => Reply::Json(Envelope::failure(controls.failed.clone())),
        (None, false) => Reply::Redirect(controls.failed.clone().unwrap_or_default()),
    }
}

/// Builds the HTML snippet for the legacy embedded support form.
///
/// The ticket number links through `ticket_link` when one is available.
pub fn support_ticket_html(ticket_id: Option<u64>, ticket_link: Option<&str>) -> String {
    let Some(id) = ticket_id else {
        return "<p>Error:</p><p>We are sorry but your ticket hasn't been submitted successfully. \
                Please try again or get in touch with us via another method.</p>"
            .to_string();
    };

    let number = match ticket_link {
        Some(link) => format!("<a href='{}' target='_blank'>{}</a>", link, id),
        None => id.to_string(),
    };
    format!(
        "<p>Success:</p><p>Thank you for submitting a ticket with us. Your ticket number is {} \
         and we will get back to you shortly.</p>",
        number
    )
}

/// Builds the reply to a help center query.
pub fn help_center_reply(data: Option<Value>) -> Reply {
    match data {
        Some(data) => Reply::Json(Envelope::data(data)),
        None => Reply::Json(Envelope::failure(None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn controls() -> SubmitControls {
        SubmitControls {
            success: Some("/support/thanks".to_string()),
            failed: Some("/support/failed".to_string()),
        }
    }

    #[test]
    fn test_json_success_envelope() {
        let reply = ticket_reply(Some(35436), &controls(), true);
        assert_eq!(
            reply.render(),
            r#"{"success":1,"ticketId":35436,"msg":"/support/thanks"}"#
        );
    }

    #[test]
    fn test_json_failure_envelope() {
        let reply = ticket_reply(None, &controls(), true);
        assert_eq!(reply.render(), r#"{"success":0,"msg":"/support/failed"}"#);
    }

    #[test]
    fn test_redirect_targets() {
        assert_eq!(
            ticket_reply(Some(12), &controls(), false),
            Reply::Redirect("/support/thanks/12".to_string())
        );
        assert_eq!(
            ticket_reply(None, &controls(), false),
            Reply::Redirect("/support/failed".to_string())
        );
    }

    #[test]
    fn test_redirect_ignores_redirect_param() {
        let params = match json!({"redirect": "/contact"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let controls = SubmitControls::from_params(&params);
        assert_eq!(
            ticket_reply(None, &controls, false),
            Reply::Redirect(String::new())
        );
        assert_eq!(
            ticket_reply(Some(3), &controls, false).render(),
            r#"{"redirect":"/3"}"#
        );
    }

    #[test]
    fn test_controls_from_params() {
        let params = match json!({"success": "ok", "failed": "", "redirect": "/r"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let controls = SubmitControls::from_params(&params);
        assert_eq!(controls.success.as_deref(), Some("ok"));
        assert_eq!(controls.failed, None);
    }

    #[test]
    fn test_support_ticket_html_with_link() {
        let html = support_ticket_html(Some(99), Some("https://acme.zendesk.com/hc/requests/99"));
        assert!(html.starts_with("<p>Success:</p>"));
        assert!(html.contains(
            "<a href='https://acme.zendesk.com/hc/requests/99' target='_blank'>99</a>"
        ));
    }

    #[test]
    fn test_support_ticket_html_plain_and_error() {
        let html = support_ticket_html(Some(99), None);
        assert!(html.contains("Your ticket number is 99 and we will get back to you shortly."));

        let html = support_ticket_html(None, None);
        assert!(html.starts_with("<p>Error:</p>"));
    }

    #[test]
    fn test_help_center_reply() {
        let reply = help_center_reply(Some(json!({"categories": []})));
        assert_eq!(reply.render(), r#"{"success":1,"data":{"categories":[]}}"#);
        assert_eq!(help_center_reply(None).render(), r#"{"success":0}"#);
    }
}
