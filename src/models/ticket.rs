//! Ticket models for the Zendesk Tickets API.
//!
//! `TicketRequest` is the canonical, validated form of a ticket submission.
//! It serializes into the `{"ticket": {...}}` creation envelope Zendesk
//! expects.

use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::ZendeskError;

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Normal priority (Zendesk's default).
    #[default]
    Normal,
    /// High priority.
    High,
    /// Urgent priority.
    Urgent,
}

impl Priority {
    /// Returns the wire name of the priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = ZendeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(ZendeskError::validation(format!(
                "unknown priority {:?} (expected low, normal, high or urgent)",
                other
            ))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    /// A question.
    Question,
    /// An incident.
    Incident,
    /// A problem.
    Problem,
    /// A task.
    Task,
}

impl FromStr for TicketType {
    type Err = ZendeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" => Ok(TicketType::Question),
            "incident" => Ok(TicketType::Incident),
            "problem" => Ok(TicketType::Problem),
            "task" => Ok(TicketType::Task),
            other => Err(ZendeskError::validation(format!(
                "unknown ticket type {:?} (expected question, incident, problem or task)",
                other
            ))),
        }
    }
}

/// Custom field values keyed by numeric Zendesk field ID.
///
/// Keeps insertion order. Setting an existing ID replaces its value in
/// place. An empty set serializes as `[]` and a non-empty one as an
/// object, which is the envelope shape Zendesk has always received from
/// this integration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFields {
    entries: Vec<(String, String)>,
}

impl CustomFields {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for a field ID.
    pub fn insert(&mut self, field_id: impl Into<String>, value: impl Into<String>) {
        let field_id = field_id.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(id, _)| *id == field_id) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field_id, value)),
        }
    }

    /// Returns the value for a field ID.
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == field_id)
            .map(|(_, value)| value.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no custom fields were collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(field_id, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, v)| (id.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CustomFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = CustomFields::new();
        for (id, value) in iter {
            fields.insert(id, value);
        }
        fields
    }
}

impl Serialize for CustomFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.entries.is_empty() {
            return serializer.serialize_seq(Some(0))?.end();
        }
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

/// The person submitting the ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requester {
    /// Display name.
    pub name: String,
    /// E-mail address.
    pub email: String,
}

/// A normalized ticket submission.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRequest {
    /// Ticket subject.
    pub subject: String,
    /// Ticket priority.
    pub priority: Priority,
    /// Optional ticket type.
    pub ticket_type: Option<TicketType>,
    /// Comment body; never empty.
    pub body: String,
    /// Who is asking.
    pub requester: Requester,
    /// Custom field values.
    pub custom_fields: CustomFields,
    /// Upload token attaching previously uploaded files to the comment.
    pub upload_token: Option<String>,
}

impl TicketRequest {
    /// Builds the `{"ticket": {...}}` creation envelope.
    pub fn envelope(&self) -> TicketEnvelope<'_> {
        TicketEnvelope {
            ticket: NewTicket {
                subject: &self.subject,
                priority: self.priority,
                status: "new",
                ticket_type: self.ticket_type,
                comment: NewComment {
                    body: &self.body,
                    uploads: self
                        .upload_token
                        .as_deref()
                        .filter(|t| !t.is_empty())
                        .map(|t| [t]),
                },
                custom_fields: &self.custom_fields,
                requester: &self.requester,
            },
        }
    }
}

/// Wire envelope for `POST /tickets.json`.
#[derive(Debug, Serialize)]
pub struct TicketEnvelope<'a> {
    ticket: NewTicket<'a>,
}

#[derive(Debug, Serialize)]
struct NewTicket<'a> {
    subject: &'a str,
    priority: Priority,
    status: &'static str,
    #[serde(rename = "type")]
    ticket_type: Option<TicketType>,
    comment: NewComment<'a>,
    custom_fields: &'a CustomFields,
    requester: &'a Requester,
}

#[derive(Debug, Serialize)]
struct NewComment<'a> {
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    uploads: Option<[&'a str; 1]>,
}

/// Extracts `ticket.id` from a ticket creation response.
///
/// A zero or missing ID means the ticket was not created.
pub fn created_ticket_id(response: &Value) -> Option<u64> {
    let id = response.get("ticket")?.get("id")?;
    let id = match id {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (id != 0).then_some(id)
}
