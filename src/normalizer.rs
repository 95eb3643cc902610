//! Normalizes raw form parameters into a [`TicketRequest`].
//!
//! Form parameters arrive as an insertion-ordered JSON object. Values are
//! strings (or numbers), except the body, which may be a nested object of
//! labeled fields. Every transformation here is a pure function.

use serde_json::{Map, Value};

use crate::config::FieldMapping;
use crate::error::ZendeskError;
use crate::models::{
    is_truthy, non_empty_text, value_as_text, CustomFields, Priority, Requester, TicketRequest,
    TicketType,
};

/// Raw form parameters in submission order.
pub type FormParams = Map<String, Value>;

/// Parameter names that are never custom fields, even in direct-ID mode.
pub const RESERVED_FIELDS: &[&str] = &[
    "action",
    "redirect",
    "subject",
    "type",
    "priority",
    "success",
    "failed",
    "mapFieldIds",
    "CRAFT_CSRF_TOKEN",
    "csrf_token",
    "firstName",
    "lastName",
    "name",
    "email",
    "body",
    "comment",
];

/// Returns true for a non-empty string of ASCII digits.
pub fn is_numeric_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true if the parameter is reserved for the gateway itself.
pub fn is_reserved_field(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

/// Turns a camel-case field name into a spaced, title-cased label.
///
/// `orderNumber` becomes `Order Number`. Only the first letter of each
/// word is touched.
pub fn humanize_label(field: &str) -> String {
    let mut spaced = String::with_capacity(field.len() + 4);
    let mut prev: Option<char> = None;
    for c in field.chars() {
        if prev.is_some_and(char::is_lowercase) && c.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
        prev = Some(c);
    }

    let mut label = String::with_capacity(spaced.len());
    let mut word_start = true;
    for c in spaced.chars() {
        if word_start {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        word_start = c.is_whitespace();
    }
    label
}

/// Renders a structured body as one line per non-empty entry.
///
/// Numeric keys contribute only their value; other keys are rendered as
/// `"Label: value"`.
pub fn format_body(fields: &Map<String, Value>) -> String {
    let mut body = String::new();
    for (field, value) in fields {
        let Some(value) = value_as_text(value).filter(|v| !v.is_empty()) else {
            continue;
        };
        if is_numeric_key(field) {
            body.push_str(&value);
        } else {
            body.push_str(&humanize_label(field));
            body.push_str(": ");
            body.push_str(&value);
        }
        body.push('\n');
    }
    body
}

/// Normalizes a body parameter: flat values are used verbatim, objects
/// are formatted with [`format_body`].
pub fn normalize_body(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(fields)) => format_body(fields),
        Some(other) => value_as_text(other).unwrap_or_default(),
        None => String::new(),
    }
}

/// How custom field values are located in a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomFieldMode {
    /// Numeric parameter names are custom field IDs.
    DirectId,
    /// Named parameters are mapped to IDs through configuration.
    ConfigMapped,
}

impl CustomFieldMode {
    /// Selects the mode from the `mapFieldIds` flag.
    pub fn from_params(params: &FormParams) -> Self {
        if params.get("mapFieldIds").is_some_and(is_truthy) {
            CustomFieldMode::DirectId
        } else {
            CustomFieldMode::ConfigMapped
        }
    }
}

/// Collects every numeric, non-reserved parameter with a non-empty value.
pub fn direct_id_custom_fields(params: &FormParams) -> CustomFields {
    params
        .iter()
        .filter(|(name, _)| !is_reserved_field(name) && is_numeric_key(name))
        .filter_map(|(name, value)| non_empty_text(Some(value)).map(|v| (name.clone(), v)))
        .collect()
}

/// Collects configured fields that are present and non-empty.
pub fn mapped_custom_fields(params: &FormParams, mappings: &[FieldMapping]) -> CustomFields {
    mappings
        .iter()
        .filter_map(|m| {
            non_empty_text(params.get(&m.field_name)).map(|v| (m.field_id.clone(), v))
        })
        .collect()
}

/// Collects custom fields using the given mode.
pub fn collect_custom_fields(
    params: &FormParams,
    mode: CustomFieldMode,
    mappings: &[FieldMapping],
) -> CustomFields {
    match mode {
        CustomFieldMode::DirectId => direct_id_custom_fields(params),
        CustomFieldMode::ConfigMapped => mapped_custom_fields(params, mappings),
    }
}

/// Builds a validated [`TicketRequest`] from form parameters.
///
/// `body_field` names the parameter holding the ticket body. A missing
/// priority defaults to normal; an unknown priority or type is rejected.
///
/// # Errors
///
/// Returns `ZendeskError::Validation` if the body is empty after
/// normalization or if priority/type hold unknown values.
pub fn normalize_ticket(
    params: &FormParams,
    body_field: &str,
    custom_fields: CustomFields,
    upload_token: Option<String>,
) -> Result<TicketRequest, ZendeskError> {
    let body = normalize_body(params.get(body_field));
    if body.trim().is_empty() {
        return Err(ZendeskError::validation(format!(
            "ticket body ({}) is empty",
            body_field
        )));
    }

    let priority = match non_empty_text(params.get("priority")) {
        Some(p) => p.parse::<Priority>()?,
        None => Priority::default(),
    };
    let ticket_type = non_empty_text(params.get("type"))
        .map(|t| t.parse::<TicketType>())
        .transpose()?;

    let text = |name: &str| non_empty_text(params.get(name)).unwrap_or_default();

    Ok(TicketRequest {
        subject: text("subject"),
        priority,
        ticket_type,
        body,
        requester: Requester {
            name: text("name"),
            email: text("email"),
        },
        custom_fields,
        upload_token: upload_token.filter(|t| !t.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn params(value: Value) -> FormParams {
        match value {
            Value::Object(map) => map,
            _ => panic!("params must be an object"),
        }
    }

    #[test]
    fn test_humanize_label() {
        assert_eq!(humanize_label("orderNumber"), "Order Number");
        assert_eq!(humanize_label("notes"), "Notes");
        assert_eq!(humanize_label("customerAccountId"), "Customer Account Id");
        assert_eq!(humanize_label("URLPath"), "URLPath");
        assert_eq!(humanize_label("order_number"), "Order_number");
        assert_eq!(humanize_label("already spaced"), "Already Spaced");
    }

    #[test]
    fn test_format_body_preserves_order() {
        let fields = params(json!({"orderNumber": "123", "notes": "hello"}));
        assert_eq!(format_body(&fields), "Order Number: 123\nNotes: hello\n");
    }

    #[test]
    fn test_format_body_numeric_keys_and_empty_values() {
        let fields = params(json!({
            "0": "First line",
            "orderNumber": "",
            "contactTime": null,
            "1": "Second line",
            "quantity": 0
        }));
        assert_eq!(format_body(&fields), "First line\nSecond line\nQuantity: 0\n");
    }

    #[test]
    fn test_normalize_body_flat_is_verbatim() {
        assert_eq!(normalize_body(Some(&json!("  as typed\n"))), "  as typed\n");
        assert_eq!(normalize_body(None), "");
    }

    #[test]
    fn test_direct_id_custom_fields() {
        let form = params(json!({"25004123": "VIP", "subject": "x"}));
        let fields = direct_id_custom_fields(&form);
        assert_eq!(fields, CustomFields::from_iter([("25004123", "VIP")]));
    }

    #[test]
    fn test_direct_id_skips_empty_and_non_numeric() {
        let form = params(json!({
            "25004123": "",
            "25004124": "yes",
            "orderNumber": "123",
            "12a": "no"
        }));
        let fields = direct_id_custom_fields(&form);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("25004124"), Some("yes"));
    }

    #[test]
    fn test_mapped_custom_fields() {
        let mappings = vec![
            FieldMapping {
                field_name: "orderNumber".to_string(),
                field_id: "360000111".to_string(),
            },
            FieldMapping {
                field_name: "accountType".to_string(),
                field_id: "360000222".to_string(),
            },
        ];
        let form = params(json!({"orderNumber": "123", "accountType": ""}));
        let fields = mapped_custom_fields(&form, &mappings);
        assert_eq!(fields, CustomFields::from_iter([("360000111", "123")]));
    }

    #[test]
    fn test_custom_field_mode_flag() {
        assert_eq!(
            CustomFieldMode::from_params(&params(json!({"mapFieldIds": "1"}))),
            CustomFieldMode::DirectId
        );
        assert_eq!(
            CustomFieldMode::from_params(&params(json!({"mapFieldIds": true}))),
            CustomFieldMode::DirectId
        );
        assert_eq!(
            CustomFieldMode::from_params(&params(json!({"mapFieldIds": "0"}))),
            CustomFieldMode::ConfigMapped
        );
        assert_eq!(
            CustomFieldMode::from_params(&params(json!({}))),
            CustomFieldMode::ConfigMapped
        );
    }

    #[test]
    fn test_modes_are_exclusive() {
        let mappings = vec![FieldMapping {
            field_name: "orderNumber".to_string(),
            field_id: "360000111".to_string(),
        }];
        let form = params(json!({"orderNumber": "123", "25004123": "VIP"}));

        let direct = collect_custom_fields(&form, CustomFieldMode::DirectId, &mappings);
        assert_eq!(direct, CustomFields::from_iter([("25004123", "VIP")]));

        let mapped = collect_custom_fields(&form, CustomFieldMode::ConfigMapped, &mappings);
        assert_eq!(mapped, CustomFields::from_iter([("360000111", "123")]));
    }

    #[test]
    fn test_normalize_ticket() {
        let form = params(json!({
            "subject": "Help",
            "priority": "urgent",
            "type": "question",
            "body": {"orderNumber": "123", "notes": "hello"},
            "name": "Ada",
            "email": "ada@example.com"
        }));
        let ticket =
            normalize_ticket(&form, "body", CustomFields::new(), Some("tok".to_string())).unwrap();
        assert_eq!(ticket.subject, "Help");
        assert_eq!(ticket.priority, Priority::Urgent);
        assert_eq!(ticket.ticket_type, Some(TicketType::Question));
        assert_eq!(ticket.body, "Order Number: 123\nNotes: hello\n");
        assert_eq!(ticket.requester.email, "ada@example.com");
        assert_eq!(ticket.upload_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_normalize_ticket_defaults() {
        let form = params(json!({"comment": "It broke"}));
        let ticket =
            normalize_ticket(&form, "comment", CustomFields::new(), Some(String::new())).unwrap();
        assert_eq!(ticket.priority, Priority::Normal);
        assert_eq!(ticket.ticket_type, None);
        assert_eq!(ticket.upload_token, None);
    }

    #[test]
    fn test_normalize_ticket_rejects_non_wire_priority() {
        let form = params(json!({"body": "x", "priority": "URGENT"}));
        let err = normalize_ticket(&form, "body", CustomFields::new(), None).unwrap_err();
        assert!(matches!(err, ZendeskError::Validation(_)));
    }

    #[test]
    fn test_normalize_ticket_rejects_empty_body() {
        let form = params(json!({"subject": "Help", "body": {"notes": ""}}));
        let err = normalize_ticket(&form, "body", CustomFields::new(), None).unwrap_err();
        assert!(matches!(err, ZendeskError::Validation(_)));
    }

    #[test]
    fn test_normalize_ticket_rejects_unknown_priority() {
        let form = params(json!({"body": "x", "priority": "critical"}));
        assert!(normalize_ticket(&form, "body", CustomFields::new(), None).is_err());
    }
}
