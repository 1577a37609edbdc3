use serde::Deserialize;
use serde_json::Value;

/// One labeled line of a rendered audit detail blob.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailField {
    pub label: String,
    pub value: String,
}

impl DetailField {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Placeholder shown for absent values.
const NULL_PLACEHOLDER: &str = "—";

/// Known detail payload shapes, tagged by the log's `action_type`. Anything
/// that does not match a known shape degrades to a generic key/value
/// rendering, and non-JSON payloads degrade to the raw string.
#[derive(Debug)]
pub enum DetailRecord {
    RoleChange(RoleChangeDetails),
    StatusChange(StatusChangeDetails),
    Referral(ReferralDetails),
    Unknown(serde_json::Map<String, Value>),
    Raw(String),
}

#[derive(Debug, Deserialize)]
pub struct RoleChangeDetails {
    pub old_role: String,
    pub new_role: String,
    pub old_reports_to: Option<i64>,
    pub new_reports_to: Option<i64>,
    pub user_email: Option<String>,
    pub changed_by_email: Option<String>,
    pub changed_by_role: Option<String>,
    pub reassigned_subordinates: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeDetails {
    pub old_status: bool,
    pub new_status: bool,
    pub user_email: Option<String>,
    pub action_by_email: Option<String>,
    pub action_by_role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReferralDetails {
    pub referred_user_email: Option<String>,
    pub referring_manager_email: Option<String>,
    pub reason: Option<String>,
    pub admin_notes: Option<String>,
    pub status: Option<String>,
}

impl DetailRecord {
    /// Interpret a raw details payload in the context of its action type.
    pub fn parse(action_type: &str, details: &str) -> Self {
        let value: Value = match serde_json::from_str(details) {
            Ok(value) => value,
            Err(_) => return DetailRecord::Raw(details.to_string()),
        };

        let object = match value {
            Value::Object(map) => map,
            other => return DetailRecord::Raw(other.to_string()),
        };

        match action_type {
            "user_role_updated" => {
                match serde_json::from_value(Value::Object(object.clone())) {
                    Ok(details) => DetailRecord::RoleChange(details),
                    Err(_) => DetailRecord::Unknown(object),
                }
            }
            "user_blocked" | "user_unblocked" => {
                match serde_json::from_value(Value::Object(object.clone())) {
                    Ok(details) => DetailRecord::StatusChange(details),
                    Err(_) => DetailRecord::Unknown(object),
                }
            }
            action if action.starts_with("referral_") => {
                match serde_json::from_value(Value::Object(object.clone())) {
                    Ok(details) => DetailRecord::Referral(details),
                    Err(_) => DetailRecord::Unknown(object),
                }
            }
            _ => DetailRecord::Unknown(object),
        }
    }

    /// Render the record as labeled fields.
    pub fn fields(&self) -> Vec<DetailField> {
        match self {
            DetailRecord::RoleChange(d) => {
                let mut fields = vec![
                    DetailField::new("Previous Role", capitalize(&d.old_role)),
                    DetailField::new("New Role", capitalize(&d.new_role)),
                ];
                fields.push(DetailField::new(
                    "Previous Manager",
                    format_optional_id(d.old_reports_to),
                ));
                fields.push(DetailField::new(
                    "New Manager",
                    format_optional_id(d.new_reports_to),
                ));
                if let Some(email) = &d.user_email {
                    fields.push(DetailField::new("User Email", email.clone()));
                }
                if let Some(email) = &d.changed_by_email {
                    fields.push(DetailField::new("Changed By", email.clone()));
                }
                if let Some(role) = &d.changed_by_role {
                    fields.push(DetailField::new("Changed By Role", capitalize(role)));
                }
                if let Some(map) = &d.reassigned_subordinates {
                    fields.push(DetailField::new(
                        "Reassigned Subordinates",
                        map.to_string(),
                    ));
                }
                fields
            }
            DetailRecord::StatusChange(d) => {
                let mut fields = vec![
                    DetailField::new("Previous Status", format_status(d.old_status)),
                    DetailField::new("New Status", format_status(d.new_status)),
                ];
                if let Some(email) = &d.user_email {
                    fields.push(DetailField::new("User Email", email.clone()));
                }
                if let Some(email) = &d.action_by_email {
                    fields.push(DetailField::new("Action By", email.clone()));
                }
                if let Some(role) = &d.action_by_role {
                    fields.push(DetailField::new("Action By Role", capitalize(role)));
                }
                fields
            }
            DetailRecord::Referral(d) => {
                let mut fields = Vec::new();
                if let Some(email) = &d.referred_user_email {
                    fields.push(DetailField::new("Referred User Email", email.clone()));
                }
                if let Some(email) = &d.referring_manager_email {
                    fields.push(DetailField::new("Referring Manager", email.clone()));
                }
                if let Some(status) = &d.status {
                    fields.push(DetailField::new("Status", capitalize(status)));
                }
                if let Some(reason) = &d.reason {
                    fields.push(DetailField::new("Reason", reason.clone()));
                }
                if let Some(notes) = &d.admin_notes {
                    fields.push(DetailField::new("Admin Notes", notes.clone()));
                }
                fields
            }
            DetailRecord::Unknown(map) => map
                .iter()
                .map(|(key, value)| DetailField::new(field_label(key), format_value(key, value)))
                .collect(),
            DetailRecord::Raw(raw) => vec![DetailField::new("Details", raw.clone())],
        }
    }
}

/// Render a details payload (or its absence) as labeled fields.
pub fn format_details(action_type: &str, details: Option<&str>) -> Vec<DetailField> {
    match details {
        Some(details) => DetailRecord::parse(action_type, details).fields(),
        None => vec![],
    }
}

/// Human label for a detail key: static lookup first, generic
/// snake_case -> Title Case conversion as a fallback.
pub fn field_label(key: &str) -> String {
    for (known, label) in LABELS {
        if key == *known {
            return (*label).to_string();
        }
    }
    title_case(key)
}

const LABELS: &[(&str, &str)] = &[
    ("old_role", "Previous Role"),
    ("new_role", "New Role"),
    ("old_status", "Previous Status"),
    ("new_status", "New Status"),
    ("old_reports_to", "Previous Manager"),
    ("new_reports_to", "New Manager"),
    ("user_email", "User Email"),
    ("changed_by_email", "Changed By"),
    ("changed_by_role", "Changed By Role"),
    ("changed_by_name", "Changed By Name"),
    ("action_by_email", "Action By"),
    ("action_by_role", "Action By Role"),
    ("referred_user_email", "Referred User Email"),
    ("referring_manager_email", "Referring Manager"),
    ("admin_notes", "Admin Notes"),
    ("reassigned_subordinates", "Reassigned Subordinates"),
    ("item_name", "Item Name"),
    ("ip_address", "IP Address"),
];

/// Format a JSON value for display, contextually on its key.
pub fn format_value(key: &str, value: &Value) -> String {
    match value {
        Value::Null => NULL_PLACEHOLDER.to_string(),
        Value::Bool(b) => {
            if key.contains("status") {
                format_status(*b)
            } else if *b {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        Value::String(s) => {
            if key.ends_with("role") || key == "status" {
                capitalize(s)
            } else {
                s.clone()
            }
        }
        Value::Number(n) => n.to_string(),
        // Arrays and nested objects render as compact JSON.
        other => other.to_string(),
    }
}

/// Best-effort specific description of the log's target, falling back to
/// `"<Type> #<id>"`.
pub fn target_description(target_type: &str, target_id: i32, details: Option<&str>) -> String {
    let parsed: Option<Value> = details.and_then(|d| serde_json::from_str(d).ok());

    let from_details = |keys: &[&str]| -> Option<String> {
        let object = parsed.as_ref()?.as_object()?;
        keys.iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    };

    let specific = match target_type {
        "user" => from_details(&["user_email", "email"]),
        "employee_referral" | "referral" => from_details(&["referred_user_email"]),
        "item" => from_details(&["item_name", "name"]),
        "order" => from_details(&["order_number"]),
        _ => None,
    };

    specific.unwrap_or_else(|| format!("{} #{}", title_case(target_type), target_id))
}

fn format_status(active: bool) -> String {
    if active { "Active" } else { "Blocked" }.to_string()
}

fn format_optional_id(id: Option<i64>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => NULL_PLACEHOLDER.to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}
