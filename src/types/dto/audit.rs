use chrono::{TimeZone, Utc};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::audit;
use crate::types::db::audit_log;

/// One labeled line of a rendered audit detail blob
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DetailFieldOut {
    pub label: String,
    pub value: String,
}

impl From<audit::DetailField> for DetailFieldOut {
    fn from(field: audit::DetailField) -> Self {
        Self {
            label: field.label,
            value: field.value,
        }
    }
}

/// Audit log record with rendered details and target description
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AuditLogOut {
    pub id: i32,
    pub action_type: String,
    pub actor_id: Option<i32>,
    pub actor_email: Option<String>,
    pub target_type: String,
    pub target_id: i32,

    /// Specific label for the target when one can be derived from the
    /// details, otherwise "<Type> #<id>"
    pub target_description: String,

    /// Raw details JSON as stored
    pub details: Option<String>,

    /// Details rendered as labeled fields
    pub detail_fields: Vec<DetailFieldOut>,

    pub ip_address: Option<String>,

    /// Event time (RFC 3339, UTC)
    pub timestamp: String,
}

impl From<audit_log::Model> for AuditLogOut {
    fn from(model: audit_log::Model) -> Self {
        let detail_fields = audit::format_details(&model.action_type, model.details.as_deref())
            .into_iter()
            .map(DetailFieldOut::from)
            .collect();
        let target_description = audit::target_description(
            &model.target_type,
            model.target_id,
            model.details.as_deref(),
        );
        Self {
            id: model.id,
            action_type: model.action_type,
            actor_id: model.actor_id,
            actor_email: model.actor_email,
            target_type: model.target_type,
            target_id: model.target_id,
            target_description,
            details: model.details,
            detail_fields,
            ip_address: model.ip_address,
            timestamp: Utc
                .timestamp_millis_opt(model.timestamp_ms)
                .single()
                .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
                .unwrap_or_default(),
        }
    }
}
