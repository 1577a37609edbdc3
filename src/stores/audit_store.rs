use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::errors::InternalError;
use crate::types::db::audit_log::{self, Entity as AuditLog};
use crate::types::internal::AuditEvent;

/// Filters for the audit log listing.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub action_type: Option<String>,
    pub actor_email: Option<String>,
    pub target_type: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: u64,
    pub offset: u64,
}

/// Repository for audit log storage and retrieval.
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write an audit event.
    ///
    /// Audit logging must never break the operation being audited: failures
    /// are logged and swallowed.
    pub async fn record(&self, event: AuditEvent) {
        let details_json = match serde_json::to_string(&event.details) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize audit details: {}", e);
                r#"{"error":"Failed to serialize details"}"#.to_string()
            }
        };

        let row = audit_log::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            action_type: Set(event.action_type.clone()),
            actor_id: Set(event.actor_id),
            actor_email: Set(event.actor_email),
            target_type: Set(event.target_type),
            target_id: Set(event.target_id),
            details: Set(Some(details_json)),
            ip_address: Set(event.ip_address),
            timestamp_ms: Set(Utc::now().timestamp_millis()),
        };

        if let Err(e) = row.insert(&self.db).await {
            tracing::error!(
                "Failed to write audit log for action '{}': {}",
                event.action_type,
                e
            );
        }
    }

    /// Query audit logs, newest first.
    pub async fn query(&self, query: &AuditQuery) -> Result<Vec<audit_log::Model>, InternalError> {
        let mut select = AuditLog::find();

        if let Some(action_type) = &query.action_type {
            select = select.filter(audit_log::Column::ActionType.eq(action_type));
        }
        if let Some(actor_email) = &query.actor_email {
            select = select.filter(audit_log::Column::ActorEmail.eq(actor_email));
        }
        if let Some(target_type) = &query.target_type {
            select = select.filter(audit_log::Column::TargetType.eq(target_type));
        }
        if let Some(from) = query.from {
            select = select.filter(audit_log::Column::TimestampMs.gte(from.timestamp_millis()));
        }
        if let Some(to) = query.to {
            select = select.filter(audit_log::Column::TimestampMs.lte(to.timestamp_millis()));
        }

        select
            .order_by_desc(audit_log::Column::TimestampMs)
            // Insertion order breaks same-millisecond ties
            .order_by_desc(audit_log::Column::Id)
            .limit(query.limit)
            .offset(query.offset)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("query_audit_logs", e))
    }
}
