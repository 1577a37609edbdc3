use serde_json::Value;

use crate::types::internal::RequestContext;

/// An audit event ready to be persisted.
///
/// Built at the point of action by services; the store serializes `details`
/// and stamps the timestamp at write time.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action_type: String,
    pub actor_id: Option<i32>,
    pub actor_email: Option<String>,
    pub target_type: String,
    pub target_id: i32,
    pub details: Value,
    pub ip_address: Option<String>,
}

impl AuditEvent {
    /// Create an event attributed to the context's actor.
    pub fn from_context(
        ctx: &RequestContext,
        action_type: &str,
        target_type: &str,
        target_id: i32,
        details: Value,
    ) -> Self {
        Self {
            action_type: action_type.to_string(),
            actor_id: ctx.actor.as_ref().map(|a| a.id),
            actor_email: ctx.actor.as_ref().map(|a| a.email.clone()),
            target_type: target_type.to_string(),
            target_id,
            details,
            ip_address: ctx.ip_string(),
        }
    }
}
