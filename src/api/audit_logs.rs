use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};

use crate::api::{authenticate, Api, BearerAuth};
use crate::errors::api::ApiError;
use crate::services::{AuditLogFilter, AuditLogService, TokenService};
use crate::stores::UserStore;
use crate::types::dto::audit::AuditLogOut;

/// Audit log endpoints
pub struct AuditLogApi {
    audit_service: Arc<AuditLogService>,
    token_service: Arc<TokenService>,
    user_store: Arc<UserStore>,
}

impl AuditLogApi {
    pub fn new(
        audit_service: Arc<AuditLogService>,
        token_service: Arc<TokenService>,
        user_store: Arc<UserStore>,
    ) -> Self {
        Self {
            audit_service,
            token_service,
            user_store,
        }
    }
}

impl Api for AuditLogApi {}

/// API tags for audit log endpoints
#[derive(Tags)]
enum AuditTags {
    /// Audit trail endpoints
    AuditLogs,
}

#[OpenApi(prefix_path = "/audit")]
impl AuditLogApi {
    /// Query the audit trail (admin only)
    ///
    /// Day filters are calendar days in the viewer's timezone; the range
    /// covers each selected day in full regardless of the server timezone.
    #[oai(path = "/logs", method = "get", tag = "AuditTags::AuditLogs")]
    #[allow(clippy::too_many_arguments)]
    async fn query(
        &self,
        req: &Request,
        auth: BearerAuth,
        action_type: Query<Option<String>>,
        actor_email: Query<Option<String>>,
        target_type: Query<Option<String>>,
        from_date: Query<Option<String>>,
        to_date: Query<Option<String>>,
        from_day: Query<Option<String>>,
        to_day: Query<Option<String>>,
        tz_offset_minutes: Query<Option<i32>>,
        limit: Query<Option<u64>>,
        offset: Query<Option<u64>>,
    ) -> Result<Json<Vec<AuditLogOut>>, ApiError> {
        let ip = self.extract_ip_address(req);
        let ctx = authenticate(&self.token_service, &self.user_store, &auth.0.token, ip).await?;

        let filter = AuditLogFilter {
            action_type: action_type.0,
            actor_email: actor_email.0,
            target_type: target_type.0,
            from_date: from_date.0,
            to_date: to_date.0,
            from_day: from_day.0,
            to_day: to_day.0,
            tz_offset_minutes: tz_offset_minutes.0,
            limit: limit.0,
            offset: offset.0,
        };
        Ok(Json(self.audit_service.query(&ctx, &filter).await?))
    }
}
