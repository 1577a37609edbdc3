use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::audit::window::{day_range_utc, offset_from_minutes};
use crate::domain::Role;
use crate::errors::api::ApiError;
use crate::stores::{AuditQuery, AuditStore};
use crate::types::dto::audit::AuditLogOut;
use crate::types::internal::RequestContext;

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 200;

/// Filter inputs as they arrive from the query string, before any timezone
/// resolution.
#[derive(Debug, Default)]
pub struct AuditLogFilter {
    pub action_type: Option<String>,
    pub actor_email: Option<String>,
    pub target_type: Option<String>,

    /// Exact UTC bounds (RFC 3339); take precedence over the day filters
    pub from_date: Option<String>,
    pub to_date: Option<String>,

    /// Calendar days in the viewer's local timezone (YYYY-MM-DD)
    pub from_day: Option<String>,
    pub to_day: Option<String>,

    /// Viewer's UTC offset in minutes east of UTC (UTC-8 is -480).
    /// Defaults to UTC when absent.
    pub tz_offset_minutes: Option<i32>,

    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Read side of the audit trail. Writes happen in the acting services.
pub struct AuditLogService {
    audit_store: Arc<AuditStore>,
}

impl AuditLogService {
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    /// Query audit logs with day-window filters resolved to UTC bounds.
    /// Admin only.
    pub async fn query(
        &self,
        ctx: &RequestContext,
        filter: &AuditLogFilter,
    ) -> Result<Vec<AuditLogOut>, ApiError> {
        let actor = ctx
            .actor
            .as_ref()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
        if actor.role != Role::Admin {
            return Err(ApiError::forbidden("Administrator access required."));
        }

        let offset = offset_from_minutes(filter.tz_offset_minutes.unwrap_or(0));
        let from_day = parse_day(filter.from_day.as_deref())?;
        let to_day = parse_day(filter.to_day.as_deref())?;
        let (from, to) = day_range_utc(from_day, to_day, offset);

        // Exact timestamps win over derived day boundaries
        let from = parse_timestamp(filter.from_date.as_deref())?.or(from);
        let to = parse_timestamp(filter.to_date.as_deref())?.or(to);

        let query = AuditQuery {
            action_type: filter.action_type.clone(),
            actor_email: filter.actor_email.clone(),
            target_type: filter.target_type.clone(),
            from,
            to,
            limit: filter.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
            offset: filter.offset.unwrap_or(0),
        };

        let logs = self.audit_store.query(&query).await?;
        Ok(logs.into_iter().map(AuditLogOut::from).collect())
    }
}

fn parse_timestamp(value: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| ApiError::bad_request(format!("Invalid timestamp '{}'", s)))
        })
        .transpose()
}

fn parse_day(value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| ApiError::bad_request(format!("Invalid date '{}'", s)))
        })
        .transpose()
}

#[cfg(test)]
#[path = "audit_service_tests.rs"]
mod audit_service_tests;
