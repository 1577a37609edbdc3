use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;

/// User record as returned to admin and manager panels
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserOut {
    pub id: i32,
    pub email: String,
    pub full_name: Option<String>,

    /// One of admin, manager, employee, customer
    pub role: String,
    pub is_active: bool,

    /// Id of the manager this user reports to (employees only)
    pub reports_to: Option<i32>,

    /// Creation time (RFC 3339)
    pub created_at: String,

    /// Last modification time (RFC 3339)
    pub updated_at: String,
}

impl From<user::Model> for UserOut {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            role: model.role,
            is_active: model.is_active,
            reports_to: model.reports_to,
            created_at: to_rfc3339(model.created_at),
            updated_at: to_rfc3339(model.updated_at),
        }
    }
}

/// Unix milliseconds to RFC 3339, empty string for out-of-range values.
pub fn to_rfc3339(unix_millis: i64) -> String {
    Utc.timestamp_millis_opt(unix_millis)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

/// Request model for a role change submission
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RoleUpdateRequest {
    /// The new role for the user
    pub role: String,

    /// Reporting manager for the user, required when the new role is
    /// employee
    pub manager_id: Option<i32>,

    /// Mapping from subordinate user id (as a string key) to the id of the
    /// manager absorbing them; entries override the default assignment for
    /// the same subordinate
    pub subordinate_reassignments: Option<HashMap<String, i32>>,
}

/// Request model for blocking or unblocking a user
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct BlockUpdateRequest {
    pub is_active: bool,
}

/// Response model for a successful role change
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RoleUpdateResponse {
    pub ok: bool,
    pub message: String,
    pub user: UserOut,
}

/// Preview of the decision for a proposed role change
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RolePlanResponse {
    /// One of: proceed, suggest_manager, blocked, needs_reassignment
    pub decision: String,

    /// Reason shown to the actor when the change is blocked
    pub reason: Option<String>,

    /// Employees that must be reassigned before the change can proceed
    pub subordinate_ids: Vec<i32>,

    /// Managers available to absorb subordinates or supervise the target
    pub available_manager_ids: Vec<i32>,

    /// Default reassignment (every subordinate mapped to the first
    /// available manager), keyed by subordinate id
    pub default_assignments: HashMap<String, i32>,

    /// Whether a reporting manager must be chosen for the target itself
    pub requires_reporting_manager: bool,
}
