use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::json;

use crate::domain::{decide, ReassignmentPlan, Role, RoleChangeDecision, UserDirectory};
use crate::errors::api::ApiError;
use crate::stores::{AuditStore, UserStore};
use crate::types::db::user;
use crate::types::dto::users::{RolePlanResponse, RoleUpdateRequest, UserOut};
use crate::types::internal::{Actor, AuditEvent, RequestContext};

/// Orchestrates user administration: listing, role changes with subordinate
/// reassignment, and block/unblock. All mutations are audit logged.
pub struct UserService {
    user_store: Arc<UserStore>,
    audit_store: Arc<AuditStore>,
}

impl UserService {
    pub fn new(user_store: Arc<UserStore>, audit_store: Arc<AuditStore>) -> Self {
        Self {
            user_store,
            audit_store,
        }
    }

    /// All users, newest first. Admin and manager panels share this listing.
    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<UserOut>, ApiError> {
        let actor = require_actor(ctx)?;
        if actor.role != Role::Admin && actor.role != Role::Manager {
            return Err(ApiError::forbidden("Not allowed to list users."));
        }

        let users = self.user_store.list_all().await?;
        Ok(users.into_iter().map(UserOut::from).collect())
    }

    /// Evaluate a proposed role change without mutating anything.
    ///
    /// The submission path re-derives the same decision, so a stale preview
    /// can never be used to smuggle a change past the rules.
    pub async fn plan_role_change(
        &self,
        ctx: &RequestContext,
        target_id: i32,
        new_role: &str,
    ) -> Result<RolePlanResponse, ApiError> {
        let actor = require_actor(ctx)?;
        let new_role = parse_requested_role(new_role)?;

        self.load_target(target_id).await?;

        let users = self.user_store.list_all().await?;
        let directory = UserDirectory::from_models(&users);
        let decision = decide(actor.role, target_id, new_role, &directory);

        Ok(plan_response(decision))
    }

    /// Submit a role change.
    ///
    /// The decision is derived fresh from the current user population; the
    /// request only supplies the inputs a `NeedsReassignment` decision asks
    /// for. Nothing is written unless the whole change is valid.
    pub async fn change_role(
        &self,
        ctx: &RequestContext,
        target_id: i32,
        request: &RoleUpdateRequest,
    ) -> Result<UserOut, ApiError> {
        let actor = require_actor(ctx)?;
        if actor.id == target_id {
            return Err(ApiError::forbidden("Cannot change your own role."));
        }

        let new_role = parse_requested_role(&request.role)?;
        let target = self.load_target(target_id).await?;

        let users = self.user_store.list_all().await?;
        let directory = UserDirectory::from_models(&users);

        let (reports_to, reassignments) =
            match decide(actor.role, target_id, new_role, &directory) {
                RoleChangeDecision::Blocked(reason) => return Err(ApiError::forbidden(reason)),
                RoleChangeDecision::SuggestManagerInstead => {
                    return Err(ApiError::bad_request(
                        "No managers exist yet. Promote this user to manager first, \
                         or submit the change with the manager role instead.",
                    ));
                }
                RoleChangeDecision::Proceed => {
                    let reports_to = if new_role == Role::Employee {
                        target.reports_to
                    } else {
                        None
                    };
                    (reports_to, BTreeMap::new())
                }
                RoleChangeDecision::NeedsReassignment(plan) => {
                    resolve_reassignment(&plan, new_role, request)?
                }
            };

        let updated = self
            .user_store
            .apply_role_change(target_id, new_role, reports_to, &reassignments)
            .await?;

        self.audit_store
            .record(AuditEvent::from_context(
                ctx,
                "user_role_updated",
                "user",
                target_id,
                json!({
                    "old_role": target.role,
                    "new_role": new_role.as_str(),
                    "old_reports_to": target.reports_to,
                    "new_reports_to": updated.reports_to,
                    "user_email": target.email,
                    "changed_by_role": actor.role.as_str(),
                    "changed_by_email": actor.email,
                }),
            ))
            .await;

        tracing::info!(
            target_id,
            new_role = new_role.as_str(),
            reassigned = reassignments.len(),
            "Role change applied"
        );

        Ok(UserOut::from(updated))
    }

    /// Block or unblock a user.
    ///
    /// Admins may change anyone but themselves; managers only customers and
    /// employees. Blocked users keep their data and can be unblocked later.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        target_id: i32,
        is_active: bool,
    ) -> Result<UserOut, ApiError> {
        let actor = require_actor(ctx)?;
        if actor.id == target_id {
            return Err(ApiError::forbidden(
                "Cannot change your own account status.",
            ));
        }

        let target = self.load_target(target_id).await?;
        let target_role = Role::from_str(&target.role)
            .map_err(|e| ApiError::internal(e.to_string()))?;

        match actor.role {
            Role::Admin => {}
            Role::Manager => {
                if target_role == Role::Admin || target_role == Role::Manager {
                    return Err(ApiError::forbidden(
                        "Managers can only block or unblock customers and employees.",
                    ));
                }
            }
            _ => {
                return Err(ApiError::forbidden(
                    "Not allowed to change account status.",
                ));
            }
        }

        let updated = self.user_store.set_active(target_id, is_active).await?;

        let action_type = if is_active {
            "user_unblocked"
        } else {
            "user_blocked"
        };
        self.audit_store
            .record(AuditEvent::from_context(
                ctx,
                action_type,
                "user",
                target_id,
                json!({
                    "old_status": target.is_active,
                    "new_status": is_active,
                    "user_email": target.email,
                    "action_by_role": actor.role.as_str(),
                    "action_by_email": actor.email,
                }),
            ))
            .await;

        Ok(UserOut::from(updated))
    }

    async fn load_target(&self, target_id: i32) -> Result<user::Model, ApiError> {
        self.user_store
            .get_by_id(target_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }
}

fn require_actor(ctx: &RequestContext) -> Result<&Actor, ApiError> {
    ctx.actor
        .as_ref()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

fn parse_requested_role(role: &str) -> Result<Role, ApiError> {
    Role::from_str(role).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Validate the reassignment inputs the request carries against the plan the
/// rules produced, returning the target's new `reports_to` and the complete
/// subordinate mapping to apply.
fn resolve_reassignment(
    plan: &ReassignmentPlan,
    new_role: Role,
    request: &RoleUpdateRequest,
) -> Result<(Option<i32>, BTreeMap<i32, i32>), ApiError> {
    let reports_to = if plan.requires_reporting_manager {
        let manager_id = request.manager_id.unwrap_or_else(|| plan.default_manager_id());
        if !plan.available_manager_ids.contains(&manager_id) {
            return Err(ApiError::bad_request(format!(
                "Manager {} is not available to supervise this user.",
                manager_id
            )));
        }
        Some(manager_id)
    } else {
        debug_assert!(new_role != Role::Employee);
        None
    };

    let mut overrides = BTreeMap::new();
    if let Some(raw) = &request.subordinate_reassignments {
        for (key, manager_id) in raw {
            let subordinate_id: i32 = key.parse().map_err(|_| {
                ApiError::bad_request(format!("Invalid subordinate id '{}'", key))
            })?;
            if !plan.available_manager_ids.contains(manager_id) {
                return Err(ApiError::bad_request(format!(
                    "Manager {} is not available to absorb subordinate {}.",
                    manager_id, subordinate_id
                )));
            }
            overrides.insert(subordinate_id, *manager_id);
        }
    }

    Ok((reports_to, plan.merged_assignments(&overrides)))
}

fn plan_response(decision: RoleChangeDecision) -> RolePlanResponse {
    match decision {
        RoleChangeDecision::Proceed => RolePlanResponse {
            decision: "proceed".to_string(),
            reason: None,
            subordinate_ids: vec![],
            available_manager_ids: vec![],
            default_assignments: Default::default(),
            requires_reporting_manager: false,
        },
        RoleChangeDecision::SuggestManagerInstead => RolePlanResponse {
            decision: "suggest_manager".to_string(),
            reason: Some(
                "No managers exist yet; consider making this user a manager instead."
                    .to_string(),
            ),
            subordinate_ids: vec![],
            available_manager_ids: vec![],
            default_assignments: Default::default(),
            requires_reporting_manager: false,
        },
        RoleChangeDecision::Blocked(reason) => RolePlanResponse {
            decision: "blocked".to_string(),
            reason: Some(reason),
            subordinate_ids: vec![],
            available_manager_ids: vec![],
            default_assignments: Default::default(),
            requires_reporting_manager: false,
        },
        RoleChangeDecision::NeedsReassignment(plan) => {
            let default_assignments = plan
                .default_assignments()
                .into_iter()
                .map(|(subordinate, manager)| (subordinate.to_string(), manager))
                .collect();
            RolePlanResponse {
                decision: "needs_reassignment".to_string(),
                reason: None,
                subordinate_ids: plan.subordinate_ids,
                available_manager_ids: plan.available_manager_ids,
                default_assignments,
                requires_reporting_manager: plan.requires_reporting_manager,
            }
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod user_service_tests;
