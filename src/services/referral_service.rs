use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::json;

use crate::domain::Role;
use crate::errors::api::ApiError;
use crate::stores::{AuditStore, ReferralStore, UserStore};
use crate::types::db::{employee_referral, user};
use crate::types::dto::referrals::{ReferralCreateRequest, ReferralOut, ReferralReviewRequest};
use crate::types::dto::users::to_rfc3339;
use crate::types::internal::{Actor, AuditEvent, RequestContext};

const MIN_REASON_LENGTH: usize = 10;

/// Promotion referral lifecycle: managers refer employees for promotion to
/// manager, admins review. Approval performs the promotion.
pub struct ReferralService {
    referral_store: Arc<ReferralStore>,
    user_store: Arc<UserStore>,
    audit_store: Arc<AuditStore>,
}

impl ReferralService {
    pub fn new(
        referral_store: Arc<ReferralStore>,
        user_store: Arc<UserStore>,
        audit_store: Arc<AuditStore>,
    ) -> Self {
        Self {
            referral_store,
            user_store,
            audit_store,
        }
    }

    /// Submit a referral. Manager only; one pending referral per employee.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &ReferralCreateRequest,
    ) -> Result<ReferralOut, ApiError> {
        let actor = require_actor(ctx)?;
        if actor.role != Role::Manager {
            return Err(ApiError::forbidden("Only managers can submit referrals."));
        }
        if request.referred_user_id == actor.id {
            return Err(ApiError::bad_request("Cannot refer yourself."));
        }

        let reason = request.reason.trim();
        if reason.len() < MIN_REASON_LENGTH {
            return Err(ApiError::bad_request(format!(
                "Reason must be at least {} characters.",
                MIN_REASON_LENGTH
            )));
        }

        let referred = self
            .user_store
            .get_by_id(request.referred_user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        let referred_role = Role::from_str(&referred.role)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        if referred_role != Role::Employee || !referred.is_active {
            return Err(ApiError::bad_request(
                "Only active employees can be referred for promotion.",
            ));
        }

        if self
            .referral_store
            .find_pending_for_user(referred.id)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict(
                "A referral for this employee is already pending review.",
            ));
        }

        let referral = self
            .referral_store
            .insert(referred.id, actor.id, reason)
            .await?;

        self.audit_store
            .record(AuditEvent::from_context(
                ctx,
                "referral_created",
                "employee_referral",
                referral.id,
                json!({
                    "referred_user_email": referred.email,
                    "referring_manager_email": actor.email,
                    "reason": reason,
                }),
            ))
            .await;

        self.to_out(referral).await
    }

    /// List referrals: admins see everything, managers their own.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        status: Option<&str>,
    ) -> Result<Vec<ReferralOut>, ApiError> {
        let actor = require_actor(ctx)?;
        let referrals = match actor.role {
            Role::Admin => self.referral_store.list(status).await?,
            Role::Manager => {
                self.referral_store
                    .list_by_manager(actor.id, status)
                    .await?
            }
            _ => return Err(ApiError::forbidden("Not allowed to view referrals.")),
        };

        // Resolve participant emails in one pass
        let users: HashMap<i32, user::Model> = self
            .user_store
            .list_all()
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(referrals
            .into_iter()
            .map(|r| build_out(r, &users))
            .collect())
    }

    /// Approve a pending referral, promoting the employee to manager.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        referral_id: i32,
        request: &ReferralReviewRequest,
    ) -> Result<ReferralOut, ApiError> {
        let actor = require_admin(ctx)?;
        let referral = self.load_pending(referral_id).await?;

        let referred = self
            .user_store
            .get_by_id(referral.referred_user_id)
            .await?
            .ok_or_else(|| ApiError::conflict("The referred user no longer exists."))?;
        if referred.role != Role::Employee.as_str() || !referred.is_active {
            return Err(ApiError::conflict(
                "The referred user is no longer an active employee.",
            ));
        }

        // Promote first so a failed promotion leaves the referral pending.
        self.user_store
            .apply_role_change(referred.id, Role::Manager, None, &Default::default())
            .await?;

        let updated = self
            .referral_store
            .update_review(referral.id, "approved", request.admin_notes.as_deref())
            .await?;

        self.audit_store
            .record(AuditEvent::from_context(
                ctx,
                "referral_approved",
                "employee_referral",
                referral.id,
                json!({
                    "referred_user_email": referred.email,
                    "admin_notes": request.admin_notes,
                    "action_by_email": actor.email,
                }),
            ))
            .await;

        tracing::info!(
            referral_id,
            user_id = referred.id,
            "Referral approved, employee promoted to manager"
        );

        self.to_out(updated).await
    }

    /// Reject a pending referral. The employee keeps their current role.
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        referral_id: i32,
        request: &ReferralReviewRequest,
    ) -> Result<ReferralOut, ApiError> {
        let actor = require_admin(ctx)?;
        let referral = self.load_pending(referral_id).await?;

        let updated = self
            .referral_store
            .update_review(referral.id, "rejected", request.admin_notes.as_deref())
            .await?;

        self.audit_store
            .record(AuditEvent::from_context(
                ctx,
                "referral_rejected",
                "employee_referral",
                referral.id,
                json!({
                    "referred_user_id": referral.referred_user_id,
                    "admin_notes": request.admin_notes,
                    "action_by_email": actor.email,
                }),
            ))
            .await;

        self.to_out(updated).await
    }

    /// Withdraw a pending referral. Allowed for the referring manager and
    /// for admins.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        referral_id: i32,
    ) -> Result<ReferralOut, ApiError> {
        let actor = require_actor(ctx)?;
        let referral = self.load_pending(referral_id).await?;

        let may_cancel = actor.role == Role::Admin
            || (actor.role == Role::Manager && referral.referring_manager_id == actor.id);
        if !may_cancel {
            return Err(ApiError::forbidden(
                "Only the referring manager or an admin can cancel a referral.",
            ));
        }

        let updated = self
            .referral_store
            .update_review(referral.id, "canceled", None)
            .await?;

        self.audit_store
            .record(AuditEvent::from_context(
                ctx,
                "referral_canceled",
                "employee_referral",
                referral.id,
                json!({
                    "referred_user_id": referral.referred_user_id,
                    "action_by_email": actor.email,
                }),
            ))
            .await;

        self.to_out(updated).await
    }

    async fn load_pending(
        &self,
        referral_id: i32,
    ) -> Result<employee_referral::Model, ApiError> {
        let referral = self
            .referral_store
            .get_by_id(referral_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Referral not found"))?;
        if referral.status != "pending" {
            return Err(ApiError::conflict(format!(
                "Referral has already been {}.",
                referral.status
            )));
        }
        Ok(referral)
    }

    async fn to_out(&self, referral: employee_referral::Model) -> Result<ReferralOut, ApiError> {
        let referred = self.user_store.get_by_id(referral.referred_user_id).await?;
        let referring = self
            .user_store
            .get_by_id(referral.referring_manager_id)
            .await?;

        let mut users = HashMap::new();
        if let Some(u) = referred {
            users.insert(u.id, u);
        }
        if let Some(u) = referring {
            users.insert(u.id, u);
        }
        Ok(build_out(referral, &users))
    }
}

fn build_out(
    referral: employee_referral::Model,
    users: &HashMap<i32, user::Model>,
) -> ReferralOut {
    let referred = users.get(&referral.referred_user_id);
    let referring = users.get(&referral.referring_manager_id);
    ReferralOut {
        id: referral.id,
        referred_user_id: referral.referred_user_id,
        referred_user_email: referred.map(|u| u.email.clone()).unwrap_or_default(),
        referred_user_name: referred.and_then(|u| u.full_name.clone()),
        referring_manager_id: referral.referring_manager_id,
        referring_manager_email: referring.map(|u| u.email.clone()).unwrap_or_default(),
        status: referral.status,
        reason: referral.reason,
        admin_notes: referral.admin_notes,
        created_at: to_rfc3339(referral.created_at),
        reviewed_at: referral.reviewed_at.map(to_rfc3339),
    }
}

fn require_actor(ctx: &RequestContext) -> Result<&Actor, ApiError> {
    ctx.actor
        .as_ref()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

fn require_admin(ctx: &RequestContext) -> Result<&Actor, ApiError> {
    let actor = require_actor(ctx)?;
    if actor.role != Role::Admin {
        return Err(ApiError::forbidden("Administrator access required."));
    }
    Ok(actor)
}

#[cfg(test)]
#[path = "referral_service_tests.rs"]
mod referral_service_tests;
