use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::employee_referral::{self, Entity as EmployeeReferral};

/// Repository for employee-to-manager referrals.
pub struct ReferralStore {
    db: DatabaseConnection,
}

impl ReferralStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(
        &self,
        referred_user_id: i32,
        referring_manager_id: i32,
        reason: &str,
    ) -> Result<employee_referral::Model, InternalError> {
        let row = employee_referral::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            referred_user_id: Set(referred_user_id),
            referring_manager_id: Set(referring_manager_id),
            status: Set("pending".to_string()),
            reason: Set(reason.to_string()),
            admin_notes: Set(None),
            created_at: Set(Utc::now().timestamp_millis()),
            reviewed_at: Set(None),
        };
        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_referral", e))
    }

    pub async fn get_by_id(
        &self,
        id: i32,
    ) -> Result<Option<employee_referral::Model>, InternalError> {
        EmployeeReferral::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_referral_by_id", e))
    }

    /// All referrals, newest first, optionally narrowed to one status.
    pub async fn list(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<employee_referral::Model>, InternalError> {
        let mut select = EmployeeReferral::find();
        if let Some(status) = status {
            select = select.filter(employee_referral::Column::Status.eq(status));
        }
        select
            .order_by_desc(employee_referral::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_referrals", e))
    }

    /// Referrals submitted by one manager, newest first.
    pub async fn list_by_manager(
        &self,
        manager_id: i32,
        status: Option<&str>,
    ) -> Result<Vec<employee_referral::Model>, InternalError> {
        let mut select = EmployeeReferral::find()
            .filter(employee_referral::Column::ReferringManagerId.eq(manager_id));
        if let Some(status) = status {
            select = select.filter(employee_referral::Column::Status.eq(status));
        }
        select
            .order_by_desc(employee_referral::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_referrals_by_manager", e))
    }

    /// An open referral for this user, if one exists. Used to reject
    /// duplicate submissions while one is still pending.
    pub async fn find_pending_for_user(
        &self,
        referred_user_id: i32,
    ) -> Result<Option<employee_referral::Model>, InternalError> {
        EmployeeReferral::find()
            .filter(employee_referral::Column::ReferredUserId.eq(referred_user_id))
            .filter(employee_referral::Column::Status.eq("pending"))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_pending_referral", e))
    }

    pub async fn update_review(
        &self,
        id: i32,
        status: &str,
        admin_notes: Option<&str>,
    ) -> Result<employee_referral::Model, InternalError> {
        let row = employee_referral::ActiveModel {
            id: Set(id),
            status: Set(status.to_string()),
            admin_notes: Set(admin_notes.map(|s| s.to_string())),
            reviewed_at: Set(Some(Utc::now().timestamp_millis())),
            ..Default::default()
        };
        row.update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_referral_review", e))
    }
}
