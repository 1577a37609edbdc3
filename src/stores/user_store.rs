use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::Role;
use crate::errors::InternalError;
use crate::types::db::user::{self, Entity as User};

/// Repository for user accounts.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_user_by_id", e))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_user_by_email", e))
    }

    /// All users, newest first.
    pub async fn list_all(&self) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn insert_user(
        &self,
        email: &str,
        full_name: Option<&str>,
        password_hash: &str,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp_millis();
        let row = user::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            email: Set(email.to_string()),
            full_name: Set(full_name.map(|s| s.to_string())),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.as_str().to_string()),
            is_active: Set(true),
            reports_to: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_user", e))
    }

    /// Apply a role change and its subordinate reassignments atomically.
    ///
    /// Every reassigned subordinate is repointed before the target's own row
    /// changes, so a failure part-way leaves nothing applied.
    pub async fn apply_role_change(
        &self,
        target_id: i32,
        new_role: Role,
        reports_to: Option<i32>,
        reassignments: &BTreeMap<i32, i32>,
    ) -> Result<user::Model, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("begin_role_change", e))?;

        let now = Utc::now().timestamp_millis();

        for (&subordinate_id, &manager_id) in reassignments {
            let row = user::ActiveModel {
                id: Set(subordinate_id),
                reports_to: Set(Some(manager_id)),
                updated_at: Set(now),
                ..Default::default()
            };
            row.update(&txn)
                .await
                .map_err(|e| InternalError::database("reassign_subordinate", e))?;
        }

        let row = user::ActiveModel {
            id: Set(target_id),
            role: Set(new_role.as_str().to_string()),
            reports_to: Set(reports_to),
            updated_at: Set(now),
            ..Default::default()
        };
        let updated = row
            .update(&txn)
            .await
            .map_err(|e| InternalError::database("update_user_role", e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::database("commit_role_change", e))?;

        Ok(updated)
    }

    pub async fn set_active(
        &self,
        target_id: i32,
        is_active: bool,
    ) -> Result<user::Model, InternalError> {
        let row = user::ActiveModel {
            id: Set(target_id),
            is_active: Set(is_active),
            updated_at: Set(Utc::now().timestamp_millis()),
            ..Default::default()
        };
        row.update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_user_active", e))
    }
}
