// Test utilities shared across unit and integration tests
// Only compiled when running tests

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use crate::domain::Role;
use crate::stores::{AuditStore, ReferralStore, UserStore};
use crate::types::db::user;
use crate::types::internal::{Actor, RequestContext};

/// Creates an in-memory database with migrations applied plus the stores.
///
/// Returns (db, user_store, audit_store, referral_store). Callers can
/// discard what they don't need:
/// ```rust
/// let (db, user_store, _audit, _referrals) = setup_test_stores().await;
/// ```
pub async fn setup_test_stores() -> (
    DatabaseConnection,
    Arc<UserStore>,
    Arc<AuditStore>,
    Arc<ReferralStore>,
) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let user_store = Arc::new(UserStore::new(db.clone()));
    let audit_store = Arc::new(AuditStore::new(db.clone()));
    let referral_store = Arc::new(ReferralStore::new(db.clone()));

    (db, user_store, audit_store, referral_store)
}

/// Insert a user row directly, bypassing the service layer.
pub async fn seed_user(
    db: &DatabaseConnection,
    email: &str,
    role: Role,
    reports_to: Option<i32>,
    is_active: bool,
) -> user::Model {
    let now = Utc::now().timestamp_millis();
    user::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        email: Set(email.to_string()),
        full_name: Set(Some(name_from_email(email))),
        password_hash: Set("$argon2id$test$placeholder".to_string()),
        role: Set(role.as_str().to_string()),
        is_active: Set(is_active),
        reports_to: Set(reports_to),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed user")
}

fn name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

/// A request context authenticated as the given user.
pub fn context_for(user: &user::Model) -> RequestContext {
    RequestContext::new()
        .with_ip_address(Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))))
        .with_actor(Actor {
            id: user.id,
            email: user.email.clone(),
            role: user.role.parse().expect("Seeded role must parse"),
        })
}
