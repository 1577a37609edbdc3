// End-to-end flow: an admin changes a role and blocks a user, then reads
// the audit trail back through the day-window filters.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

use storefront_backend::domain::Role;
use storefront_backend::services::{AuditLogFilter, AuditLogService, UserService};
use storefront_backend::stores::{AuditStore, UserStore};
use storefront_backend::types::db::user;
use storefront_backend::types::dto::users::RoleUpdateRequest;
use storefront_backend::types::internal::{Actor, RequestContext};

async fn setup() -> (Arc<UserStore>, UserService, AuditLogService) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    Migrator::up(&db, None).await.expect("Failed to migrate");

    let user_store = Arc::new(UserStore::new(db.clone()));
    let audit_store = Arc::new(AuditStore::new(db));
    let user_service = UserService::new(user_store.clone(), audit_store.clone());
    let audit_service = AuditLogService::new(audit_store);
    (user_store, user_service, audit_service)
}

async fn seed(store: &UserStore, email: &str, role: Role) -> user::Model {
    store
        .insert_user(email, None, "$argon2id$unused$hash", role)
        .await
        .expect("Failed to seed user")
}

fn context_for(user: &user::Model) -> RequestContext {
    RequestContext::new()
        .with_ip_address(Some(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9))))
        .with_actor(Actor {
            id: user.id,
            email: user.email.clone(),
            role: user.role.parse().expect("Seeded role must parse"),
        })
}

#[tokio::test]
async fn admin_actions_appear_in_filtered_audit_trail() {
    let (user_store, user_service, audit_service) = setup().await;
    let admin = seed(&user_store, "admin@x.com", Role::Admin).await;
    let manager = seed(&user_store, "mgr@x.com", Role::Manager).await;
    let customer = seed(&user_store, "cust@x.com", Role::Customer).await;
    let ctx = context_for(&admin);

    // Promote the customer to employee under the manager
    let request = RoleUpdateRequest {
        role: "employee".to_string(),
        manager_id: Some(manager.id),
        subordinate_reassignments: None,
    };
    let updated = user_service
        .change_role(&ctx, customer.id, &request)
        .await
        .expect("Role change failed");
    assert_eq!(updated.role, "employee");
    assert_eq!(updated.reports_to, Some(manager.id));

    // Block the freshly promoted employee
    user_service
        .set_active(&ctx, customer.id, false)
        .await
        .expect("Block failed");

    // Everything shows up unfiltered, newest first
    let all = audit_service
        .query(&ctx, &AuditLogFilter::default())
        .await
        .expect("Query failed");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].action_type, "user_blocked");
    assert_eq!(all[1].action_type, "user_role_updated");
    assert_eq!(all[0].target_description, "cust@x.com");
    assert_eq!(all[0].ip_address.as_deref(), Some("203.0.113.9"));

    // A day window around today (in a non-UTC viewer timezone) still
    // includes the events
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let filter = AuditLogFilter {
        from_day: Some(today.clone()),
        to_day: Some(today),
        tz_offset_minutes: Some(0),
        ..Default::default()
    };
    let windowed = audit_service.query(&ctx, &filter).await.expect("Query failed");
    assert_eq!(windowed.len(), 2);

    // A window in the distant past excludes them
    let filter = AuditLogFilter {
        from_day: Some("2000-01-01".to_string()),
        to_day: Some("2000-12-31".to_string()),
        tz_offset_minutes: Some(-480),
        ..Default::default()
    };
    let empty = audit_service.query(&ctx, &filter).await.expect("Query failed");
    assert!(empty.is_empty());

    // Rendered detail fields use display labels and friendly values
    let blocked = &all[0];
    assert!(blocked
        .detail_fields
        .iter()
        .any(|f| f.label == "New Status" && f.value == "Blocked"));
    assert!(blocked
        .detail_fields
        .iter()
        .any(|f| f.label == "Previous Status" && f.value == "Active"));
}
