#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sea_orm::DatabaseConnection;
    use serde_json::json;

    use crate::domain::Role;
    use crate::errors::api::ApiError;
    use crate::services::audit_service::{AuditLogFilter, AuditLogService};
    use crate::stores::AuditStore;
    use crate::test::utils::{context_for, seed_user, setup_test_stores};
    use crate::types::internal::AuditEvent;

    async fn setup() -> (DatabaseConnection, Arc<AuditStore>, AuditLogService) {
        let (db, _users, audit_store, _referrals) = setup_test_stores().await;
        let service = AuditLogService::new(audit_store.clone());
        (db, audit_store, service)
    }

    fn event(action_type: &str, actor_email: &str, target_id: i32) -> AuditEvent {
        AuditEvent {
            action_type: action_type.to_string(),
            actor_id: Some(1),
            actor_email: Some(actor_email.to_string()),
            target_type: "user".to_string(),
            target_id,
            details: json!({"user_email": "t@x.com"}),
            ip_address: None,
        }
    }

    #[tokio::test]
    async fn test_query_is_admin_only() {
        let (db, _store, service) = setup().await;
        let manager = seed_user(&db, "mgr@x.com", Role::Manager, None, true).await;

        let result = service
            .query(&context_for(&manager), &AuditLogFilter::default())
            .await;
        match result {
            Err(ApiError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden"),
        }
    }

    #[tokio::test]
    async fn test_query_filters_by_action_and_actor() {
        let (db, store, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;

        store.record(event("user_blocked", "admin@x.com", 2)).await;
        store.record(event("user_role_updated", "admin@x.com", 3)).await;
        store.record(event("user_blocked", "other@x.com", 4)).await;

        let filter = AuditLogFilter {
            action_type: Some("user_blocked".to_string()),
            actor_email: Some("admin@x.com".to_string()),
            ..Default::default()
        };
        let logs = service.query(&context_for(&admin), &filter).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].target_id, 2);
    }

    #[tokio::test]
    async fn test_day_window_excludes_other_days() {
        let (db, store, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;

        store.record(event("user_blocked", "admin@x.com", 2)).await;

        let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let filter = AuditLogFilter {
            from_day: Some(today.clone()),
            to_day: Some(today),
            ..Default::default()
        };
        let logs = service.query(&context_for(&admin), &filter).await.unwrap();
        assert_eq!(logs.len(), 1);

        // A window entirely in the past matches nothing
        let filter = AuditLogFilter {
            from_day: Some("2020-01-01".to_string()),
            to_day: Some("2020-01-02".to_string()),
            ..Default::default()
        };
        let logs = service.query(&context_for(&admin), &filter).await.unwrap();
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn test_exact_bounds_take_precedence_over_day_filters() {
        let (db, store, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;

        store.record(event("user_blocked", "admin@x.com", 2)).await;

        // The day filter alone would match, but the exact upper bound sits
        // in the past and wins
        let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let filter = AuditLogFilter {
            from_day: Some(today.clone()),
            to_day: Some(today),
            to_date: Some("2020-06-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        let logs = service.query(&context_for(&admin), &filter).await.unwrap();
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_day_is_a_bad_request() {
        let (db, _store, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;

        let filter = AuditLogFilter {
            from_day: Some("01/02/2024".to_string()),
            ..Default::default()
        };
        let result = service.query(&context_for(&admin), &filter).await;
        match result {
            Err(ApiError::BadRequest(_)) => {}
            _ => panic!("Expected BadRequest"),
        }
    }

    #[tokio::test]
    async fn test_results_carry_rendered_details() {
        let (db, store, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;

        store.record(event("user_blocked", "admin@x.com", 2)).await;

        let logs = service
            .query(&context_for(&admin), &AuditLogFilter::default())
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].target_description, "t@x.com");
        assert!(logs[0]
            .detail_fields
            .iter()
            .any(|f| f.label == "User Email" && f.value == "t@x.com"));
    }
}
