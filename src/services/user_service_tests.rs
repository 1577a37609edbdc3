#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use sea_orm::DatabaseConnection;

    use crate::domain::Role;
    use crate::errors::api::ApiError;
    use crate::services::UserService;
    use crate::stores::{AuditQuery, AuditStore, UserStore};
    use crate::test::utils::{context_for, seed_user, setup_test_stores};
    use crate::types::dto::users::RoleUpdateRequest;

    async fn setup() -> (DatabaseConnection, Arc<UserStore>, Arc<AuditStore>, UserService) {
        let (db, user_store, audit_store, _referrals) = setup_test_stores().await;
        let service = UserService::new(user_store.clone(), audit_store.clone());
        (db, user_store, audit_store, service)
    }

    fn role_request(role: &str) -> RoleUpdateRequest {
        RoleUpdateRequest {
            role: role.to_string(),
            manager_id: None,
            subordinate_reassignments: None,
        }
    }

    #[tokio::test]
    async fn test_promote_customer_to_employee_assigns_manager() {
        let (db, user_store, _audit, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let manager = seed_user(&db, "mgr@x.com", Role::Manager, None, true).await;
        let customer = seed_user(&db, "cust@x.com", Role::Customer, None, true).await;
        let ctx = context_for(&admin);

        let plan = service
            .plan_role_change(&ctx, customer.id, "employee")
            .await
            .unwrap();
        assert_eq!(plan.decision, "needs_reassignment");
        assert!(plan.requires_reporting_manager);
        assert_eq!(plan.available_manager_ids, vec![manager.id]);

        let mut request = role_request("employee");
        request.manager_id = Some(manager.id);
        let updated = service.change_role(&ctx, customer.id, &request).await.unwrap();

        assert_eq!(updated.role, "employee");
        assert_eq!(updated.reports_to, Some(manager.id));

        let stored = user_store.get_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(stored.role, "employee");
        assert_eq!(stored.reports_to, Some(manager.id));
    }

    #[tokio::test]
    async fn test_promote_customer_with_zero_managers_suggests_manager() {
        let (db, _users, _audit, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let customer = seed_user(&db, "cust@x.com", Role::Customer, None, true).await;
        let ctx = context_for(&admin);

        let plan = service
            .plan_role_change(&ctx, customer.id, "employee")
            .await
            .unwrap();
        assert_eq!(plan.decision, "suggest_manager");

        let result = service
            .change_role(&ctx, customer.id, &role_request("employee"))
            .await;
        match result {
            Err(ApiError::BadRequest(_)) => {}
            _ => panic!("Expected BadRequest"),
        }
    }

    #[tokio::test]
    async fn test_manager_actor_cannot_change_roles() {
        let (db, _users, _audit, service) = setup().await;
        let manager = seed_user(&db, "mgr@x.com", Role::Manager, None, true).await;
        let customer = seed_user(&db, "cust@x.com", Role::Customer, None, true).await;
        let ctx = context_for(&manager);

        let result = service
            .change_role(&ctx, customer.id, &role_request("manager"))
            .await;
        match result {
            Err(ApiError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden"),
        }
    }

    #[tokio::test]
    async fn test_cannot_change_own_role() {
        let (db, _users, _audit, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let ctx = context_for(&admin);

        let result = service
            .change_role(&ctx, admin.id, &role_request("manager"))
            .await;
        match result {
            Err(ApiError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden"),
        }
    }

    #[tokio::test]
    async fn test_cannot_assign_admin_role() {
        let (db, _users, _audit, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let manager = seed_user(&db, "mgr@x.com", Role::Manager, None, true).await;
        let ctx = context_for(&admin);

        let result = service
            .change_role(&ctx, manager.id, &role_request("admin"))
            .await;
        match result {
            Err(ApiError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden"),
        }
    }

    #[tokio::test]
    async fn test_demoting_last_manager_with_subordinates_is_blocked() {
        let (db, user_store, _audit, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let manager = seed_user(&db, "mgr@x.com", Role::Manager, None, true).await;
        let employee = seed_user(&db, "emp@x.com", Role::Employee, Some(manager.id), true).await;
        let ctx = context_for(&admin);

        let result = service
            .change_role(&ctx, manager.id, &role_request("customer"))
            .await;
        match result {
            Err(ApiError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden"),
        }

        // No partial mutation
        let stored = user_store.get_by_id(employee.id).await.unwrap().unwrap();
        assert_eq!(stored.reports_to, Some(manager.id));
    }

    #[tokio::test]
    async fn test_demoting_manager_reassigns_subordinates_to_default() {
        let (db, user_store, _audit, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let departing = seed_user(&db, "mgr1@x.com", Role::Manager, None, true).await;
        let absorbing = seed_user(&db, "mgr2@x.com", Role::Manager, None, true).await;
        let emp1 = seed_user(&db, "emp1@x.com", Role::Employee, Some(departing.id), true).await;
        let emp2 = seed_user(&db, "emp2@x.com", Role::Employee, Some(departing.id), true).await;
        let ctx = context_for(&admin);

        let updated = service
            .change_role(&ctx, departing.id, &role_request("customer"))
            .await
            .unwrap();
        assert_eq!(updated.role, "customer");
        assert_eq!(updated.reports_to, None);

        for id in [emp1.id, emp2.id] {
            let stored = user_store.get_by_id(id).await.unwrap().unwrap();
            assert_eq!(stored.reports_to, Some(absorbing.id));
        }
    }

    #[tokio::test]
    async fn test_reassignment_overrides_win_over_defaults() {
        let (db, user_store, _audit, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let departing = seed_user(&db, "mgr1@x.com", Role::Manager, None, true).await;
        let mgr2 = seed_user(&db, "mgr2@x.com", Role::Manager, None, true).await;
        let mgr3 = seed_user(&db, "mgr3@x.com", Role::Manager, None, true).await;
        let emp1 = seed_user(&db, "emp1@x.com", Role::Employee, Some(departing.id), true).await;
        let emp2 = seed_user(&db, "emp2@x.com", Role::Employee, Some(departing.id), true).await;
        let ctx = context_for(&admin);

        let mut request = role_request("customer");
        request.subordinate_reassignments =
            Some(HashMap::from([(emp2.id.to_string(), mgr3.id)]));
        service.change_role(&ctx, departing.id, &request).await.unwrap();

        // emp1 falls back to the first available manager, emp2 follows the override
        let stored1 = user_store.get_by_id(emp1.id).await.unwrap().unwrap();
        let stored2 = user_store.get_by_id(emp2.id).await.unwrap().unwrap();
        assert_eq!(stored1.reports_to, Some(mgr2.id));
        assert_eq!(stored2.reports_to, Some(mgr3.id));
    }

    #[tokio::test]
    async fn test_reassignment_to_unavailable_manager_is_rejected() {
        let (db, _users, _audit, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let departing = seed_user(&db, "mgr1@x.com", Role::Manager, None, true).await;
        let _mgr2 = seed_user(&db, "mgr2@x.com", Role::Manager, None, true).await;
        let emp = seed_user(&db, "emp@x.com", Role::Employee, Some(departing.id), true).await;
        let ctx = context_for(&admin);

        // The departing manager is not an available target
        let mut request = role_request("customer");
        request.subordinate_reassignments =
            Some(HashMap::from([(emp.id.to_string(), departing.id)]));
        let result = service.change_role(&ctx, departing.id, &request).await;
        match result {
            Err(ApiError::BadRequest(_)) => {}
            _ => panic!("Expected BadRequest"),
        }
    }

    #[tokio::test]
    async fn test_unknown_role_and_missing_target() {
        let (db, _users, _audit, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let customer = seed_user(&db, "cust@x.com", Role::Customer, None, true).await;
        let ctx = context_for(&admin);

        match service.change_role(&ctx, customer.id, &role_request("wizard")).await {
            Err(ApiError::BadRequest(_)) => {}
            _ => panic!("Expected BadRequest"),
        }
        match service.change_role(&ctx, 9999, &role_request("manager")).await {
            Err(ApiError::NotFound(_)) => {}
            _ => panic!("Expected NotFound"),
        }
    }

    #[tokio::test]
    async fn test_role_change_writes_audit_log() {
        let (db, _users, audit_store, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let customer = seed_user(&db, "cust@x.com", Role::Customer, None, true).await;
        let ctx = context_for(&admin);

        service
            .change_role(&ctx, customer.id, &role_request("manager"))
            .await
            .unwrap();

        let logs = audit_store
            .query(&AuditQuery {
                action_type: Some("user_role_updated".to_string()),
                limit: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        let log = &logs[0];
        assert_eq!(log.actor_id, Some(admin.id));
        assert_eq!(log.actor_email.as_deref(), Some("admin@x.com"));
        assert_eq!(log.target_id, customer.id);
        assert_eq!(log.ip_address.as_deref(), Some("10.0.0.1"));

        let details: serde_json::Value =
            serde_json::from_str(log.details.as_deref().unwrap()).unwrap();
        assert_eq!(details["old_role"], "customer");
        assert_eq!(details["new_role"], "manager");
        assert_eq!(details["user_email"], "cust@x.com");
    }

    #[tokio::test]
    async fn test_admin_blocks_employee_and_audit_is_written() {
        let (db, user_store, audit_store, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let manager = seed_user(&db, "mgr@x.com", Role::Manager, None, true).await;
        let employee = seed_user(&db, "emp@x.com", Role::Employee, Some(manager.id), true).await;
        let ctx = context_for(&admin);

        let updated = service.set_active(&ctx, employee.id, false).await.unwrap();
        assert!(!updated.is_active);

        let stored = user_store.get_by_id(employee.id).await.unwrap().unwrap();
        assert!(!stored.is_active);

        let logs = audit_store
            .query(&AuditQuery {
                action_type: Some("user_blocked".to_string()),
                limit: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        let details: serde_json::Value =
            serde_json::from_str(logs[0].details.as_deref().unwrap()).unwrap();
        assert_eq!(details["old_status"], true);
        assert_eq!(details["new_status"], false);
    }

    #[tokio::test]
    async fn test_manager_cannot_block_manager_or_admin() {
        let (db, _users, _audit, service) = setup().await;
        let _admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let actor = seed_user(&db, "mgr1@x.com", Role::Manager, None, true).await;
        let other = seed_user(&db, "mgr2@x.com", Role::Manager, None, true).await;
        let ctx = context_for(&actor);

        let result = service.set_active(&ctx, other.id, false).await;
        match result {
            Err(ApiError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden"),
        }
    }

    #[tokio::test]
    async fn test_manager_can_block_customer() {
        let (db, _users, _audit, service) = setup().await;
        let actor = seed_user(&db, "mgr@x.com", Role::Manager, None, true).await;
        let customer = seed_user(&db, "cust@x.com", Role::Customer, None, true).await;
        let ctx = context_for(&actor);

        let updated = service.set_active(&ctx, customer.id, false).await.unwrap();
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_cannot_block_self() {
        let (db, _users, _audit, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let ctx = context_for(&admin);

        let result = service.set_active(&ctx, admin.id, false).await;
        match result {
            Err(ApiError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden"),
        }
    }

    #[tokio::test]
    async fn test_list_users_requires_admin_or_manager() {
        let (db, _users, _audit, service) = setup().await;
        let admin = seed_user(&db, "admin@x.com", Role::Admin, None, true).await;
        let customer = seed_user(&db, "cust@x.com", Role::Customer, None, true).await;

        let listed = service.list_users(&context_for(&admin)).await.unwrap();
        assert_eq!(listed.len(), 2);

        let result = service.list_users(&context_for(&customer)).await;
        match result {
            Err(ApiError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden"),
        }
    }
}
