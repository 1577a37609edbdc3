use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Settings;
use crate::services::{AuditLogService, AuthService, ReferralService, TokenService, UserService};
use crate::stores::{AuditStore, ReferralStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// All stores and services are created once at startup and shared across
/// the API structs through `Arc`s.
pub struct AppData {
    pub db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub audit_store: Arc<AuditStore>,
    pub referral_store: Arc<ReferralStore>,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub referral_service: Arc<ReferralService>,
    pub audit_service: Arc<AuditLogService>,
}

impl AppData {
    /// Wire up stores and services.
    ///
    /// The database connection must already be migrated.
    pub fn init(db: DatabaseConnection, settings: &Settings) -> Arc<Self> {
        tracing::info!("Initializing application data");

        let user_store = Arc::new(UserStore::new(db.clone()));
        let audit_store = Arc::new(AuditStore::new(db.clone()));
        let referral_store = Arc::new(ReferralStore::new(db.clone()));

        let token_service = Arc::new(TokenService::new(settings.jwt_secret.clone()));
        let auth_service = Arc::new(AuthService::new(
            user_store.clone(),
            token_service.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            user_store.clone(),
            audit_store.clone(),
        ));
        let referral_service = Arc::new(ReferralService::new(
            referral_store.clone(),
            user_store.clone(),
            audit_store.clone(),
        ));
        let audit_service = Arc::new(AuditLogService::new(audit_store.clone()));

        Arc::new(Self {
            db,
            user_store,
            audit_store,
            referral_store,
            token_service,
            auth_service,
            user_service,
            referral_service,
            audit_service,
        })
    }
}
