// Services layer - Business logic and orchestration
pub mod audit_service;
pub mod auth_service;
pub mod crypto;
pub mod referral_service;
pub mod token_service;
pub mod user_service;

pub use audit_service::{AuditLogFilter, AuditLogService};
pub use auth_service::AuthService;
pub use referral_service::ReferralService;
pub use token_service::TokenService;
pub use user_service::UserService;
