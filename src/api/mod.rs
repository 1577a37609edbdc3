// API layer - HTTP endpoints
pub mod audit_logs;
pub mod auth;
pub mod health;
pub mod referrals;
pub mod users;

use std::net::IpAddr;
use std::sync::Arc;

pub use audit_logs::AuditLogApi;
pub use auth::{AuthApi, BearerAuth};
pub use health::HealthApi;
use poem::Request;
pub use referrals::ReferralApi;
pub use users::UserAdminApi;

use crate::errors::api::AuthError;
use crate::services::auth_service::parse_role;
use crate::services::TokenService;
use crate::stores::UserStore;
use crate::types::internal::{Actor, RequestContext};

pub trait Api {
    fn extract_ip_address(&self, req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        // Fall back to remote address
        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }
}

/// Resolve a bearer token into an authenticated request context.
///
/// The token's claims are checked against the database so a user blocked
/// after the token was issued is rejected immediately, not at expiry.
pub async fn authenticate(
    token_service: &TokenService,
    user_store: &Arc<UserStore>,
    token: &str,
    ip_address: Option<IpAddr>,
) -> Result<RequestContext, AuthError> {
    let claims = token_service.validate_jwt(token)?;
    let user_id: i32 = claims
        .sub
        .parse()
        .map_err(|_| AuthError::invalid_token())?;

    let user = user_store
        .get_by_id(user_id)
        .await
        .map_err(|e| AuthError::internal_error(e.to_string()))?
        .ok_or_else(AuthError::invalid_token)?;

    if !user.is_active {
        return Err(AuthError::account_blocked());
    }

    let role = parse_role(&user)?;
    Ok(RequestContext::new()
        .with_ip_address(ip_address)
        .with_actor(Actor {
            id: user.id,
            email: user.email,
            role,
        })
        .with_claims(claims))
}
