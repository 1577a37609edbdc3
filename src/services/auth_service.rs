use std::str::FromStr;
use std::sync::Arc;

use crate::domain::Role;
use crate::errors::api::AuthError;
use crate::services::{crypto, TokenService};
use crate::stores::UserStore;
use crate::types::db::user;

/// Orchestrates the login flow: credential verification, active-status
/// enforcement, and token issuance.
pub struct AuthService {
    user_store: Arc<UserStore>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_store: Arc<UserStore>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_store,
            token_service,
        }
    }

    /// Authenticate by email and password, returning an access token.
    ///
    /// Unknown email and wrong password produce the same error, so callers
    /// cannot probe which addresses exist. Blocked accounts are rejected
    /// after the password check.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, i64), AuthError> {
        let user = self
            .user_store
            .get_by_email(email)
            .await
            .map_err(|e| AuthError::internal_error(e.to_string()))?
            .ok_or_else(AuthError::invalid_credentials)?;

        let verified = crypto::verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::internal_error(e.to_string()))?;
        if !verified {
            tracing::info!(email = %email, "Login rejected: bad password");
            return Err(AuthError::invalid_credentials());
        }

        if !user.is_active {
            tracing::info!(user_id = user.id, "Login rejected: account blocked");
            return Err(AuthError::account_blocked());
        }

        let role = parse_role(&user)?;
        let token = self.token_service.generate_jwt(user.id, role)?;
        Ok((token, self.token_service.expires_in_seconds()))
    }
}

/// Parse a stored role string, surfacing corrupt rows as internal errors.
pub fn parse_role(user: &user::Model) -> Result<Role, AuthError> {
    Role::from_str(&user.role)
        .map_err(|e| AuthError::internal_error(format!("User {} has {}", user.id, e)))
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod auth_service_tests;
