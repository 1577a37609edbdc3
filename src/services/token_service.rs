use std::fmt;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::Role;
use crate::errors::api::AuthError;
use crate::types::internal::Claims;

/// Manages JWT generation and validation
pub struct TokenService {
    jwt_secret: String,
    jwt_expiration_minutes: i64,
}

impl TokenService {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            jwt_expiration_minutes: 15,
        }
    }

    /// Seconds an access token remains valid after issuance.
    pub fn expires_in_seconds(&self) -> i64 {
        self.jwt_expiration_minutes * 60
    }

    /// Generate a JWT for the given user id and role
    ///
    /// # Returns
    /// * `Result<String, AuthError>` - The encoded JWT or an error
    pub fn generate_jwt(&self, user_id: i32, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let expiration = now + self.expires_in_seconds();

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            exp: expiration,
            iat: now,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::internal_error(format!("Failed to generate JWT: {}", e)))?;

        Ok(token)
    }

    /// Validate a JWT and return the claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            if e.to_string().contains("ExpiredSignature") {
                AuthError::expired_token()
            } else {
                AuthError::invalid_token()
            }
        })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .finish()
    }
}
