use std::sync::Arc;

use poem::Request;
use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};

use crate::api::{authenticate, Api};
use crate::errors::api::AuthError;
use crate::services::{AuthService, TokenService};
use crate::stores::UserStore;
use crate::types::dto::auth::{LoginRequest, TokenResponse, WhoAmIResponse};

/// Authentication API endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
    token_service: Arc<TokenService>,
    user_store: Arc<UserStore>,
}

impl AuthApi {
    pub fn new(
        auth_service: Arc<AuthService>,
        token_service: Arc<TokenService>,
        user_store: Arc<UserStore>,
    ) -> Self {
        Self {
            auth_service,
            token_service,
            user_store,
        }
    }
}

impl Api for AuthApi {}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with email and password to receive an access token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let (access_token, expires_in) =
            self.auth_service.login(&body.email, &body.password).await?;

        Ok(Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }))
    }

    /// Verify the bearer token and return the authenticated user
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<WhoAmIResponse>, AuthError> {
        let ip = self.extract_ip_address(req);
        let ctx = authenticate(&self.token_service, &self.user_store, &auth.0.token, ip).await?;
        let actor = ctx
            .actor
            .ok_or_else(|| AuthError::internal_error("Missing actor after authentication"))?;
        let expires_at = ctx
            .claims
            .map(|c| c.exp)
            .ok_or_else(|| AuthError::internal_error("Missing claims after authentication"))?;

        Ok(Json(WhoAmIResponse {
            user_id: actor.id,
            email: actor.email,
            role: actor.role.as_str().to_string(),
            expires_at,
        }))
    }
}
