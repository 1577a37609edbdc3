use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Path, param::Query, payload::Json, OpenApi, Tags};

use crate::api::{authenticate, Api, BearerAuth};
use crate::errors::api::ApiError;
use crate::services::{TokenService, UserService};
use crate::stores::UserStore;
use crate::types::dto::users::{
    BlockUpdateRequest, RolePlanResponse, RoleUpdateRequest, RoleUpdateResponse, UserOut,
};
use crate::types::internal::RequestContext;

/// User administration endpoints (listing, role changes, block/unblock)
pub struct UserAdminApi {
    user_service: Arc<UserService>,
    token_service: Arc<TokenService>,
    user_store: Arc<UserStore>,
}

impl UserAdminApi {
    pub fn new(
        user_service: Arc<UserService>,
        token_service: Arc<TokenService>,
        user_store: Arc<UserStore>,
    ) -> Self {
        Self {
            user_service,
            token_service,
            user_store,
        }
    }

    async fn context(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, ApiError> {
        let ip = self.extract_ip_address(req);
        Ok(authenticate(&self.token_service, &self.user_store, &auth.0.token, ip).await?)
    }
}

impl Api for UserAdminApi {}

/// API tags for user administration endpoints
#[derive(Tags)]
enum UserTags {
    /// User administration endpoints
    Users,
}

#[OpenApi(prefix_path = "/admin")]
impl UserAdminApi {
    /// List all users, newest first
    #[oai(path = "/users", method = "get", tag = "UserTags::Users")]
    async fn list_users(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<Vec<UserOut>>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        Ok(Json(self.user_service.list_users(&ctx).await?))
    }

    /// Preview the decision for changing a user's role
    ///
    /// Returns whether the change can proceed as-is, is blocked, or needs a
    /// reporting manager and/or subordinate reassignments first. Nothing is
    /// mutated.
    #[oai(
        path = "/users/:id/role-plan",
        method = "get",
        tag = "UserTags::Users"
    )]
    async fn plan_role_change(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        new_role: Query<String>,
    ) -> Result<Json<RolePlanResponse>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let plan = self
            .user_service
            .plan_role_change(&ctx, id.0, &new_role.0)
            .await?;
        Ok(Json(plan))
    }

    /// Change a user's role
    ///
    /// The decision is re-derived on the server; when reassignments are
    /// required the request must carry valid inputs or nothing is applied.
    #[oai(path = "/users/:id/role", method = "put", tag = "UserTags::Users")]
    async fn change_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<RoleUpdateRequest>,
    ) -> Result<Json<RoleUpdateResponse>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let user = self.user_service.change_role(&ctx, id.0, &body.0).await?;
        Ok(Json(RoleUpdateResponse {
            ok: true,
            message: format!("Role updated to {}", user.role),
            user,
        }))
    }

    /// Block or unblock a user
    #[oai(path = "/users/:id/block", method = "put", tag = "UserTags::Users")]
    async fn set_block(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<BlockUpdateRequest>,
    ) -> Result<Json<UserOut>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let user = self
            .user_service
            .set_active(&ctx, id.0, body.0.is_active)
            .await?;
        Ok(Json(user))
    }
}
