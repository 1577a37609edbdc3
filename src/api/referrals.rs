use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Path, param::Query, payload::Json, OpenApi, Tags};

use crate::api::{authenticate, Api, BearerAuth};
use crate::errors::api::ApiError;
use crate::services::{ReferralService, TokenService};
use crate::stores::UserStore;
use crate::types::dto::referrals::{ReferralCreateRequest, ReferralOut, ReferralReviewRequest};
use crate::types::internal::RequestContext;

/// Promotion referral endpoints
pub struct ReferralApi {
    referral_service: Arc<ReferralService>,
    token_service: Arc<TokenService>,
    user_store: Arc<UserStore>,
}

impl ReferralApi {
    pub fn new(
        referral_service: Arc<ReferralService>,
        token_service: Arc<TokenService>,
        user_store: Arc<UserStore>,
    ) -> Self {
        Self {
            referral_service,
            token_service,
            user_store,
        }
    }

    async fn context(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, ApiError> {
        let ip = self.extract_ip_address(req);
        Ok(authenticate(&self.token_service, &self.user_store, &auth.0.token, ip).await?)
    }
}

impl Api for ReferralApi {}

/// API tags for referral endpoints
#[derive(Tags)]
enum ReferralTags {
    /// Promotion referral endpoints
    Referrals,
}

#[OpenApi(prefix_path = "/referrals")]
impl ReferralApi {
    /// Submit a referral proposing an employee for promotion to manager
    #[oai(path = "/", method = "post", tag = "ReferralTags::Referrals")]
    async fn create(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<ReferralCreateRequest>,
    ) -> Result<Json<ReferralOut>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        Ok(Json(self.referral_service.create(&ctx, &body.0).await?))
    }

    /// List referrals (admins see all, managers their own)
    #[oai(path = "/", method = "get", tag = "ReferralTags::Referrals")]
    async fn list(
        &self,
        req: &Request,
        auth: BearerAuth,
        status: Query<Option<String>>,
    ) -> Result<Json<Vec<ReferralOut>>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        let referrals = self
            .referral_service
            .list(&ctx, status.0.as_deref())
            .await?;
        Ok(Json(referrals))
    }

    /// Approve a pending referral, promoting the employee to manager
    #[oai(path = "/:id/approve", method = "put", tag = "ReferralTags::Referrals")]
    async fn approve(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<ReferralReviewRequest>,
    ) -> Result<Json<ReferralOut>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        Ok(Json(
            self.referral_service.approve(&ctx, id.0, &body.0).await?,
        ))
    }

    /// Reject a pending referral
    #[oai(path = "/:id/reject", method = "put", tag = "ReferralTags::Referrals")]
    async fn reject(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<ReferralReviewRequest>,
    ) -> Result<Json<ReferralOut>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        Ok(Json(
            self.referral_service.reject(&ctx, id.0, &body.0).await?,
        ))
    }

    /// Withdraw a pending referral
    #[oai(path = "/:id", method = "delete", tag = "ReferralTags::Referrals")]
    async fn cancel(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<ReferralOut>, ApiError> {
        let ctx = self.context(req, &auth).await?;
        Ok(Json(self.referral_service.cancel(&ctx, id.0).await?))
    }
}
