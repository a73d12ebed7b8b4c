use std::sync::Arc;

use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{authenticate, BearerAuth};
use crate::errors::ApiError;
use crate::services::{FamilyService, TokenService};
use crate::types::dto::family::{
    CreateFamilyRequest, FamilyCreateResponse, FamilyInfoResponse, FamilyJoinResponse,
    FamilyMembersResponse, JoinFamilyRequest,
};

/// Family membership endpoints
pub struct FamilyApi {
    family_service: Arc<FamilyService>,
    token_service: Arc<TokenService>,
}

#[derive(Tags)]
enum FamilyTags {
    /// Family membership endpoints
    Family,
}

impl FamilyApi {
    pub fn new(family_service: Arc<FamilyService>, token_service: Arc<TokenService>) -> Self {
        Self {
            family_service,
            token_service,
        }
    }
}

#[OpenApi]
impl FamilyApi {
    /// Create a family with the caller as owner
    #[oai(path = "/family", method = "post", tag = "FamilyTags::Family")]
    async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateFamilyRequest>,
    ) -> Result<Json<FamilyCreateResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let created = self.family_service.create_family(&user_id, body.0).await?;
        Ok(Json(created))
    }

    /// Get the caller's family with live member and dish counts
    #[oai(path = "/family", method = "get", tag = "FamilyTags::Family")]
    async fn info(&self, auth: BearerAuth) -> Result<Json<FamilyInfoResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let info = self.family_service.get_family_info(&user_id).await?;
        Ok(Json(info))
    }

    /// Accept an invite and join a family
    #[oai(path = "/family/join", method = "post", tag = "FamilyTags::Family")]
    async fn join(
        &self,
        auth: BearerAuth,
        body: Json<JoinFamilyRequest>,
    ) -> Result<Json<FamilyJoinResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let joined = self.family_service.join_via_invite(&user_id, body.0).await?;
        Ok(Json(joined))
    }

    /// List active members, owner first
    #[oai(path = "/family/members", method = "get", tag = "FamilyTags::Family")]
    async fn members(&self, auth: BearerAuth) -> Result<Json<FamilyMembersResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let members = self.family_service.list_members(&user_id).await?;
        Ok(Json(members))
    }
}
