use std::sync::Arc;

use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::TokenService;
use crate::stores::UserStore;
use crate::types::dto::auth::{LoginRequest, RegisterRequest, TokenResponse, WhoAmIResponse};

/// Registration and login endpoints. The rest of the API only ever sees the
/// user id carried in the issued token.
pub struct AuthApi {
    user_store: Arc<UserStore>,
    token_service: Arc<TokenService>,
}

#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

impl AuthApi {
    pub fn new(user_store: Arc<UserStore>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_store,
            token_service,
        }
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register with phone and password
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, body: Json<RegisterRequest>) -> Result<Json<TokenResponse>, ApiError> {
        let body = body.0;
        let user = self
            .user_store
            .register(&body.phone, &body.password, body.nickname, body.avatar)
            .await?;

        let access_token = self.token_service.generate_jwt(&user.id)?;

        Ok(Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_service.expires_in(),
            user_id: user.id,
        }))
    }

    /// Login with phone and password
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, ApiError> {
        let user = self
            .user_store
            .verify_credentials(&body.phone, &body.password)
            .await?;

        let access_token = self.token_service.generate_jwt(&user.id)?;

        Ok(Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_service.expires_in(),
            user_id: user.id,
        }))
    }

    /// Identify the caller behind a bearer token
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, auth: BearerAuth) -> Result<Json<WhoAmIResponse>, ApiError> {
        let claims = self.token_service.validate_jwt(&auth.0.token)?;

        let nickname = self
            .user_store
            .find_by_id(&claims.sub)
            .await
            .map_err(crate::errors::AuthError::Internal)?
            .map(|u| u.nickname)
            .unwrap_or_default();

        Ok(Json(WhoAmIResponse {
            user_id: claims.sub,
            nickname,
            expires_at: claims.exp,
        }))
    }
}
