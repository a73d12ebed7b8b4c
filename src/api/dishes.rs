use std::sync::Arc;

use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};

use crate::api::{authenticate, BearerAuth};
use crate::errors::ApiError;
use crate::services::{DishService, TokenService};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::dish::{
    CreateDishRequest, DishCreateResponse, DishDetailResponse, DishListResponse, UpdateDishRequest,
};

/// Dish catalog endpoints
pub struct DishApi {
    dish_service: Arc<DishService>,
    token_service: Arc<TokenService>,
}

#[derive(Tags)]
enum DishTags {
    /// Dish catalog endpoints
    Dishes,
}

impl DishApi {
    pub fn new(dish_service: Arc<DishService>, token_service: Arc<TokenService>) -> Self {
        Self {
            dish_service,
            token_service,
        }
    }
}

#[OpenApi]
impl DishApi {
    /// Create a dish with its ingredients and steps
    #[oai(path = "/dishes", method = "post", tag = "DishTags::Dishes")]
    async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateDishRequest>,
    ) -> Result<Json<DishCreateResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let created = self.dish_service.create_dish(&user_id, body.0).await?;
        Ok(Json(created))
    }

    /// Paged dish listing with optional category and keyword filters
    #[oai(path = "/dishes", method = "get", tag = "DishTags::Dishes")]
    async fn list(
        &self,
        auth: BearerAuth,
        page: Query<Option<u64>>,
        page_size: Query<Option<u64>>,
        category: Query<Option<String>>,
        keyword: Query<Option<String>>,
    ) -> Result<Json<DishListResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let listing = self
            .dish_service
            .get_dish_list(&user_id, page.0, page_size.0, category.0, keyword.0)
            .await?;
        Ok(Json(listing))
    }

    /// Full dish detail
    #[oai(path = "/dishes/:dish_id", method = "get", tag = "DishTags::Dishes")]
    async fn detail(
        &self,
        auth: BearerAuth,
        dish_id: Path<String>,
    ) -> Result<Json<DishDetailResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let detail = self.dish_service.get_dish_detail(&user_id, &dish_id.0).await?;
        Ok(Json(detail))
    }

    /// Update a dish, replacing ingredients and steps wholesale
    #[oai(path = "/dishes/:dish_id", method = "put", tag = "DishTags::Dishes")]
    async fn update(
        &self,
        auth: BearerAuth,
        dish_id: Path<String>,
        body: Json<UpdateDishRequest>,
    ) -> Result<Json<DishDetailResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let detail = self.dish_service.update_dish(&user_id, &dish_id.0, body.0).await?;
        Ok(Json(detail))
    }

    /// Soft-delete a dish and purge its menu references
    #[oai(path = "/dishes/:dish_id", method = "delete", tag = "DishTags::Dishes")]
    async fn delete(
        &self,
        auth: BearerAuth,
        dish_id: Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        self.dish_service.delete_dish(&user_id, &dish_id.0).await?;
        Ok(Json(MessageResponse {
            message: "dish deleted".to_string(),
        }))
    }
}
