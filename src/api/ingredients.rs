use std::sync::Arc;

use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};

use crate::api::{authenticate, BearerAuth};
use crate::errors::ApiError;
use crate::services::{IngredientService, TokenService};
use crate::types::dto::ingredient::{CatalogCategoryResponse, CatalogSearchResponse};

/// Ingredient catalog lookup endpoints
pub struct IngredientApi {
    ingredient_service: Arc<IngredientService>,
    token_service: Arc<TokenService>,
}

#[derive(Tags)]
enum IngredientTags {
    /// Ingredient catalog endpoints
    Ingredients,
}

impl IngredientApi {
    pub fn new(ingredient_service: Arc<IngredientService>, token_service: Arc<TokenService>) -> Self {
        Self {
            ingredient_service,
            token_service,
        }
    }
}

#[OpenApi]
impl IngredientApi {
    /// Substring search over the active catalog
    #[oai(path = "/ingredients/search", method = "get", tag = "IngredientTags::Ingredients")]
    async fn search(
        &self,
        auth: BearerAuth,
        keyword: Query<String>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<CatalogSearchResponse>, ApiError> {
        let _user_id = authenticate(&self.token_service, &auth)?;
        let results = self.ingredient_service.search(&keyword.0, limit.0).await?;
        Ok(Json(results))
    }

    /// Paged category listing
    #[oai(path = "/ingredients", method = "get", tag = "IngredientTags::Ingredients")]
    async fn by_category(
        &self,
        auth: BearerAuth,
        category: Query<String>,
        keyword: Query<Option<String>>,
        page: Query<Option<u64>>,
        page_size: Query<Option<u64>>,
    ) -> Result<Json<CatalogCategoryResponse>, ApiError> {
        let _user_id = authenticate(&self.token_service, &auth)?;
        let listing = self
            .ingredient_service
            .list_by_category(&category.0, keyword.0, page.0, page_size.0)
            .await?;
        Ok(Json(listing))
    }
}
