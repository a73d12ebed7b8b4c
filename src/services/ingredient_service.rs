use std::sync::Arc;

use crate::errors::domain::CatalogError;
use crate::stores::IngredientCatalogStore;
use crate::types::db::ingredient_catalog;
use crate::types::dto::ingredient::{CatalogCategoryResponse, CatalogItem, CatalogSearchResponse};

const DEFAULT_SEARCH_LIMIT: u64 = 20;
const MAX_SEARCH_LIMIT: u64 = 50;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

/// Read-only lookup over the shared ingredient reference catalog.
pub struct IngredientService {
    catalog_store: Arc<IngredientCatalogStore>,
}

impl IngredientService {
    pub fn new(catalog_store: Arc<IngredientCatalogStore>) -> Self {
        Self { catalog_store }
    }

    /// Substring search on name or English alias over active entries.
    pub async fn search(&self, keyword: &str, limit: Option<u64>) -> Result<CatalogSearchResponse, CatalogError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(CatalogError::InvalidKeyword);
        }

        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT);
        let items = self.catalog_store.search_active(keyword, limit).await?;

        Ok(CatalogSearchResponse {
            items: items.into_iter().map(catalog_item).collect(),
        })
    }

    /// Paged category listing with optional keyword narrowing.
    pub async fn list_by_category(
        &self,
        category: &str,
        keyword: Option<String>,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<CatalogCategoryResponse, CatalogError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(CatalogError::InvalidCategory);
        }

        let page = page.unwrap_or(1).max(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let keyword = keyword.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());

        let (items, total) = self
            .catalog_store
            .list_by_category(category, keyword.as_deref(), page, page_size)
            .await?;

        Ok(CatalogCategoryResponse {
            items: items.into_iter().map(catalog_item).collect(),
            page,
            page_size,
            total,
        })
    }
}

fn catalog_item(model: ingredient_catalog::Model) -> CatalogItem {
    CatalogItem {
        ingredient_id: model.id,
        name: model.name,
        name_en: model.name_en,
        category: model.category,
        default_unit: model.default_unit,
        storage_days: model.storage_days,
    }
}
