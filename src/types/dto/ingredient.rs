use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// One catalog entry in search/listing responses
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CatalogItem {
    pub ingredient_id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub category: Option<String>,
    pub default_unit: Option<String>,
    pub storage_days: Option<i32>,
}

/// Response model for keyword search
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CatalogSearchResponse {
    pub items: Vec<CatalogItem>,
}

/// Response model for the paged category listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CatalogCategoryResponse {
    pub items: Vec<CatalogItem>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
}
