use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// One ingredient in a create/update dish request
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct IngredientInput {
    pub name: String,

    /// Quantity, must be positive
    pub amount: f64,

    pub unit: String,
    pub category: Option<String>,

    /// Suggested shelf life in days; negative values are dropped
    pub storage_days: Option<i32>,

    /// Display position; defaults to the 1-based input position when
    /// omitted or non-positive
    pub sort_order: Option<i32>,
}

/// One cooking step in a create/update dish request
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct CookingStepInput {
    /// Display position; defaults to the 1-based input position when
    /// omitted or non-positive
    pub order: Option<i32>,

    pub content: String,
    pub image_url: Option<String>,
}

/// Request model for creating a dish
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateDishRequest {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,

    /// 1 to 50 ingredients
    pub ingredients: Vec<IngredientInput>,

    /// 1 to 50 steps
    pub steps: Vec<CookingStepInput>,
}

/// Update requests carry the full replacement state, same shape as create.
pub type UpdateDishRequest = CreateDishRequest;

/// Response model for dish creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DishCreateResponse {
    pub dish_id: String,
    pub name: String,
}

/// Stored ingredient as returned in dish details
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct IngredientView {
    pub ingredient_id: String,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub category: Option<String>,
    pub storage_days: Option<i32>,
    pub sort_order: i32,
}

/// Stored cooking step as returned in dish details
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CookingStepView {
    pub step_id: String,
    pub order: i32,
    pub content: String,
    pub image_url: Option<String>,
}

/// Dish summary used in listings and embedded in menu details
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct DishSummary {
    pub dish_id: String,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Response model for the paged dish listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DishListResponse {
    pub dishes: Vec<DishSummary>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Full dish detail
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DishDetailResponse {
    pub dish_id: String,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_by: String,
    pub ingredients: Vec<IngredientView>,
    pub steps: Vec<CookingStepView>,
    pub created_at: i64,
    pub updated_at: i64,
}
