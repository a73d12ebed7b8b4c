use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::dto::dish::DishSummary;

/// Request model for the create-or-replace planner call, keyed by the
/// natural (date, meal slot) tuple rather than a menu id.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateMenuRequest {
    /// Calendar date, strictly YYYY-MM-DD
    pub date: String,

    /// One of breakfast, lunch, dinner
    pub meal_type: String,

    /// At least one dish id, all owned by the caller's family
    pub dish_ids: Vec<String>,
}

/// Request model for updating a menu by id. Omitted fields are left
/// unchanged; an empty dish id list counts as omitted.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateMenuRequest {
    pub date: Option<String>,
    pub meal_type: Option<String>,
    pub dish_ids: Option<Vec<String>>,
}

/// Response model for create-or-replace
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MenuCreateResponse {
    pub menu_id: String,
    pub date: String,
    pub meal_type: String,
    pub dishes: Vec<DishSummary>,
}

/// Denormalized menu view. The dish list may be shorter than the stored
/// association count when referenced dishes have since been deleted.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MenuDetail {
    pub menu_id: String,
    pub family_id: String,
    pub date: String,
    pub meal_type: String,
    pub created_by: String,
    pub source: String,
    pub dishes: Vec<DishSummary>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Response model for the daily view, slots ordered breakfast → lunch →
/// dinner with empty slots omitted
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DailyMenuResponse {
    pub date: String,
    pub menus: Vec<MenuDetail>,
}

/// Response model for the 7-day view
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct WeeklyMenuResponse {
    pub start_date: String,
    pub end_date: String,
    pub menus: Vec<MenuDetail>,
}
