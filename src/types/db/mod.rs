// Database entities - SeaORM models
pub mod cooking_step;
pub mod dish;
pub mod dish_ingredient;
pub mod family;
pub mod family_member;
pub mod ingredient_catalog;
pub mod menu;
pub mod menu_dish;
pub mod user;

/// Family and family-member row status values.
pub const STATUS_ACTIVE: i32 = 1;
pub const STATUS_DISABLED: i32 = 0;

/// Family member roles. "owner" is assigned exactly once, at family creation.
pub const ROLE_OWNER: &str = "owner";
pub const ROLE_MEMBER: &str = "member";

/// Menu provenance.
pub const MENU_SOURCE_MANUAL: &str = "manual";
pub const MENU_SOURCE_AI: &str = "ai";
