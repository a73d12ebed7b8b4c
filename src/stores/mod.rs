// Stores layer - Data access over SeaORM entities
pub mod dish_store;
pub mod family_store;
pub mod ingredient_catalog_store;
pub mod menu_store;
pub mod user_store;

pub use dish_store::{DishStore, NewIngredient, NewStep};
pub use family_store::FamilyStore;
pub use ingredient_catalog_store::IngredientCatalogStore;
pub use menu_store::MenuStore;
pub use user_store::UserStore;
