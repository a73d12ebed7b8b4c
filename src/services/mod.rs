// Services layer - Business rules and orchestration
pub mod dish_service;
pub mod family_service;
pub mod ingredient_service;
pub mod menu_service;
pub mod token_service;

pub use dish_service::DishService;
pub use family_service::FamilyService;
pub use ingredient_service::IngredientService;
pub use menu_service::{MealType, MenuService};
pub use token_service::{Claims, TokenService};
