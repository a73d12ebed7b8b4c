use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::{DishService, FamilyService, IngredientService, MenuService, TokenService};
use crate::stores::{DishStore, FamilyStore, IngredientCatalogStore, MenuStore, UserStore};

/// Centralized application data following the main-owned dependencies
/// pattern.
///
/// Every store and service is constructed exactly once here, with its
/// database handle injected, and shared via Arc. No module reaches for a
/// process-wide singleton.
pub struct AppData {
    pub db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub token_service: Arc<TokenService>,
    pub family_service: Arc<FamilyService>,
    pub dish_service: Arc<DishService>,
    pub menu_service: Arc<MenuService>,
    pub ingredient_service: Arc<IngredientService>,
}

impl AppData {
    /// Wire up all stores and services. The database should already be
    /// connected and migrated.
    pub fn init(db: DatabaseConnection, jwt_secret: String) -> Self {
        tracing::debug!("creating stores and services");

        let family_store = Arc::new(FamilyStore::new(db.clone()));
        let dish_store = Arc::new(DishStore::new(db.clone()));
        let menu_store = Arc::new(MenuStore::new(db.clone()));
        let catalog_store = Arc::new(IngredientCatalogStore::new(db.clone()));
        let user_store = Arc::new(UserStore::new(db.clone()));

        let token_service = Arc::new(TokenService::new(jwt_secret));

        let family_service = Arc::new(FamilyService::new(
            Arc::clone(&family_store),
            Arc::clone(&dish_store),
            Arc::clone(&user_store),
        ));

        let dish_service = Arc::new(DishService::new(
            Arc::clone(&dish_store),
            Arc::clone(&family_store),
        ));

        let menu_service = Arc::new(MenuService::new(
            menu_store,
            Arc::clone(&dish_store),
            Arc::clone(&family_store),
        ));

        let ingredient_service = Arc::new(IngredientService::new(catalog_store));

        tracing::debug!("application data ready");

        Self {
            db,
            user_store,
            token_service,
            family_service,
            dish_service,
            menu_service,
            ingredient_service,
        }
    }
}
