use std::sync::Arc;

use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use mealnest_backend::api::{AuthApi, DishApi, FamilyApi, HealthApi, IngredientApi, MenuApi};
use mealnest_backend::app_data::AppData;
use mealnest_backend::config;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    config::init_logging().expect("Failed to initialize logging");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://mealnest.db?mode=rwc".to_string());

    let db = config::init_database(&database_url)
        .await
        .expect("Failed to initialize database");

    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET environment variable must be set");

    let app_data = Arc::new(AppData::init(db, jwt_secret));

    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(
                Arc::clone(&app_data.user_store),
                Arc::clone(&app_data.token_service),
            ),
            FamilyApi::new(
                Arc::clone(&app_data.family_service),
                Arc::clone(&app_data.token_service),
            ),
            DishApi::new(
                Arc::clone(&app_data.dish_service),
                Arc::clone(&app_data.token_service),
            ),
            MenuApi::new(
                Arc::clone(&app_data.menu_service),
                Arc::clone(&app_data.token_service),
            ),
            IngredientApi::new(
                Arc::clone(&app_data.ingredient_service),
                Arc::clone(&app_data.token_service),
            ),
        ),
        "MealNest API",
        "1.0.0",
    )
    .server("http://localhost:3000/api");

    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    tracing::info!(%bind_addr, "starting server");

    Server::new(TcpListener::bind(bind_addr)).run(app).await
}
