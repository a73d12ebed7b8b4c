// API layer - HTTP endpoints
pub mod auth;
pub mod dishes;
pub mod family;
pub mod health;
pub mod ingredients;
pub mod menus;

pub use auth::AuthApi;
pub use dishes::DishApi;
pub use family::FamilyApi;
pub use health::HealthApi;
pub use ingredients::IngredientApi;
pub use menus::MenuApi;

use poem_openapi::{auth::Bearer, SecurityScheme};

use crate::errors::ApiError;
use crate::services::TokenService;

/// JWT bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// Resolve the caller's opaque user id from the bearer token. Every
/// ownership decision below the transport uses this id as-is.
pub(crate) fn authenticate(tokens: &TokenService, auth: &BearerAuth) -> Result<String, ApiError> {
    let claims = tokens.validate_jwt(&auth.0.token)?;
    Ok(claims.sub)
}
