use poem_openapi::{payload::Json, ApiResponse, Object};

use crate::errors::domain::{AuthError, CatalogError, DishError, FamilyError, MenuError};
use crate::errors::InternalError;

/// Standardized error response body
#[derive(Object, Debug)]
pub struct ErrorBody {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

/// HTTP error responses. Domain errors are translated here, exactly once;
/// handlers and services never deal in status codes.
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Malformed input
    #[oai(status = 400)]
    BadRequest(Json<ErrorBody>),

    /// Missing or invalid bearer token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorBody>),

    /// Authenticated but not allowed to perform this mutation
    #[oai(status = 403)]
    Forbidden(Json<ErrorBody>),

    /// Resource missing, deleted, or owned by another family
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),

    /// Business-rule rejection
    #[oai(status = 409)]
    Conflict(Json<ErrorBody>),

    /// Store or transaction failure
    #[oai(status = 500)]
    Internal(Json<ErrorBody>),
}

fn body(error: &str, message: impl Into<String>) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: error.to_string(),
        message: message.into(),
    })
}

impl ApiError {
    pub fn bad_request(error: &str, message: impl Into<String>) -> Self {
        Self::BadRequest(body(error, message))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(body("unauthorized", message))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(body("forbidden", message))
    }

    pub fn not_found(error: &str, message: impl Into<String>) -> Self {
        Self::NotFound(body(error, message))
    }

    pub fn conflict(error: &str, message: impl Into<String>) -> Self {
        Self::Conflict(body(error, message))
    }

    fn internal(source: &InternalError) -> Self {
        tracing::error!("internal error: {source}");
        Self::Internal(body("internal_error", "internal server error"))
    }
}

impl From<FamilyError> for ApiError {
    fn from(err: FamilyError) -> Self {
        match &err {
            FamilyError::InvalidName | FamilyError::InvalidDescription | FamilyError::InvalidInviteAction => {
                Self::bad_request("invalid_input", err.to_string())
            }
            FamilyError::NotFound => Self::not_found("family_not_found", err.to_string()),
            FamilyError::AlreadyInFamily => Self::conflict("already_in_family", err.to_string()),
            FamilyError::NameMismatch => Self::conflict("family_name_mismatch", err.to_string()),
            FamilyError::InviterNotInFamily => Self::conflict("inviter_invalid", err.to_string()),
            FamilyError::MemberLimitReached => Self::conflict("member_limit_reached", err.to_string()),
            FamilyError::Internal(source) => Self::internal(source),
        }
    }
}

impl From<DishError> for ApiError {
    fn from(err: DishError) -> Self {
        match &err {
            DishError::InvalidName | DishError::InvalidIngredients | DishError::InvalidSteps => {
                Self::bad_request("invalid_input", err.to_string())
            }
            DishError::FamilyNotFound => Self::not_found("family_not_found", err.to_string()),
            DishError::NotFound => Self::not_found("dish_not_found", err.to_string()),
            DishError::LimitReached => Self::conflict("dish_limit_reached", err.to_string()),
            DishError::NameExists => Self::conflict("dish_name_exists", err.to_string()),
            DishError::PermissionDenied => Self::forbidden(err.to_string()),
            DishError::Internal(source) => Self::internal(source),
        }
    }
}

impl From<MenuError> for ApiError {
    fn from(err: MenuError) -> Self {
        match &err {
            MenuError::InvalidDate | MenuError::InvalidMealType | MenuError::InvalidDishIds => {
                Self::bad_request("invalid_input", err.to_string())
            }
            MenuError::FamilyNotFound => Self::not_found("family_not_found", err.to_string()),
            MenuError::DishNotFound => Self::not_found("dish_not_found", err.to_string()),
            MenuError::NotFound => Self::not_found("menu_not_found", err.to_string()),
            MenuError::DishNotInFamily => Self::conflict("dish_not_in_family", err.to_string()),
            MenuError::DuplicateSlot => Self::conflict("duplicate_menu_slot", err.to_string()),
            MenuError::Internal(source) => Self::internal(source),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::InvalidKeyword => Self::bad_request("invalid_keyword", err.to_string()),
            CatalogError::InvalidCategory => Self::bad_request("invalid_category", err.to_string()),
            CatalogError::Internal(source) => Self::internal(source),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::InvalidPhone => Self::bad_request("invalid_phone", err.to_string()),
            AuthError::DuplicatePhone => Self::conflict("duplicate_phone", err.to_string()),
            AuthError::InvalidCredentials => Self::unauthorized(err.to_string()),
            AuthError::InvalidToken | AuthError::ExpiredToken => Self::unauthorized(err.to_string()),
            AuthError::PasswordHashingFailed(_) | AuthError::TokenIssueFailed(_) => {
                tracing::error!("auth failure: {err}");
                Self::Internal(body("internal_error", "internal server error"))
            }
            AuthError::Internal(source) => Self::internal(source),
        }
    }
}
