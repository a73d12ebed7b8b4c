use thiserror::Error;

use crate::errors::InternalError;

/// Family membership errors.
#[derive(Error, Debug)]
pub enum FamilyError {
    /// Name empty or over 100 characters after trimming
    #[error("invalid family name")]
    InvalidName,

    /// Description over 500 characters after trimming
    #[error("invalid family description")]
    InvalidDescription,

    /// Requester already has an active membership somewhere
    #[error("user already in a family")]
    AlreadyInFamily,

    /// Requester has no active family, or the target family is missing/disabled
    #[error("family not found")]
    NotFound,

    /// Invite action was not "accept"
    #[error("invalid invite action")]
    InvalidInviteAction,

    /// Invite payload named a family that no longer matches the stored name
    #[error("family name mismatch")]
    NameMismatch,

    /// The claimed inviter is not an active member of the target family
    #[error("inviter not in family")]
    InviterNotInFamily,

    /// Active member count is already at the cap
    #[error("family member limit reached")]
    MemberLimitReached,

    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// Dish catalog errors.
#[derive(Error, Debug)]
pub enum DishError {
    #[error("family not found")]
    FamilyNotFound,

    /// Name empty after trimming
    #[error("invalid dish name")]
    InvalidName,

    /// Zero or more than 50 ingredients, or an ingredient with empty
    /// name/unit or non-positive amount
    #[error("invalid ingredients")]
    InvalidIngredients,

    /// Zero or more than 50 steps, or a step with empty content
    #[error("invalid cooking steps")]
    InvalidSteps,

    /// Family already holds max_dishes non-deleted dishes
    #[error("dish limit reached")]
    LimitReached,

    /// Another non-deleted dish in the family has this name (any casing)
    #[error("dish name exists")]
    NameExists,

    /// Dish missing, soft-deleted, or owned by another family — collapsed
    /// into one signal so callers cannot probe other tenants
    #[error("dish not found")]
    NotFound,

    /// Requester is neither the dish creator nor the family owner
    #[error("no permission to modify dish")]
    PermissionDenied,

    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// Menu planner errors.
#[derive(Error, Debug)]
pub enum MenuError {
    #[error("family not found")]
    FamilyNotFound,

    /// Date not strictly YYYY-MM-DD
    #[error("invalid menu date")]
    InvalidDate,

    #[error("invalid meal type")]
    InvalidMealType,

    /// Empty dish id list
    #[error("invalid dish ids")]
    InvalidDishIds,

    /// A referenced dish is missing or soft-deleted
    #[error("dish not found")]
    DishNotFound,

    /// A referenced dish exists but belongs to another family
    #[error("dish not in family")]
    DishNotInFamily,

    #[error("menu not found")]
    NotFound,

    /// The (family, date, meal slot) unique index rejected a write
    #[error("menu already exists for this meal slot")]
    DuplicateSlot,

    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// Ingredient catalog lookup errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("keyword required")]
    InvalidKeyword,

    #[error("category required")]
    InvalidCategory,

    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// Identity shim errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid phone number")]
    InvalidPhone,

    #[error("phone already registered")]
    DuplicatePhone,

    #[error("invalid phone or password")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("password hashing failed: {0}")]
    PasswordHashingFailed(String),

    #[error("failed to issue token: {0}")]
    TokenIssueFailed(String),

    #[error(transparent)]
    Internal(#[from] InternalError),
}
