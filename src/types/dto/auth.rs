use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for user registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Phone number, the login key
    pub phone: String,

    /// Plaintext password
    pub password: String,

    /// Display name; derived from the phone when omitted
    pub nickname: Option<String>,

    /// Avatar URL
    pub avatar: Option<String>,
}

/// Request model for login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Response model containing the bearer token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Seconds until the token expires
    pub expires_in: i64,

    /// Identifier of the authenticated user
    pub user_id: String,
}

/// Response model for whoami
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub user_id: String,
    pub nickname: String,

    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}
