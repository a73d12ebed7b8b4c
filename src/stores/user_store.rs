use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use ulid::Ulid;

use crate::errors::domain::AuthError;
use crate::errors::InternalError;
use crate::types::db::{self, user};

/// User credentials and profile rows. Everything above this store treats the
/// user id as an opaque identifier; passwords never leave this module.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new user keyed by phone number.
    ///
    /// The existence pre-check gives a friendly error on the common path;
    /// the unique index on phone is the actual guard under concurrency.
    pub async fn register(
        &self,
        phone: &str,
        password: &str,
        nickname: Option<String>,
        avatar: Option<String>,
    ) -> Result<user::Model, AuthError> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(AuthError::InvalidPhone);
        }

        let existing = user::Entity::find()
            .filter(user::Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_phone", e))?;

        if existing.is_some() {
            return Err(AuthError::DuplicatePhone);
        }

        let salt = SaltString::generate(&mut rand_core::OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::PasswordHashingFailed(e.to_string()))?
            .to_string();

        let nickname = nickname
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_nickname(phone));

        let now = Utc::now().timestamp();

        let inserted = user::ActiveModel {
            id: Set(Ulid::new().to_string()),
            phone: Set(phone.to_string()),
            password_hash: Set(password_hash),
            nickname: Set(nickname),
            avatar: Set(avatar),
            status: Set(db::STATUS_ACTIVE),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            let err = InternalError::database("insert_user", e);
            if err.is_unique_violation() {
                AuthError::DuplicatePhone
            } else {
                AuthError::Internal(err)
            }
        })?;

        Ok(inserted)
    }

    /// Verify phone+password. Not-found, disabled, and wrong-password all
    /// collapse into `InvalidCredentials`.
    pub async fn verify_credentials(&self, phone: &str, password: &str) -> Result<user::Model, AuthError> {
        let found = user::Entity::find()
            .filter(user::Column::Phone.eq(phone.trim()))
            .filter(user::Column::Status.eq(db::STATUS_ACTIVE))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("verify_credentials", e))?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed = PasswordHash::new(&found.password_hash).map_err(|_| AuthError::InvalidCredentials)?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(found)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Batch profile lookup for member listings.
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<user::Model>, InternalError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_users_by_ids", e))
    }
}

fn default_nickname(phone: &str) -> String {
    let tail: String = phone
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("user_{tail}")
}
