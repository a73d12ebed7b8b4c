use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use ulid::Ulid;

use crate::errors::InternalError;
use crate::types::db::{self, family, family_member};

/// Data access for families and family membership rows.
///
/// The "one active family per user" rule is an application-layer check
/// (`is_user_in_family`); only the (family_id, user_id) pair is backed by a
/// unique index.
pub struct FamilyStore {
    db: DatabaseConnection,
}

impl FamilyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Whether the user holds an active membership in any family.
    pub async fn is_user_in_family(&self, user_id: &str) -> Result<bool, InternalError> {
        let count = family_member::Entity::find()
            .filter(family_member::Column::UserId.eq(user_id))
            .filter(family_member::Column::Status.eq(db::STATUS_ACTIVE))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("is_user_in_family", e))?;

        Ok(count > 0)
    }

    /// Resolve the user's active family, if any. The family itself must be
    /// active too; a disabled family resolves to `None`.
    pub async fn find_family_by_user(&self, user_id: &str) -> Result<Option<family::Model>, InternalError> {
        let membership = family_member::Entity::find()
            .filter(family_member::Column::UserId.eq(user_id))
            .filter(family_member::Column::Status.eq(db::STATUS_ACTIVE))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_family_by_user", e))?;

        let Some(membership) = membership else {
            return Ok(None);
        };

        self.find_family_by_id(&membership.family_id).await
    }

    pub async fn find_family_by_id(&self, family_id: &str) -> Result<Option<family::Model>, InternalError> {
        family::Entity::find()
            .filter(family::Column::Id.eq(family_id))
            .filter(family::Column::Status.eq(db::STATUS_ACTIVE))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_family_by_id", e))
    }

    /// Whether the user is an active member of this specific family.
    pub async fn is_member_of(&self, user_id: &str, family_id: &str) -> Result<bool, InternalError> {
        let count = family_member::Entity::find()
            .filter(family_member::Column::UserId.eq(user_id))
            .filter(family_member::Column::FamilyId.eq(family_id))
            .filter(family_member::Column::Status.eq(db::STATUS_ACTIVE))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("is_member_of", e))?;

        Ok(count > 0)
    }

    pub async fn count_active_members(&self, family_id: &str) -> Result<u64, InternalError> {
        family_member::Entity::find()
            .filter(family_member::Column::FamilyId.eq(family_id))
            .filter(family_member::Column::Status.eq(db::STATUS_ACTIVE))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_active_members", e))
    }

    /// Insert the family and its owner membership row in one transaction.
    /// A family without an owner row is an invariant violation, so neither
    /// insert may land without the other.
    pub async fn create_family_with_owner(
        &self,
        name: String,
        description: Option<String>,
        owner_id: &str,
        max_dishes: i32,
    ) -> Result<family::Model, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::transaction("create_family_with_owner", e))?;

        let now = Utc::now().timestamp();

        let family = family::ActiveModel {
            id: Set(Ulid::new().to_string()),
            name: Set(name),
            description: Set(description),
            owner_id: Set(owner_id.to_string()),
            max_dishes: Set(max_dishes),
            status: Set(db::STATUS_ACTIVE),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("insert_family", e))?;

        family_member::ActiveModel {
            id: Set(Ulid::new().to_string()),
            family_id: Set(family.id.clone()),
            user_id: Set(owner_id.to_string()),
            role: Set(db::ROLE_OWNER.to_string()),
            status: Set(db::STATUS_ACTIVE),
            joined_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("insert_owner_member", e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::transaction("create_family_with_owner", e))?;

        Ok(family)
    }

    /// Add a regular member. A unique-index rejection on (family, user)
    /// surfaces as `InternalError::UniqueViolation` for the service to
    /// translate.
    pub async fn add_member(&self, family_id: &str, user_id: &str) -> Result<family_member::Model, InternalError> {
        let now = Utc::now().timestamp();

        family_member::ActiveModel {
            id: Set(Ulid::new().to_string()),
            family_id: Set(family_id.to_string()),
            user_id: Set(user_id.to_string()),
            role: Set(db::ROLE_MEMBER.to_string()),
            status: Set(db::STATUS_ACTIVE),
            joined_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("add_member", e))
    }

    /// Active members of a family, owner first, then by join time ascending
    /// (ties broken by the sortable row id).
    pub async fn list_active_members(&self, family_id: &str) -> Result<Vec<family_member::Model>, InternalError> {
        let mut members = family_member::Entity::find()
            .filter(family_member::Column::FamilyId.eq(family_id))
            .filter(family_member::Column::Status.eq(db::STATUS_ACTIVE))
            .order_by_asc(family_member::Column::JoinedAt)
            .order_by_asc(family_member::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_active_members", e))?;

        members.sort_by_key(|m| m.role != db::ROLE_OWNER);

        Ok(members)
    }
}
