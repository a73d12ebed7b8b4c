use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use ulid::Ulid;

use crate::errors::InternalError;
use crate::types::db::{cooking_step, dish, dish_ingredient, menu_dish};

/// Validated, normalized ingredient ready for persistence. Ids are assigned
/// at insert time.
#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub category: Option<String>,
    pub storage_days: Option<i32>,
    pub sort_order: i32,
}

/// Validated, normalized cooking step ready for persistence.
#[derive(Debug, Clone)]
pub struct NewStep {
    pub order: i32,
    pub content: String,
    pub image_url: Option<String>,
}

/// Data access for dishes and their detail rows (ingredients, steps).
///
/// Detail rows are replaced wholesale on every update, inside the same
/// transaction as the dish row itself.
pub struct DishStore {
    db: DatabaseConnection,
}

impl DishStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Non-deleted dish count for a family, checked against max_dishes.
    pub async fn count_by_family(&self, family_id: &str) -> Result<u64, InternalError> {
        dish::Entity::find()
            .filter(dish::Column::FamilyId.eq(family_id))
            .filter(dish::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_dishes_by_family", e))
    }

    /// Case-insensitive name existence check among a family's non-deleted
    /// dishes. `exclude_id` lets an update skip the dish's own row.
    pub async fn exists_by_name(
        &self,
        family_id: &str,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, InternalError> {
        let mut query = dish::Entity::find()
            .filter(dish::Column::FamilyId.eq(family_id))
            .filter(dish::Column::DeletedAt.is_null())
            .filter(Expr::expr(Func::lower(Expr::col(dish::Column::Name))).eq(name.to_lowercase()));

        if let Some(exclude_id) = exclude_id {
            query = query.filter(dish::Column::Id.ne(exclude_id));
        }

        let count = query
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("exists_dish_by_name", e))?;

        Ok(count > 0)
    }

    /// Dish by id within a family. Missing, soft-deleted, and other-family
    /// rows are indistinguishable here.
    pub async fn find_in_family(&self, dish_id: &str, family_id: &str) -> Result<Option<dish::Model>, InternalError> {
        dish::Entity::find()
            .filter(dish::Column::Id.eq(dish_id))
            .filter(dish::Column::FamilyId.eq(family_id))
            .filter(dish::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_dish_in_family", e))
    }

    /// Dish by id regardless of family, used by the planner to tell
    /// "missing" apart from "wrong family".
    pub async fn find_any(&self, dish_id: &str) -> Result<Option<dish::Model>, InternalError> {
        dish::Entity::find()
            .filter(dish::Column::Id.eq(dish_id))
            .filter(dish::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_dish", e))
    }

    /// Insert the dish row and all detail rows in one transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_with_details(
        &self,
        family_id: &str,
        created_by: &str,
        name: String,
        category: Option<String>,
        description: Option<String>,
        image_url: Option<String>,
        ingredients: Vec<NewIngredient>,
        steps: Vec<NewStep>,
    ) -> Result<dish::Model, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::transaction("create_dish_with_details", e))?;

        let now = Utc::now().timestamp();

        let created = dish::ActiveModel {
            id: Set(Ulid::new().to_string()),
            family_id: Set(family_id.to_string()),
            name: Set(name),
            category: Set(category),
            description: Set(description),
            image_url: Set(image_url),
            created_by: Set(created_by.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("insert_dish", e))?;

        insert_details(&txn, &created.id, ingredients, steps).await?;

        txn.commit()
            .await
            .map_err(|e| InternalError::transaction("create_dish_with_details", e))?;

        Ok(created)
    }

    /// Update the dish row and replace its detail rows wholesale, in one
    /// transaction.
    pub async fn update_with_details(
        &self,
        dish: dish::Model,
        name: String,
        category: Option<String>,
        description: Option<String>,
        image_url: Option<String>,
        ingredients: Vec<NewIngredient>,
        steps: Vec<NewStep>,
    ) -> Result<dish::Model, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::transaction("update_dish_with_details", e))?;

        let dish_id = dish.id.clone();

        let mut active: dish::ActiveModel = dish.into();
        active.name = Set(name);
        active.category = Set(category);
        active.description = Set(description);
        active.image_url = Set(image_url);
        active.updated_at = Set(Utc::now().timestamp());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| InternalError::database("update_dish", e))?;

        dish_ingredient::Entity::delete_many()
            .filter(dish_ingredient::Column::DishId.eq(dish_id.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_old_ingredients", e))?;

        cooking_step::Entity::delete_many()
            .filter(cooking_step::Column::DishId.eq(dish_id.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_old_steps", e))?;

        insert_details(&txn, &dish_id, ingredients, steps).await?;

        txn.commit()
            .await
            .map_err(|e| InternalError::transaction("update_dish_with_details", e))?;

        Ok(updated)
    }

    /// Soft-delete the dish and purge its detail rows and menu references.
    /// Returns false when no live row matched (already deleted or foreign).
    pub async fn soft_delete(&self, dish_id: &str, family_id: &str) -> Result<bool, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::transaction("soft_delete_dish", e))?;

        let now = Utc::now().timestamp();

        let marked = dish::Entity::update_many()
            .set(dish::ActiveModel {
                deleted_at: Set(Some(now)),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(dish::Column::Id.eq(dish_id))
            .filter(dish::Column::FamilyId.eq(family_id))
            .filter(dish::Column::DeletedAt.is_null())
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("mark_dish_deleted", e))?;

        if marked.rows_affected == 0 {
            return Ok(false);
        }

        dish_ingredient::Entity::delete_many()
            .filter(dish_ingredient::Column::DishId.eq(dish_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_ingredients", e))?;

        cooking_step::Entity::delete_many()
            .filter(cooking_step::Column::DishId.eq(dish_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_steps", e))?;

        menu_dish::Entity::delete_many()
            .filter(menu_dish::Column::DishId.eq(dish_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_menu_references", e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::transaction("soft_delete_dish", e))?;

        Ok(true)
    }

    /// Ingredients in display order: (sort_order, id) ascending.
    pub async fn get_ingredients(&self, dish_id: &str) -> Result<Vec<dish_ingredient::Model>, InternalError> {
        dish_ingredient::Entity::find()
            .filter(dish_ingredient::Column::DishId.eq(dish_id))
            .order_by_asc(dish_ingredient::Column::SortOrder)
            .order_by_asc(dish_ingredient::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("get_ingredients", e))
    }

    /// Steps in display order: (step_order, id) ascending.
    pub async fn get_steps(&self, dish_id: &str) -> Result<Vec<cooking_step::Model>, InternalError> {
        cooking_step::Entity::find()
            .filter(cooking_step::Column::DishId.eq(dish_id))
            .order_by_asc(cooking_step::Column::StepOrder)
            .order_by_asc(cooking_step::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("get_steps", e))
    }

    /// Paged listing with optional category filter and case-insensitive
    /// substring match on name, newest first.
    pub async fn list(
        &self,
        family_id: &str,
        page: u64,
        page_size: u64,
        category: Option<&str>,
        keyword: Option<&str>,
    ) -> Result<(Vec<dish::Model>, u64), InternalError> {
        let mut query = dish::Entity::find()
            .filter(dish::Column::FamilyId.eq(family_id))
            .filter(dish::Column::DeletedAt.is_null());

        if let Some(category) = category {
            query = query.filter(dish::Column::Category.eq(category));
        }

        if let Some(keyword) = keyword {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(dish::Column::Name)))
                    .like(format!("%{}%", keyword.to_lowercase())),
            );
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_dish_list", e))?;

        let items = query
            .order_by_desc(dish::Column::CreatedAt)
            .order_by_desc(dish::Column::Id)
            .offset(page.saturating_sub(1) * page_size)
            .limit(page_size)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_dishes", e))?;

        Ok((items, total))
    }
}

async fn insert_details(
    txn: &DatabaseTransaction,
    dish_id: &str,
    ingredients: Vec<NewIngredient>,
    steps: Vec<NewStep>,
) -> Result<(), InternalError> {
    for item in ingredients {
        dish_ingredient::ActiveModel {
            id: Set(Ulid::new().to_string()),
            dish_id: Set(dish_id.to_string()),
            name: Set(item.name),
            amount: Set(item.amount),
            unit: Set(item.unit),
            category: Set(item.category),
            storage_days: Set(item.storage_days),
            sort_order: Set(item.sort_order),
        }
        .insert(txn)
        .await
        .map_err(|e| InternalError::database("insert_ingredient", e))?;
    }

    for step in steps {
        cooking_step::ActiveModel {
            id: Set(Ulid::new().to_string()),
            dish_id: Set(dish_id.to_string()),
            step_order: Set(step.order),
            content: Set(step.content),
            image_url: Set(step.image_url),
        }
        .insert(txn)
        .await
        .map_err(|e| InternalError::database("insert_step", e))?;
    }

    Ok(())
}
