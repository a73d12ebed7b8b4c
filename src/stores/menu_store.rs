use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use ulid::Ulid;

use crate::errors::InternalError;
use crate::types::db::{menu, menu_dish};

/// Data access for menus and their dish associations.
///
/// Association rows are replaced wholesale on update. The unique index on
/// (family_id, date, meal_type) is the authoritative slot guard; the
/// planner's lookup is only a fast path.
pub struct MenuStore {
    db: DatabaseConnection,
}

impl MenuStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Menu occupying a (family, date, meal slot) tuple, if any.
    pub async fn find_by_slot(
        &self,
        family_id: &str,
        date: NaiveDate,
        meal_type: &str,
    ) -> Result<Option<menu::Model>, InternalError> {
        menu::Entity::find()
            .filter(menu::Column::FamilyId.eq(family_id))
            .filter(menu::Column::Date.eq(date))
            .filter(menu::Column::MealType.eq(meal_type))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_menu_by_slot", e))
    }

    pub async fn find_in_family(&self, menu_id: &str, family_id: &str) -> Result<Option<menu::Model>, InternalError> {
        menu::Entity::find()
            .filter(menu::Column::Id.eq(menu_id))
            .filter(menu::Column::FamilyId.eq(family_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_menu_in_family", e))
    }

    /// Insert a menu and its dish associations in one transaction. A
    /// concurrent insert into the same slot loses on the unique index and
    /// surfaces as `InternalError::UniqueViolation`.
    pub async fn create_with_dishes(
        &self,
        family_id: &str,
        date: NaiveDate,
        meal_type: &str,
        created_by: &str,
        source: &str,
        dish_ids: &[String],
    ) -> Result<menu::Model, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::transaction("create_menu_with_dishes", e))?;

        let now = Utc::now().timestamp();

        let created = menu::ActiveModel {
            id: Set(Ulid::new().to_string()),
            family_id: Set(family_id.to_string()),
            date: Set(date),
            meal_type: Set(meal_type.to_string()),
            created_by: Set(created_by.to_string()),
            source: Set(source.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("insert_menu", e))?;

        insert_menu_dishes(&txn, &created.id, dish_ids).await?;

        txn.commit()
            .await
            .map_err(|e| InternalError::transaction("create_menu_with_dishes", e))?;

        Ok(created)
    }

    /// Update the menu row and replace its dish associations wholesale, in
    /// one transaction. Moving the menu onto an occupied slot is rejected by
    /// the unique index and surfaces as `InternalError::UniqueViolation`.
    pub async fn update_with_dishes(
        &self,
        menu: menu::Model,
        date: NaiveDate,
        meal_type: &str,
        dish_ids: &[String],
    ) -> Result<menu::Model, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::transaction("update_menu_with_dishes", e))?;

        let menu_id = menu.id.clone();

        let mut active: menu::ActiveModel = menu.into();
        active.date = Set(date);
        active.meal_type = Set(meal_type.to_string());
        active.updated_at = Set(Utc::now().timestamp());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| InternalError::database("update_menu", e))?;

        menu_dish::Entity::delete_many()
            .filter(menu_dish::Column::MenuId.eq(menu_id.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_old_menu_dishes", e))?;

        insert_menu_dishes(&txn, &menu_id, dish_ids).await?;

        txn.commit()
            .await
            .map_err(|e| InternalError::transaction("update_menu_with_dishes", e))?;

        Ok(updated)
    }

    /// Dish ids of a menu in insertion order (sortable association ids).
    pub async fn dish_ids_for_menu(&self, menu_id: &str) -> Result<Vec<String>, InternalError> {
        let rows = menu_dish::Entity::find()
            .filter(menu_dish::Column::MenuId.eq(menu_id))
            .order_by_asc(menu_dish::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("dish_ids_for_menu", e))?;

        Ok(rows.into_iter().map(|r| r.dish_id).collect())
    }

    /// Menus with date in [start, end], ordered by date ascending. Slot
    /// ordering within a day is the planner's concern.
    pub async fn list_range(
        &self,
        family_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<menu::Model>, InternalError> {
        menu::Entity::find()
            .filter(menu::Column::FamilyId.eq(family_id))
            .filter(menu::Column::Date.gte(start))
            .filter(menu::Column::Date.lte(end))
            .order_by_asc(menu::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_menus_in_range", e))
    }
}

/// Insert association rows, skipping duplicate dish ids while preserving
/// first-occurrence order.
async fn insert_menu_dishes(
    txn: &DatabaseTransaction,
    menu_id: &str,
    dish_ids: &[String],
) -> Result<(), InternalError> {
    let now = Utc::now().timestamp();
    let mut seen: Vec<&str> = Vec::with_capacity(dish_ids.len());

    for dish_id in dish_ids {
        if seen.contains(&dish_id.as_str()) {
            continue;
        }
        seen.push(dish_id);

        menu_dish::ActiveModel {
            id: Set(Ulid::new().to_string()),
            menu_id: Set(menu_id.to_string()),
            dish_id: Set(dish_id.clone()),
            created_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| InternalError::database("insert_menu_dish", e))?;
    }

    Ok(())
}
