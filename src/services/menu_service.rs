use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::errors::domain::MenuError;
use crate::errors::InternalError;
use crate::services::dish_service::summary_from;
use crate::stores::{DishStore, FamilyStore, MenuStore};
use crate::types::db::{self, family, menu};
use crate::types::dto::dish::DishSummary;
use crate::types::dto::menu::{
    CreateMenuRequest, DailyMenuResponse, MenuCreateResponse, MenuDetail, UpdateMenuRequest,
    WeeklyMenuResponse,
};

/// Meal slots in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }
}

/// Display rank of a stored meal_type value; unknown values sort last.
fn slot_rank(meal_type: &str) -> u8 {
    match MealType::parse(meal_type) {
        Some(MealType::Breakfast) => 0,
        Some(MealType::Lunch) => 1,
        Some(MealType::Dinner) => 2,
        None => 3,
    }
}

/// Menu planning: one menu per (family, date, meal slot), upsert keyed on
/// that natural tuple, daily and 7-day views.
///
/// Embedded dish summaries are resolved per id and silently skipped when a
/// referenced dish has since been deleted; a menu's rendered dish list may
/// therefore be shorter than its stored association count.
pub struct MenuService {
    menu_store: Arc<MenuStore>,
    dish_store: Arc<DishStore>,
    family_store: Arc<FamilyStore>,
}

impl MenuService {
    pub fn new(menu_store: Arc<MenuStore>, dish_store: Arc<DishStore>, family_store: Arc<FamilyStore>) -> Self {
        Self {
            menu_store,
            dish_store,
            family_store,
        }
    }

    /// Create the menu for (date, meal slot), or replace the dish set of the
    /// existing one. Callers address menus by slot here, never by id; the
    /// second identical call is a no-op returning the same menu id.
    pub async fn create_or_replace_menu(
        &self,
        user_id: &str,
        req: CreateMenuRequest,
    ) -> Result<MenuCreateResponse, MenuError> {
        let family = self.family_for_user(user_id).await?;

        let date = parse_date(&req.date)?;
        let meal_type = MealType::parse(req.meal_type.trim()).ok_or(MenuError::InvalidMealType)?;

        if req.dish_ids.is_empty() {
            return Err(MenuError::InvalidDishIds);
        }
        self.validate_dishes_in_family(&family.id, &req.dish_ids).await?;

        let existing = self
            .menu_store
            .find_by_slot(&family.id, date, meal_type.as_str())
            .await?;

        let saved = match existing {
            Some(existing) => self
                .menu_store
                .update_with_dishes(existing, date, meal_type.as_str(), &req.dish_ids)
                .await
                .map_err(slot_conflict)?,
            None => self
                .menu_store
                .create_with_dishes(
                    &family.id,
                    date,
                    meal_type.as_str(),
                    user_id,
                    db::MENU_SOURCE_MANUAL,
                    &req.dish_ids,
                )
                .await
                .map_err(slot_conflict)?,
        };

        tracing::info!(menu_id = %saved.id, family_id = %family.id, date = %saved.date, meal = %saved.meal_type, "menu saved");

        let dishes = self.dish_summaries(&req.dish_ids, &family.id).await?;

        Ok(MenuCreateResponse {
            menu_id: saved.id,
            date: format_date(saved.date),
            meal_type: saved.meal_type,
            dishes,
        })
    }

    /// Menus for one date, ordered breakfast → lunch → dinner. Slots without
    /// a menu are omitted.
    pub async fn get_daily_menu(&self, user_id: &str, date: &str) -> Result<DailyMenuResponse, MenuError> {
        let family = self.family_for_user(user_id).await?;
        let date = parse_date(date)?;

        let mut menus = self.menu_store.list_range(&family.id, date, date).await?;
        menus.sort_by_key(|m| slot_rank(&m.meal_type));

        let mut details = Vec::with_capacity(menus.len());
        for found in menus {
            details.push(self.build_menu_detail(found).await?);
        }

        Ok(DailyMenuResponse {
            date: format_date(date),
            menus: details,
        })
    }

    /// Menus for the 7-day window [start, start+6], ordered by date then
    /// meal slot.
    pub async fn get_weekly_menu(&self, user_id: &str, start_date: &str) -> Result<WeeklyMenuResponse, MenuError> {
        let family = self.family_for_user(user_id).await?;

        let start = parse_date(start_date)?;
        let end = start.checked_add_days(Days::new(6)).ok_or(MenuError::InvalidDate)?;

        let mut menus = self.menu_store.list_range(&family.id, start, end).await?;
        menus.sort_by_key(|m| (m.date, slot_rank(&m.meal_type)));

        let mut details = Vec::with_capacity(menus.len());
        for found in menus {
            details.push(self.build_menu_detail(found).await?);
        }

        Ok(WeeklyMenuResponse {
            start_date: format_date(start),
            end_date: format_date(end),
            menus: details,
        })
    }

    /// Update a menu addressed by id. Omitted fields keep their stored
    /// values; when dish_ids is omitted the existing association set is
    /// fetched and re-applied, so the replacement path always runs.
    ///
    /// There is deliberately no slot-collision pre-check when date or
    /// meal_type change; the unique slot index has the final word and its
    /// rejection surfaces as `DuplicateSlot`.
    pub async fn update_menu(
        &self,
        user_id: &str,
        menu_id: &str,
        req: UpdateMenuRequest,
    ) -> Result<MenuDetail, MenuError> {
        let family = self.family_for_user(user_id).await?;

        let existing = self
            .menu_store
            .find_in_family(menu_id, &family.id)
            .await?
            .ok_or(MenuError::NotFound)?;

        let date = match req.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_date(raw)?,
            None => existing.date,
        };

        let meal_type = match req.meal_type.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            Some(raw) => MealType::parse(raw).ok_or(MenuError::InvalidMealType)?.as_str().to_string(),
            None => existing.meal_type.clone(),
        };

        let dish_ids = match req.dish_ids {
            Some(ids) if !ids.is_empty() => {
                self.validate_dishes_in_family(&family.id, &ids).await?;
                ids
            }
            _ => self.menu_store.dish_ids_for_menu(&existing.id).await?,
        };

        let updated = self
            .menu_store
            .update_with_dishes(existing, date, &meal_type, &dish_ids)
            .await
            .map_err(slot_conflict)?;

        tracing::info!(menu_id = %updated.id, family_id = %family.id, "menu updated");

        self.build_menu_detail(updated).await
    }

    async fn family_for_user(&self, user_id: &str) -> Result<family::Model, MenuError> {
        self.family_store
            .find_family_by_user(user_id)
            .await?
            .ok_or(MenuError::FamilyNotFound)
    }

    /// Every referenced dish must resolve to a live dish of this family.
    /// Checked dish by dish, failing on the first violation.
    async fn validate_dishes_in_family(&self, family_id: &str, dish_ids: &[String]) -> Result<(), MenuError> {
        for dish_id in dish_ids {
            let found = self
                .dish_store
                .find_any(dish_id)
                .await?
                .ok_or(MenuError::DishNotFound)?;

            if found.family_id != family_id {
                return Err(MenuError::DishNotInFamily);
            }
        }

        Ok(())
    }

    /// Resolve dish summaries one id at a time, skipping ids that no longer
    /// resolve to a live dish of this family.
    async fn dish_summaries(&self, dish_ids: &[String], family_id: &str) -> Result<Vec<DishSummary>, MenuError> {
        let mut dishes = Vec::with_capacity(dish_ids.len());

        for dish_id in dish_ids {
            match self.dish_store.find_in_family(dish_id, family_id).await? {
                Some(found) => dishes.push(summary_from(found)),
                None => continue,
            }
        }

        Ok(dishes)
    }

    async fn build_menu_detail(&self, found: menu::Model) -> Result<MenuDetail, MenuError> {
        let dish_ids = self.menu_store.dish_ids_for_menu(&found.id).await?;
        let dishes = self.dish_summaries(&dish_ids, &found.family_id).await?;

        Ok(MenuDetail {
            menu_id: found.id,
            family_id: found.family_id,
            date: format_date(found.date),
            meal_type: found.meal_type,
            created_by: found.created_by,
            source: found.source,
            dishes,
            created_at: found.created_at,
            updated_at: found.updated_at,
        })
    }
}

fn slot_conflict(err: InternalError) -> MenuError {
    if err.is_unique_violation() {
        MenuError::DuplicateSlot
    } else {
        MenuError::Internal(err)
    }
}

/// Strict YYYY-MM-DD parsing. The round-trip check rejects inputs chrono
/// would tolerate, like single-digit months.
fn parse_date(value: &str) -> Result<NaiveDate, MenuError> {
    let trimmed = value.trim();
    let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| MenuError::InvalidDate)?;
    if format_date(parsed) != trimmed {
        return Err(MenuError::InvalidDate);
    }
    Ok(parsed)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{DishService, FamilyService};
    use crate::stores::UserStore;
    use crate::types::dto::dish::{CookingStepInput, CreateDishRequest, IngredientInput};
    use crate::types::dto::family::CreateFamilyRequest;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    struct Fixture {
        menus: MenuService,
        dishes: DishService,
        families: FamilyService,
        users: Arc<UserStore>,
    }

    async fn setup() -> Fixture {
        // Single connection: every pooled in-memory SQLite connection is a
        // separate database.
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);

        let db = Database::connect(options)
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let family_store = Arc::new(FamilyStore::new(db.clone()));
        let dish_store = Arc::new(DishStore::new(db.clone()));
        let menu_store = Arc::new(MenuStore::new(db.clone()));
        let users = Arc::new(UserStore::new(db.clone()));

        Fixture {
            menus: MenuService::new(menu_store, Arc::clone(&dish_store), Arc::clone(&family_store)),
            dishes: DishService::new(Arc::clone(&dish_store), Arc::clone(&family_store)),
            families: FamilyService::new(family_store, dish_store, Arc::clone(&users)),
            users,
        }
    }

    async fn seed_family(fixture: &Fixture, phone: &str) -> String {
        let owner = fixture
            .users
            .register(phone, "password123", None, None)
            .await
            .expect("Failed to register user")
            .id;

        fixture
            .families
            .create_family(
                &owner,
                CreateFamilyRequest {
                    name: "Test Kitchen".to_string(),
                    description: None,
                },
            )
            .await
            .expect("Failed to create family");

        owner
    }

    async fn seed_dish(fixture: &Fixture, user_id: &str, name: &str) -> String {
        fixture
            .dishes
            .create_dish(
                user_id,
                CreateDishRequest {
                    name: name.to_string(),
                    category: None,
                    description: None,
                    image_url: None,
                    ingredients: vec![IngredientInput {
                        name: "rice".to_string(),
                        amount: 200.0,
                        unit: "g".to_string(),
                        category: None,
                        storage_days: None,
                        sort_order: None,
                    }],
                    steps: vec![CookingStepInput {
                        order: None,
                        content: "cook it".to_string(),
                        image_url: None,
                    }],
                },
            )
            .await
            .expect("Failed to create dish")
            .dish_id
    }

    fn menu_request(date: &str, meal_type: &str, dish_ids: Vec<String>) -> CreateMenuRequest {
        CreateMenuRequest {
            date: date.to_string(),
            meal_type: meal_type.to_string(),
            dish_ids,
        }
    }

    #[tokio::test]
    async fn test_create_or_replace_is_idempotent_per_slot() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002001").await;
        let dish = seed_dish(&fixture, &owner, "Congee").await;

        let first = fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-04", "breakfast", vec![dish.clone()]))
            .await
            .expect("Failed to create menu");

        let second = fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-04", "breakfast", vec![dish]))
            .await
            .expect("Failed to replace menu");

        assert_eq!(first.menu_id, second.menu_id);

        let daily = fixture
            .menus
            .get_daily_menu(&owner, "2024-03-04")
            .await
            .expect("Failed to get daily menu");
        assert_eq!(daily.menus.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_swaps_dish_set_wholesale() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002002").await;
        let old_dish = seed_dish(&fixture, &owner, "Old Dish").await;
        let new_dish = seed_dish(&fixture, &owner, "New Dish").await;

        fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-05", "dinner", vec![old_dish]))
            .await
            .expect("Failed to create menu");

        let replaced = fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-05", "dinner", vec![new_dish.clone()]))
            .await
            .expect("Failed to replace menu");

        assert_eq!(replaced.dishes.len(), 1);
        assert_eq!(replaced.dishes[0].dish_id, new_dish);
    }

    #[tokio::test]
    async fn test_date_parsing_is_strict() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002003").await;
        let dish = seed_dish(&fixture, &owner, "Any").await;

        for bad in ["2024/03/04", "2024-3-4", "04-03-2024", "notadate", "2024-03-04T00:00:00"] {
            let result = fixture
                .menus
                .create_or_replace_menu(&owner, menu_request(bad, "lunch", vec![dish.clone()]))
                .await;
            assert!(matches!(result, Err(MenuError::InvalidDate)), "accepted {bad}");
        }
    }

    #[tokio::test]
    async fn test_meal_type_and_dish_ids_validation() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002004").await;
        let dish = seed_dish(&fixture, &owner, "Any").await;

        let result = fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-04", "brunch", vec![dish]))
            .await;
        assert!(matches!(result, Err(MenuError::InvalidMealType)));

        let result = fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-04", "lunch", vec![]))
            .await;
        assert!(matches!(result, Err(MenuError::InvalidDishIds)));
    }

    #[tokio::test]
    async fn test_foreign_and_unknown_dishes_rejected() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002005").await;
        let other_owner = seed_family(&fixture, "13800002006").await;
        let foreign_dish = seed_dish(&fixture, &other_owner, "Foreign").await;

        let result = fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-04", "lunch", vec![foreign_dish]))
            .await;
        assert!(matches!(result, Err(MenuError::DishNotInFamily)));

        let result = fixture
            .menus
            .create_or_replace_menu(
                &owner,
                menu_request("2024-03-04", "lunch", vec!["01JNOSUCHDISH0000000000000".to_string()]),
            )
            .await;
        assert!(matches!(result, Err(MenuError::DishNotFound)));
    }

    #[tokio::test]
    async fn test_daily_menu_ordered_by_slot() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002007").await;
        let dish = seed_dish(&fixture, &owner, "Any").await;

        // Created out of order; lunch is left empty on purpose
        fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-04", "dinner", vec![dish.clone()]))
            .await
            .expect("Failed to create dinner");
        fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-04", "breakfast", vec![dish]))
            .await
            .expect("Failed to create breakfast");

        let daily = fixture
            .menus
            .get_daily_menu(&owner, "2024-03-04")
            .await
            .expect("Failed to get daily menu");

        let slots: Vec<&str> = daily.menus.iter().map(|m| m.meal_type.as_str()).collect();
        assert_eq!(slots, vec!["breakfast", "dinner"]);
    }

    #[tokio::test]
    async fn test_weekly_window_is_seven_days_inclusive() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002008").await;
        let dish = seed_dish(&fixture, &owner, "Any").await;

        for date in ["2024-03-04", "2024-03-10", "2024-03-11"] {
            fixture
                .menus
                .create_or_replace_menu(&owner, menu_request(date, "dinner", vec![dish.clone()]))
                .await
                .expect("Failed to create menu");
        }

        let weekly = fixture
            .menus
            .get_weekly_menu(&owner, "2024-03-04")
            .await
            .expect("Failed to get weekly menu");

        assert_eq!(weekly.start_date, "2024-03-04");
        assert_eq!(weekly.end_date, "2024-03-10");
        let dates: Vec<&str> = weekly.menus.iter().map(|m| m.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-04", "2024-03-10"]);
    }

    #[tokio::test]
    async fn test_weekly_menus_ordered_by_date_then_slot() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002009").await;
        let dish = seed_dish(&fixture, &owner, "Any").await;

        for (date, meal) in [
            ("2024-03-05", "dinner"),
            ("2024-03-05", "breakfast"),
            ("2024-03-04", "lunch"),
        ] {
            fixture
                .menus
                .create_or_replace_menu(&owner, menu_request(date, meal, vec![dish.clone()]))
                .await
                .expect("Failed to create menu");
        }

        let weekly = fixture
            .menus
            .get_weekly_menu(&owner, "2024-03-04")
            .await
            .expect("Failed to get weekly menu");

        let ordering: Vec<(String, String)> = weekly
            .menus
            .iter()
            .map(|m| (m.date.clone(), m.meal_type.clone()))
            .collect();
        assert_eq!(
            ordering,
            vec![
                ("2024-03-04".to_string(), "lunch".to_string()),
                ("2024-03-05".to_string(), "breakfast".to_string()),
                ("2024-03-05".to_string(), "dinner".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_deleted_dish_silently_dropped_from_menu() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002010").await;
        let keeper = seed_dish(&fixture, &owner, "Keeper").await;
        let doomed = seed_dish(&fixture, &owner, "Doomed").await;

        fixture
            .menus
            .create_or_replace_menu(
                &owner,
                menu_request("2024-03-06", "lunch", vec![keeper.clone(), doomed.clone()]),
            )
            .await
            .expect("Failed to create menu");

        fixture
            .dishes
            .delete_dish(&owner, &doomed)
            .await
            .expect("Failed to delete dish");

        let daily = fixture
            .menus
            .get_daily_menu(&owner, "2024-03-06")
            .await
            .expect("Failed to get daily menu");

        assert_eq!(daily.menus.len(), 1);
        let dish_ids: Vec<&str> = daily.menus[0].dishes.iter().map(|d| d.dish_id.as_str()).collect();
        assert_eq!(dish_ids, vec![keeper.as_str()]);
    }

    #[tokio::test]
    async fn test_update_menu_metadata_only_keeps_dish_set() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002011").await;
        let dish = seed_dish(&fixture, &owner, "Stable").await;

        let created = fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-07", "lunch", vec![dish.clone()]))
            .await
            .expect("Failed to create menu");

        let updated = fixture
            .menus
            .update_menu(
                &owner,
                &created.menu_id,
                UpdateMenuRequest {
                    date: Some("2024-03-08".to_string()),
                    meal_type: None,
                    dish_ids: None,
                },
            )
            .await
            .expect("Failed to update menu");

        assert_eq!(updated.date, "2024-03-08");
        assert_eq!(updated.meal_type, "lunch");
        let dish_ids: Vec<&str> = updated.dishes.iter().map(|d| d.dish_id.as_str()).collect();
        assert_eq!(dish_ids, vec![dish.as_str()]);
    }

    #[tokio::test]
    async fn test_update_menu_onto_occupied_slot_hits_unique_index() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002012").await;
        let dish = seed_dish(&fixture, &owner, "Any").await;

        fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-09", "lunch", vec![dish.clone()]))
            .await
            .expect("Failed to create lunch menu");

        let dinner = fixture
            .menus
            .create_or_replace_menu(&owner, menu_request("2024-03-09", "dinner", vec![dish]))
            .await
            .expect("Failed to create dinner menu");

        // No application-level pre-check exists on this path; the slot's
        // unique index rejects the move.
        let result = fixture
            .menus
            .update_menu(
                &owner,
                &dinner.menu_id,
                UpdateMenuRequest {
                    date: None,
                    meal_type: Some("lunch".to_string()),
                    dish_ids: None,
                },
            )
            .await;
        assert!(matches!(result, Err(MenuError::DuplicateSlot)));
    }

    #[tokio::test]
    async fn test_update_unknown_menu_fails_not_found() {
        let fixture = setup().await;
        let owner = seed_family(&fixture, "13800002013").await;

        let result = fixture
            .menus
            .update_menu(
                &owner,
                "01JNOSUCHMENU0000000000000",
                UpdateMenuRequest {
                    date: None,
                    meal_type: None,
                    dish_ids: None,
                },
            )
            .await;
        assert!(matches!(result, Err(MenuError::NotFound)));
    }
}
