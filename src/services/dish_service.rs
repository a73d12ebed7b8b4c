use std::sync::Arc;

use crate::errors::domain::DishError;
use crate::stores::{DishStore, FamilyStore, NewIngredient, NewStep};
use crate::types::db::{cooking_step, dish, dish_ingredient, family};
use crate::types::dto::dish::{
    CookingStepInput, CookingStepView, CreateDishRequest, DishCreateResponse, DishDetailResponse,
    DishListResponse, DishSummary, IngredientInput, IngredientView, UpdateDishRequest,
};

const MAX_DISH_INGREDIENTS: usize = 50;
const MAX_DISH_STEPS: usize = 50;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

/// Dish catalog rules: per-family name uniqueness, dish cap,
/// ingredient/step validation, creator-or-owner mutation permission, and
/// soft deletion cascading into menu references.
pub struct DishService {
    dish_store: Arc<DishStore>,
    family_store: Arc<FamilyStore>,
}

impl DishService {
    pub fn new(dish_store: Arc<DishStore>, family_store: Arc<FamilyStore>) -> Self {
        Self {
            dish_store,
            family_store,
        }
    }

    pub async fn create_dish(&self, user_id: &str, req: CreateDishRequest) -> Result<DishCreateResponse, DishError> {
        let family = self.family_for_user(user_id).await?;

        let name = req.name.trim().to_string();
        if name.is_empty() {
            return Err(DishError::InvalidName);
        }

        let ingredients = normalize_ingredients(req.ingredients)?;
        let steps = normalize_steps(req.steps)?;

        let count = self.dish_store.count_by_family(&family.id).await?;
        if count >= u64::try_from(family.max_dishes).unwrap_or(0) {
            return Err(DishError::LimitReached);
        }

        if self.dish_store.exists_by_name(&family.id, &name, None).await? {
            return Err(DishError::NameExists);
        }

        let created = self
            .dish_store
            .create_with_details(
                &family.id,
                user_id,
                name,
                normalize_optional(req.category),
                normalize_optional(req.description),
                normalize_optional(req.image_url),
                ingredients,
                steps,
            )
            .await?;

        tracing::info!(dish_id = %created.id, family_id = %family.id, "dish created");

        Ok(DishCreateResponse {
            dish_id: created.id,
            name: created.name,
        })
    }

    pub async fn get_dish_list(
        &self,
        user_id: &str,
        page: Option<u64>,
        page_size: Option<u64>,
        category: Option<String>,
        keyword: Option<String>,
    ) -> Result<DishListResponse, DishError> {
        let family = self.family_for_user(user_id).await?;

        let page = page.unwrap_or(1).max(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let category = normalize_optional(category);
        let keyword = normalize_optional(keyword);

        let (dishes, total) = self
            .dish_store
            .list(&family.id, page, page_size, category.as_deref(), keyword.as_deref())
            .await?;

        Ok(DishListResponse {
            dishes: dishes.into_iter().map(summary_from).collect(),
            total,
            page,
            page_size,
        })
    }

    pub async fn get_dish_detail(&self, user_id: &str, dish_id: &str) -> Result<DishDetailResponse, DishError> {
        let family = self.family_for_user(user_id).await?;

        let found = self
            .dish_store
            .find_in_family(dish_id, &family.id)
            .await?
            .ok_or(DishError::NotFound)?;

        self.build_detail(found).await
    }

    /// Update a dish, replacing its ingredients and steps wholesale.
    ///
    /// Only the original creator or the family owner may mutate a dish.
    pub async fn update_dish(
        &self,
        user_id: &str,
        dish_id: &str,
        req: UpdateDishRequest,
    ) -> Result<DishDetailResponse, DishError> {
        let family = self.family_for_user(user_id).await?;

        let existing = self
            .dish_store
            .find_in_family(dish_id, &family.id)
            .await?
            .ok_or(DishError::NotFound)?;

        if existing.created_by != user_id && family.owner_id != user_id {
            return Err(DishError::PermissionDenied);
        }

        let name = req.name.trim().to_string();
        if name.is_empty() {
            return Err(DishError::InvalidName);
        }

        let ingredients = normalize_ingredients(req.ingredients)?;
        let steps = normalize_steps(req.steps)?;

        // Re-check uniqueness only when the name actually changed, excluding
        // the dish's own row.
        if name.to_lowercase() != existing.name.to_lowercase()
            && self.dish_store.exists_by_name(&family.id, &name, Some(&existing.id)).await?
        {
            return Err(DishError::NameExists);
        }

        let updated = self
            .dish_store
            .update_with_details(
                existing,
                name,
                normalize_optional(req.category),
                normalize_optional(req.description),
                normalize_optional(req.image_url),
                ingredients,
                steps,
            )
            .await?;

        tracing::info!(dish_id = %updated.id, family_id = %family.id, "dish updated");

        self.build_detail(updated).await
    }

    /// Soft-delete a dish. Its ingredients, steps, and menu associations are
    /// purged in the same transaction; menus that referenced it simply
    /// render without it from now on.
    pub async fn delete_dish(&self, user_id: &str, dish_id: &str) -> Result<(), DishError> {
        let family = self.family_for_user(user_id).await?;

        let existing = self
            .dish_store
            .find_in_family(dish_id, &family.id)
            .await?
            .ok_or(DishError::NotFound)?;

        if existing.created_by != user_id && family.owner_id != user_id {
            return Err(DishError::PermissionDenied);
        }

        let deleted = self.dish_store.soft_delete(&existing.id, &family.id).await?;
        if !deleted {
            return Err(DishError::NotFound);
        }

        tracing::info!(dish_id = %dish_id, family_id = %family.id, "dish deleted");

        Ok(())
    }

    async fn family_for_user(&self, user_id: &str) -> Result<family::Model, DishError> {
        self.family_store
            .find_family_by_user(user_id)
            .await?
            .ok_or(DishError::FamilyNotFound)
    }

    async fn build_detail(&self, model: dish::Model) -> Result<DishDetailResponse, DishError> {
        let ingredients = self.dish_store.get_ingredients(&model.id).await?;
        let steps = self.dish_store.get_steps(&model.id).await?;

        Ok(DishDetailResponse {
            dish_id: model.id,
            name: model.name,
            category: model.category,
            description: model.description,
            image_url: model.image_url,
            created_by: model.created_by,
            ingredients: ingredients.into_iter().map(ingredient_view).collect(),
            steps: steps.into_iter().map(step_view).collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

pub(crate) fn summary_from(model: dish::Model) -> DishSummary {
    DishSummary {
        dish_id: model.id,
        name: model.name,
        category: model.category,
        description: model.description,
        image_url: model.image_url,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn ingredient_view(model: dish_ingredient::Model) -> IngredientView {
    IngredientView {
        ingredient_id: model.id,
        name: model.name,
        amount: model.amount,
        unit: model.unit,
        category: model.category,
        storage_days: model.storage_days,
        sort_order: model.sort_order,
    }
}

fn step_view(model: cooking_step::Model) -> CookingStepView {
    CookingStepView {
        step_id: model.id,
        order: model.step_order,
        content: model.content,
        image_url: model.image_url,
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Validate and normalize ingredient inputs: 1..=50 entries, non-empty
/// name/unit, positive amount. Display order defaults to the 1-based input
/// position; the stable sort keeps input order on ties.
fn normalize_ingredients(inputs: Vec<IngredientInput>) -> Result<Vec<NewIngredient>, DishError> {
    if inputs.is_empty() || inputs.len() > MAX_DISH_INGREDIENTS {
        return Err(DishError::InvalidIngredients);
    }

    let mut items = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.into_iter().enumerate() {
        let name = input.name.trim().to_string();
        let unit = input.unit.trim().to_string();
        if name.is_empty() || unit.is_empty() || input.amount <= 0.0 {
            return Err(DishError::InvalidIngredients);
        }

        let sort_order = match input.sort_order {
            Some(order) if order > 0 => order,
            _ => (index + 1) as i32,
        };

        items.push(NewIngredient {
            name,
            amount: input.amount,
            unit,
            category: normalize_optional(input.category),
            storage_days: input.storage_days.filter(|d| *d >= 0),
            sort_order,
        });
    }

    items.sort_by_key(|i| i.sort_order);

    Ok(items)
}

/// Validate and normalize step inputs, same rules as ingredients with
/// non-empty content.
fn normalize_steps(inputs: Vec<CookingStepInput>) -> Result<Vec<NewStep>, DishError> {
    if inputs.is_empty() || inputs.len() > MAX_DISH_STEPS {
        return Err(DishError::InvalidSteps);
    }

    let mut steps = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.into_iter().enumerate() {
        let content = input.content.trim().to_string();
        if content.is_empty() {
            return Err(DishError::InvalidSteps);
        }

        let order = match input.order {
            Some(order) if order > 0 => order,
            _ => (index + 1) as i32,
        };

        steps.push(NewStep {
            order,
            content,
            image_url: normalize_optional(input.image_url),
        });
    }

    steps.sort_by_key(|s| s.order);

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::FamilyService;
    use crate::stores::UserStore;
    use crate::types::dto::family::CreateFamilyRequest;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
        IntoActiveModel, Set,
    };

    struct Fixture {
        db: DatabaseConnection,
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
        let users = Arc::new(UserStore::new(db.clone()));

        Fixture {
            db,
            dishes: DishService::new(Arc::clone(&dish_store), Arc::clone(&family_store)),
            families: FamilyService::new(family_store, dish_store, Arc::clone(&users)),
            users,
        }
    }

    async fn seed_user(fixture: &Fixture, phone: &str) -> String {
        fixture
            .users
            .register(phone, "password123", None, None)
            .await
            .expect("Failed to register user")
            .id
    }

    async fn seed_family(fixture: &Fixture, owner_phone: &str, name: &str) -> (String, String) {
        let owner = seed_user(fixture, owner_phone).await;
        let family = fixture
            .families
            .create_family(
                &owner,
                CreateFamilyRequest {
                    name: name.to_string(),
                    description: None,
                },
            )
            .await
            .expect("Failed to create family");
        (owner, family.family_id)
    }

    fn ingredient(name: &str, sort_order: Option<i32>) -> IngredientInput {
        IngredientInput {
            name: name.to_string(),
            amount: 100.0,
            unit: "g".to_string(),
            category: None,
            storage_days: None,
            sort_order,
        }
    }

    fn step(content: &str, order: Option<i32>) -> CookingStepInput {
        CookingStepInput {
            order,
            content: content.to_string(),
            image_url: None,
        }
    }

    fn dish_request(name: &str) -> CreateDishRequest {
        CreateDishRequest {
            name: name.to_string(),
            category: None,
            description: None,
            image_url: None,
            ingredients: vec![ingredient("pork", None)],
            steps: vec![step("braise until tender", None)],
        }
    }

    async fn shrink_dish_cap(db: &DatabaseConnection, family_id: &str, cap: i32) {
        let model = family::Entity::find_by_id(family_id)
            .one(db)
            .await
            .expect("Failed to query family")
            .expect("Family not found");
        let mut active = model.into_active_model();
        active.max_dishes = Set(cap);
        active.update(db).await.expect("Failed to update cap");
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_case_insensitively() {
        let fixture = setup().await;
        let (owner, _) = seed_family(&fixture, "13800001001", "Family").await;

        fixture
            .dishes
            .create_dish(&owner, dish_request("Mapo Tofu"))
            .await
            .expect("Failed to create dish");

        let result = fixture.dishes.create_dish(&owner, dish_request("MAPO TOFU")).await;
        assert!(matches!(result, Err(DishError::NameExists)));
    }

    #[tokio::test]
    async fn test_same_name_allowed_across_families() {
        let fixture = setup().await;
        let (owner_a, _) = seed_family(&fixture, "13800001002", "Family A").await;
        let (owner_b, _) = seed_family(&fixture, "13800001003", "Family B").await;

        fixture
            .dishes
            .create_dish(&owner_a, dish_request("Dumplings"))
            .await
            .expect("Failed to create in family A");
        fixture
            .dishes
            .create_dish(&owner_b, dish_request("Dumplings"))
            .await
            .expect("Failed to create in family B");
    }

    #[tokio::test]
    async fn test_ingredient_count_boundaries() {
        let fixture = setup().await;
        let (owner, _) = seed_family(&fixture, "13800001004", "Family").await;

        let mut req = dish_request("Boundary Fifty");
        req.ingredients = (0..50).map(|i| ingredient(&format!("item {i}"), None)).collect();
        fixture
            .dishes
            .create_dish(&owner, req)
            .await
            .expect("50 ingredients should be accepted");

        let mut req = dish_request("Boundary Fifty One");
        req.ingredients = (0..51).map(|i| ingredient(&format!("item {i}"), None)).collect();
        let result = fixture.dishes.create_dish(&owner, req).await;
        assert!(matches!(result, Err(DishError::InvalidIngredients)));

        let mut req = dish_request("Boundary Zero");
        req.ingredients = vec![];
        let result = fixture.dishes.create_dish(&owner, req).await;
        assert!(matches!(result, Err(DishError::InvalidIngredients)));
    }

    #[tokio::test]
    async fn test_step_validation() {
        let fixture = setup().await;
        let (owner, _) = seed_family(&fixture, "13800001005", "Family").await;

        let mut req = dish_request("No Steps");
        req.steps = vec![];
        let result = fixture.dishes.create_dish(&owner, req).await;
        assert!(matches!(result, Err(DishError::InvalidSteps)));

        let mut req = dish_request("Blank Step");
        req.steps = vec![step("   ", None)];
        let result = fixture.dishes.create_dish(&owner, req).await;
        assert!(matches!(result, Err(DishError::InvalidSteps)));
    }

    #[tokio::test]
    async fn test_ingredient_field_validation() {
        let fixture = setup().await;
        let (owner, _) = seed_family(&fixture, "13800001006", "Family").await;

        let mut req = dish_request("Zero Amount");
        req.ingredients = vec![IngredientInput {
            amount: 0.0,
            ..ingredient("salt", None)
        }];
        let result = fixture.dishes.create_dish(&owner, req).await;
        assert!(matches!(result, Err(DishError::InvalidIngredients)));

        let mut req = dish_request("Blank Unit");
        req.ingredients = vec![IngredientInput {
            unit: " ".to_string(),
            ..ingredient("salt", None)
        }];
        let result = fixture.dishes.create_dish(&owner, req).await;
        assert!(matches!(result, Err(DishError::InvalidIngredients)));
    }

    #[tokio::test]
    async fn test_round_trip_preserves_sort_normalization() {
        let fixture = setup().await;
        let (owner, _) = seed_family(&fixture, "13800001007", "Family").await;

        let mut req = dish_request("Ordered");
        // Explicit order 5 sorts last; the two unordered entries fall back
        // to input positions 2 and 3 and keep their relative order.
        req.ingredients = vec![
            ingredient("comes last", Some(5)),
            ingredient("first unordered", None),
            ingredient("second unordered", Some(0)),
        ];
        req.steps = vec![
            step("explicit late", Some(9)),
            step("first implicit", None),
            step("second implicit", None),
        ];

        let created = fixture
            .dishes
            .create_dish(&owner, req)
            .await
            .expect("Failed to create dish");

        let detail = fixture
            .dishes
            .get_dish_detail(&owner, &created.dish_id)
            .await
            .expect("Failed to get detail");

        let ingredient_names: Vec<&str> = detail.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            ingredient_names,
            vec!["first unordered", "second unordered", "comes last"]
        );
        assert_eq!(
            detail.ingredients.iter().map(|i| i.sort_order).collect::<Vec<_>>(),
            vec![2, 3, 5]
        );

        let step_contents: Vec<&str> = detail.steps.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(
            step_contents,
            vec!["first implicit", "second implicit", "explicit late"]
        );
    }

    #[tokio::test]
    async fn test_dish_cap_enforced() {
        let fixture = setup().await;
        let (owner, family_id) = seed_family(&fixture, "13800001008", "Family").await;
        shrink_dish_cap(&fixture.db, &family_id, 2).await;

        fixture
            .dishes
            .create_dish(&owner, dish_request("One"))
            .await
            .expect("Failed to create first dish");
        fixture
            .dishes
            .create_dish(&owner, dish_request("Two"))
            .await
            .expect("Failed to create second dish");

        let result = fixture.dishes.create_dish(&owner, dish_request("Three")).await;
        assert!(matches!(result, Err(DishError::LimitReached)));
    }

    #[tokio::test]
    async fn test_deleting_frees_cap_and_name() {
        let fixture = setup().await;
        let (owner, family_id) = seed_family(&fixture, "13800001009", "Family").await;
        shrink_dish_cap(&fixture.db, &family_id, 1).await;

        let created = fixture
            .dishes
            .create_dish(&owner, dish_request("Signature"))
            .await
            .expect("Failed to create dish");

        fixture
            .dishes
            .delete_dish(&owner, &created.dish_id)
            .await
            .expect("Failed to delete dish");

        let result = fixture.dishes.get_dish_detail(&owner, &created.dish_id).await;
        assert!(matches!(result, Err(DishError::NotFound)));

        // The soft-deleted row no longer counts against the cap or the name
        fixture
            .dishes
            .create_dish(&owner, dish_request("Signature"))
            .await
            .expect("Name and cap slot should be free again");
    }

    #[tokio::test]
    async fn test_permission_creator_and_owner_only() {
        let fixture = setup().await;
        let (owner, family_id) = seed_family(&fixture, "13800001010", "Family").await;
        let creator = seed_user(&fixture, "13800001011").await;
        let bystander = seed_user(&fixture, "13800001012").await;

        for member in [&creator, &bystander] {
            fixture
                .families
                .join_via_invite(
                    member,
                    crate::types::dto::family::JoinFamilyRequest {
                        family_id: family_id.clone(),
                        family_name: None,
                        inviter_id: owner.clone(),
                        inviter_nickname: None,
                        action: "accept".to_string(),
                    },
                )
                .await
                .expect("Failed to join family");
        }

        let created = fixture
            .dishes
            .create_dish(&creator, dish_request("Creator Special"))
            .await
            .expect("Failed to create dish");

        let result = fixture.dishes.delete_dish(&bystander, &created.dish_id).await;
        assert!(matches!(result, Err(DishError::PermissionDenied)));

        let result = fixture
            .dishes
            .update_dish(&bystander, &created.dish_id, dish_request("Renamed"))
            .await;
        assert!(matches!(result, Err(DishError::PermissionDenied)));

        // Creator may update their own dish; the family owner may delete it.
        fixture
            .dishes
            .update_dish(&creator, &created.dish_id, dish_request("Creator Renamed"))
            .await
            .expect("Creator should update own dish");
        fixture
            .dishes
            .delete_dish(&owner, &created.dish_id)
            .await
            .expect("Owner should delete any dish");
    }

    #[tokio::test]
    async fn test_update_keeps_own_name_without_conflict() {
        let fixture = setup().await;
        let (owner, _) = seed_family(&fixture, "13800001013", "Family").await;

        let created = fixture
            .dishes
            .create_dish(&owner, dish_request("Steady Name"))
            .await
            .expect("Failed to create dish");

        // Re-submitting the same name (different case) is not a conflict
        let updated = fixture
            .dishes
            .update_dish(&owner, &created.dish_id, dish_request("STEADY NAME"))
            .await
            .expect("Failed to update dish");
        assert_eq!(updated.name, "STEADY NAME");
    }

    #[tokio::test]
    async fn test_update_replaces_details_wholesale() {
        let fixture = setup().await;
        let (owner, _) = seed_family(&fixture, "13800001014", "Family").await;

        let mut req = dish_request("Evolving");
        req.ingredients = vec![ingredient("old ingredient", None), ingredient("another", None)];
        let created = fixture
            .dishes
            .create_dish(&owner, req)
            .await
            .expect("Failed to create dish");

        let mut update = dish_request("Evolving");
        update.ingredients = vec![ingredient("brand new", None)];
        update.steps = vec![step("totally new step", None)];

        let detail = fixture
            .dishes
            .update_dish(&owner, &created.dish_id, update)
            .await
            .expect("Failed to update dish");

        assert_eq!(detail.ingredients.len(), 1);
        assert_eq!(detail.ingredients[0].name, "brand new");
        assert_eq!(detail.steps.len(), 1);
        assert_eq!(detail.steps[0].content, "totally new step");
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let fixture = setup().await;
        let (owner, _) = seed_family(&fixture, "13800001015", "Family").await;

        for name in ["Hot Pot", "Hot and Sour Soup", "Cold Noodles"] {
            fixture
                .dishes
                .create_dish(&owner, dish_request(name))
                .await
                .expect("Failed to create dish");
        }

        let listing = fixture
            .dishes
            .get_dish_list(&owner, None, None, None, Some("hot".to_string()))
            .await
            .expect("Failed to list");
        assert_eq!(listing.total, 2);

        let page = fixture
            .dishes
            .get_dish_list(&owner, Some(2), Some(2), None, None)
            .await
            .expect("Failed to list page 2");
        assert_eq!(page.total, 3);
        assert_eq!(page.dishes.len(), 1);

        // Oversized page size is capped rather than rejected
        let capped = fixture
            .dishes
            .get_dish_list(&owner, Some(1), Some(500), None, None)
            .await
            .expect("Failed to list with large page size");
        assert_eq!(capped.page_size, 100);
    }

    #[tokio::test]
    async fn test_detail_unreachable_across_families() {
        let fixture = setup().await;
        let (owner_a, _) = seed_family(&fixture, "13800001016", "Family A").await;
        let (owner_b, _) = seed_family(&fixture, "13800001017", "Family B").await;

        let created = fixture
            .dishes
            .create_dish(&owner_a, dish_request("Private Recipe"))
            .await
            .expect("Failed to create dish");

        let result = fixture.dishes.get_dish_detail(&owner_b, &created.dish_id).await;
        assert!(matches!(result, Err(DishError::NotFound)));
    }

    #[tokio::test]
    async fn test_operations_require_family() {
        let fixture = setup().await;
        let loner = seed_user(&fixture, "13800001018").await;

        let result = fixture.dishes.create_dish(&loner, dish_request("Homeless")).await;
        assert!(matches!(result, Err(DishError::FamilyNotFound)));
    }
}
