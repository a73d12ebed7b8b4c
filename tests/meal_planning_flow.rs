//! End-to-end flow over the service layer: registration, family formation,
//! dish cataloging, and a week of menu planning against one database.

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};

use mealnest_backend::errors::domain::{DishError, FamilyError};
use mealnest_backend::services::{DishService, FamilyService, MenuService};
use mealnest_backend::stores::{DishStore, FamilyStore, MenuStore, UserStore};
use mealnest_backend::types::dto::dish::{CookingStepInput, CreateDishRequest, IngredientInput};
use mealnest_backend::types::dto::family::{CreateFamilyRequest, JoinFamilyRequest};
use mealnest_backend::types::dto::menu::CreateMenuRequest;

struct App {
    users: Arc<UserStore>,
    families: FamilyService,
    dishes: DishService,
    menus: MenuService,
}

async fn start_app() -> App {
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

    App {
        users: Arc::clone(&users),
        families: FamilyService::new(
            Arc::clone(&family_store),
            Arc::clone(&dish_store),
            Arc::clone(&users),
        ),
        dishes: DishService::new(Arc::clone(&dish_store), Arc::clone(&family_store)),
        menus: MenuService::new(menu_store, dish_store, family_store),
    }
}

fn simple_dish(name: &str) -> CreateDishRequest {
    CreateDishRequest {
        name: name.to_string(),
        category: Some("home cooking".to_string()),
        description: None,
        image_url: None,
        ingredients: vec![IngredientInput {
            name: "main ingredient".to_string(),
            amount: 250.0,
            unit: "g".to_string(),
            category: None,
            storage_days: Some(3),
            sort_order: None,
        }],
        steps: vec![CookingStepInput {
            order: None,
            content: "prepare and cook".to_string(),
            image_url: None,
        }],
    }
}

#[tokio::test]
async fn test_family_plans_a_week_of_meals() {
    let app = start_app().await;

    // Two people register; one founds the household, the other joins.
    let owner = app
        .users
        .register("13900010001", "hunter2hunter2", Some("Chef Zhang".to_string()), None)
        .await
        .expect("Failed to register owner")
        .id;
    let member = app
        .users
        .register("13900010002", "correcthorse", None, None)
        .await
        .expect("Failed to register member")
        .id;

    let family = app
        .families
        .create_family(
            &owner,
            CreateFamilyRequest {
                name: "Zhang Household".to_string(),
                description: Some("weeknight meals".to_string()),
            },
        )
        .await
        .expect("Failed to create family");

    app.families
        .join_via_invite(
            &member,
            JoinFamilyRequest {
                family_id: family.family_id.clone(),
                family_name: Some("Zhang Household".to_string()),
                inviter_id: owner.clone(),
                inviter_nickname: Some("Chef Zhang".to_string()),
                action: "accept".to_string(),
            },
        )
        .await
        .expect("Failed to join family");

    // Both members contribute dishes to the shared catalog.
    let congee = app
        .dishes
        .create_dish(&owner, simple_dish("Pork Congee"))
        .await
        .expect("Failed to create congee")
        .dish_id;
    let stir_fry = app
        .dishes
        .create_dish(&member, simple_dish("Garlic Stir Fry"))
        .await
        .expect("Failed to create stir fry")
        .dish_id;

    let info = app.families.get_family_info(&member).await.expect("Failed to get info");
    assert_eq!(info.member_count, 2);
    assert_eq!(info.dish_count, 2);

    // Plan breakfast and dinner across the week.
    for date in ["2024-03-04", "2024-03-05", "2024-03-06"] {
        app.menus
            .create_or_replace_menu(
                &member,
                CreateMenuRequest {
                    date: date.to_string(),
                    meal_type: "breakfast".to_string(),
                    dish_ids: vec![congee.clone()],
                },
            )
            .await
            .expect("Failed to plan breakfast");
    }
    app.menus
        .create_or_replace_menu(
            &owner,
            CreateMenuRequest {
                date: "2024-03-04".to_string(),
                meal_type: "dinner".to_string(),
                dish_ids: vec![stir_fry.clone(), congee.clone()],
            },
        )
        .await
        .expect("Failed to plan dinner");

    let weekly = app
        .menus
        .get_weekly_menu(&owner, "2024-03-04")
        .await
        .expect("Failed to get weekly menu");
    assert_eq!(weekly.end_date, "2024-03-10");
    assert_eq!(weekly.menus.len(), 4);

    // The member cannot delete the owner's dish, but the owner can delete
    // the member's.
    let result = app.dishes.delete_dish(&member, &congee).await;
    assert!(matches!(result, Err(DishError::PermissionDenied)));

    app.dishes
        .delete_dish(&owner, &stir_fry)
        .await
        .expect("Owner should delete member dish");

    // The dinner menu silently loses the deleted dish but keeps the rest.
    let daily = app
        .menus
        .get_daily_menu(&owner, "2024-03-04")
        .await
        .expect("Failed to get daily menu");
    assert_eq!(daily.menus.len(), 2);
    let dinner = daily
        .menus
        .iter()
        .find(|m| m.meal_type == "dinner")
        .expect("Dinner slot missing");
    assert_eq!(dinner.dishes.len(), 1);
    assert_eq!(dinner.dishes[0].dish_id, congee);
}

#[tokio::test]
async fn test_membership_is_exclusive_across_families() {
    let app = start_app().await;

    let founder_a = app
        .users
        .register("13900020001", "password-a", None, None)
        .await
        .expect("Failed to register")
        .id;
    let founder_b = app
        .users
        .register("13900020002", "password-b", None, None)
        .await
        .expect("Failed to register")
        .id;

    app.families
        .create_family(
            &founder_a,
            CreateFamilyRequest {
                name: "House A".to_string(),
                description: None,
            },
        )
        .await
        .expect("Failed to create House A");
    let family_b = app
        .families
        .create_family(
            &founder_b,
            CreateFamilyRequest {
                name: "House B".to_string(),
                description: None,
            },
        )
        .await
        .expect("Failed to create House B");

    // A founder of one household cannot also join another.
    let result = app
        .families
        .join_via_invite(
            &founder_a,
            JoinFamilyRequest {
                family_id: family_b.family_id,
                family_name: None,
                inviter_id: founder_b,
                inviter_nickname: None,
                action: "accept".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(FamilyError::AlreadyInFamily)));
}
