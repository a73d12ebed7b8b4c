pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_family_tables;
mod m20250301_000003_create_dish_tables;
mod m20250301_000004_create_menu_tables;
mod m20250301_000005_create_ingredient_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_family_tables::Migration),
            Box::new(m20250301_000003_create_dish_tables::Migration),
            Box::new(m20250301_000004_create_menu_tables::Migration),
            Box::new(m20250301_000005_create_ingredient_catalog::Migration),
        ]
    }
}
