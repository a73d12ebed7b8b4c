use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};

/// Connect to the relational store and bring the schema up to date.
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    tracing::info!("connecting to database");
    let db = Database::connect(database_url).await?;

    tracing::info!("running migrations");
    Migrator::up(&db, None).await?;

    Ok(db)
}
