use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IngredientCatalog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IngredientCatalog::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(IngredientCatalog::Name).string().not_null())
                    .col(ColumnDef::new(IngredientCatalog::NameEn).string())
                    .col(ColumnDef::new(IngredientCatalog::Category).string())
                    .col(ColumnDef::new(IngredientCatalog::DefaultUnit).string())
                    .col(ColumnDef::new(IngredientCatalog::StorageDays).integer())
                    .col(ColumnDef::new(IngredientCatalog::Description).string())
                    .col(ColumnDef::new(IngredientCatalog::IsActive).boolean().not_null().default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ingredient_catalog_category")
                    .table(IngredientCatalog::Table)
                    .col(IngredientCatalog::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IngredientCatalog::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum IngredientCatalog {
    Table,
    Id,
    Name,
    NameEn,
    Category,
    DefaultUnit,
    StorageDays,
    Description,
    IsActive,
}
