use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dishes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Dishes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Dishes::FamilyId).string().not_null())
                    .col(ColumnDef::new(Dishes::Name).string().not_null())
                    .col(ColumnDef::new(Dishes::Category).string())
                    .col(ColumnDef::new(Dishes::Description).string())
                    .col(ColumnDef::new(Dishes::ImageUrl).string())
                    .col(ColumnDef::new(Dishes::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Dishes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Dishes::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Dishes::DeletedAt).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dishes_family_id")
                            .from(Dishes::Table, Dishes::FamilyId)
                            .to(Families::Table, Families::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dishes_family_id")
                    .table(Dishes::Table)
                    .col(Dishes::FamilyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DishIngredients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DishIngredients::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(DishIngredients::DishId).string().not_null())
                    .col(ColumnDef::new(DishIngredients::Name).string().not_null())
                    .col(ColumnDef::new(DishIngredients::Amount).double().not_null())
                    .col(ColumnDef::new(DishIngredients::Unit).string().not_null())
                    .col(ColumnDef::new(DishIngredients::Category).string())
                    .col(ColumnDef::new(DishIngredients::StorageDays).integer())
                    .col(ColumnDef::new(DishIngredients::SortOrder).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dish_ingredients_dish_id")
                            .from(DishIngredients::Table, DishIngredients::DishId)
                            .to(Dishes::Table, Dishes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dish_ingredients_dish_id")
                    .table(DishIngredients::Table)
                    .col(DishIngredients::DishId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CookingSteps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CookingSteps::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(CookingSteps::DishId).string().not_null())
                    .col(ColumnDef::new(CookingSteps::StepOrder).integer().not_null())
                    .col(ColumnDef::new(CookingSteps::Content).string().not_null())
                    .col(ColumnDef::new(CookingSteps::ImageUrl).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cooking_steps_dish_id")
                            .from(CookingSteps::Table, CookingSteps::DishId)
                            .to(Dishes::Table, Dishes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cooking_steps_dish_id")
                    .table(CookingSteps::Table)
                    .col(CookingSteps::DishId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CookingSteps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DishIngredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Dishes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Families {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Dishes {
    Table,
    Id,
    FamilyId,
    Name,
    Category,
    Description,
    ImageUrl,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum DishIngredients {
    Table,
    Id,
    DishId,
    Name,
    Amount,
    Unit,
    Category,
    StorageDays,
    SortOrder,
}

#[derive(DeriveIden)]
enum CookingSteps {
    Table,
    Id,
    DishId,
    StepOrder,
    Content,
    ImageUrl,
}
