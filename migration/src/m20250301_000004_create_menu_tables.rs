use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Menus::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Menus::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Menus::FamilyId).string().not_null())
                    .col(ColumnDef::new(Menus::Date).date().not_null())
                    .col(ColumnDef::new(Menus::MealType).string().not_null())
                    .col(ColumnDef::new(Menus::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Menus::Source).string().not_null())
                    .col(ColumnDef::new(Menus::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Menus::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menus_family_id")
                            .from(Menus::Table, Menus::FamilyId)
                            .to(Families::Table, Families::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The upsert in the planner is check-then-insert; this index is the
        // authoritative guard for one menu per (family, date, meal slot).
        manager
            .create_index(
                Index::create()
                    .name("idx_menus_family_date_meal")
                    .table(Menus::Table)
                    .col(Menus::FamilyId)
                    .col(Menus::Date)
                    .col(Menus::MealType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MenuDishes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MenuDishes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(MenuDishes::MenuId).string().not_null())
                    .col(ColumnDef::new(MenuDishes::DishId).string().not_null())
                    .col(ColumnDef::new(MenuDishes::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_dishes_menu_id")
                            .from(MenuDishes::Table, MenuDishes::MenuId)
                            .to(Menus::Table, Menus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_dishes_menu_dish")
                    .table(MenuDishes::Table)
                    .col(MenuDishes::MenuId)
                    .col(MenuDishes::DishId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_dishes_dish_id")
                    .table(MenuDishes::Table)
                    .col(MenuDishes::DishId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuDishes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Menus::Table).to_owned())
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
enum Menus {
    Table,
    Id,
    FamilyId,
    Date,
    MealType,
    CreatedBy,
    Source,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MenuDishes {
    Table,
    Id,
    MenuId,
    DishId,
    CreatedAt,
}
