use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Families::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Families::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Families::Name).string().not_null())
                    .col(ColumnDef::new(Families::Description).string())
                    .col(ColumnDef::new(Families::OwnerId).string().not_null())
                    .col(ColumnDef::new(Families::MaxDishes).integer().not_null().default(30))
                    .col(ColumnDef::new(Families::Status).integer().not_null().default(1))
                    .col(ColumnDef::new(Families::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Families::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FamilyMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FamilyMembers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(FamilyMembers::FamilyId).string().not_null())
                    .col(ColumnDef::new(FamilyMembers::UserId).string().not_null())
                    .col(ColumnDef::new(FamilyMembers::Role).string().not_null())
                    .col(ColumnDef::new(FamilyMembers::Status).integer().not_null().default(1))
                    .col(ColumnDef::new(FamilyMembers::JoinedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_family_members_family_id")
                            .from(FamilyMembers::Table, FamilyMembers::FamilyId)
                            .to(Families::Table, Families::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One membership row per (family, user). There is deliberately no
        // global "one active family per user" constraint; that rule lives in
        // the application layer.
        manager
            .create_index(
                Index::create()
                    .name("idx_family_members_family_user")
                    .table(FamilyMembers::Table)
                    .col(FamilyMembers::FamilyId)
                    .col(FamilyMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_family_members_user_id")
                    .table(FamilyMembers::Table)
                    .col(FamilyMembers::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FamilyMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Families::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Families {
    Table,
    Id,
    Name,
    Description,
    OwnerId,
    MaxDishes,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FamilyMembers {
    Table,
    Id,
    FamilyId,
    UserId,
    Role,
    Status,
    JoinedAt,
}
