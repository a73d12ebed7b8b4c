use sea_orm::entity::prelude::*;

/// Shared ingredient reference data. Seeded out of band; this backend only
/// reads it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredient_catalog")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub category: Option<String>,
    pub default_unit: Option<String>,
    pub storage_days: Option<i32>,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
