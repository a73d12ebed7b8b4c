use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dishes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub family_id: String,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
    /// Soft-delete marker; dishes are never physically removed.
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::family::Entity",
        from = "Column::FamilyId",
        to = "super::family::Column::Id",
        on_delete = "Cascade"
    )]
    Family,
    #[sea_orm(has_many = "super::dish_ingredient::Entity")]
    DishIngredients,
    #[sea_orm(has_many = "super::cooking_step::Entity")]
    CookingSteps,
}

impl Related<super::dish_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DishIngredients.def()
    }
}

impl Related<super::cooking_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CookingSteps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
