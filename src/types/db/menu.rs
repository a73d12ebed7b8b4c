use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "menus")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub family_id: String,
    pub date: Date,
    pub meal_type: String,
    pub created_by: String,
    pub source: String,
    pub created_at: i64,
    pub updated_at: i64,
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
    #[sea_orm(has_many = "super::menu_dish::Entity")]
    MenuDishes,
}

impl Related<super::menu_dish::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuDishes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
