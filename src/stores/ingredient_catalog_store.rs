use sea_orm::sea_query::{Condition, Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::errors::InternalError;
use crate::types::db::ingredient_catalog;

/// Read-only lookup over the shared ingredient reference table.
pub struct IngredientCatalogStore {
    db: DatabaseConnection,
}

impl IngredientCatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Case-insensitive substring search on name or English alias, active
    /// entries only, ordered by name.
    pub async fn search_active(
        &self,
        keyword: &str,
        limit: u64,
    ) -> Result<Vec<ingredient_catalog::Model>, InternalError> {
        let pattern = format!("%{}%", keyword.to_lowercase());

        ingredient_catalog::Entity::find()
            .filter(ingredient_catalog::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(ingredient_catalog::Column::Name)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(ingredient_catalog::Column::NameEn)))
                            .like(pattern),
                    ),
            )
            .order_by_asc(ingredient_catalog::Column::Name)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("search_ingredient_catalog", e))
    }

    /// Exact-category listing with optional keyword narrowing, paginated.
    pub async fn list_by_category(
        &self,
        category: &str,
        keyword: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<ingredient_catalog::Model>, u64), InternalError> {
        let mut query = ingredient_catalog::Entity::find()
            .filter(ingredient_catalog::Column::IsActive.eq(true))
            .filter(ingredient_catalog::Column::Category.eq(category));

        if let Some(keyword) = keyword {
            let pattern = format!("%{}%", keyword.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(ingredient_catalog::Column::Name)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(ingredient_catalog::Column::NameEn)))
                            .like(pattern),
                    ),
            );
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_ingredient_catalog", e))?;

        let items = query
            .order_by_asc(ingredient_catalog::Column::Name)
            .offset(page.saturating_sub(1) * page_size)
            .limit(page_size)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_ingredient_catalog", e))?;

        Ok((items, total))
    }
}
