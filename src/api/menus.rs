use std::sync::Arc;

use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};

use crate::api::{authenticate, BearerAuth};
use crate::errors::ApiError;
use crate::services::{MenuService, TokenService};
use crate::types::dto::menu::{
    CreateMenuRequest, DailyMenuResponse, MenuCreateResponse, MenuDetail, UpdateMenuRequest,
    WeeklyMenuResponse,
};

/// Menu planning endpoints
pub struct MenuApi {
    menu_service: Arc<MenuService>,
    token_service: Arc<TokenService>,
}

#[derive(Tags)]
enum MenuTags {
    /// Menu planning endpoints
    Menus,
}

impl MenuApi {
    pub fn new(menu_service: Arc<MenuService>, token_service: Arc<TokenService>) -> Self {
        Self {
            menu_service,
            token_service,
        }
    }
}

#[OpenApi]
impl MenuApi {
    /// Create or replace the menu for a (date, meal slot) tuple
    #[oai(path = "/menus", method = "post", tag = "MenuTags::Menus")]
    async fn create_or_replace(
        &self,
        auth: BearerAuth,
        body: Json<CreateMenuRequest>,
    ) -> Result<Json<MenuCreateResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let saved = self.menu_service.create_or_replace_menu(&user_id, body.0).await?;
        Ok(Json(saved))
    }

    /// Menus for one date, breakfast → lunch → dinner
    #[oai(path = "/menus/daily", method = "get", tag = "MenuTags::Menus")]
    async fn daily(
        &self,
        auth: BearerAuth,
        date: Query<String>,
    ) -> Result<Json<DailyMenuResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let daily = self.menu_service.get_daily_menu(&user_id, &date.0).await?;
        Ok(Json(daily))
    }

    /// Menus for the 7-day window starting at start_date
    #[oai(path = "/menus/weekly", method = "get", tag = "MenuTags::Menus")]
    async fn weekly(
        &self,
        auth: BearerAuth,
        start_date: Query<String>,
    ) -> Result<Json<WeeklyMenuResponse>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let weekly = self.menu_service.get_weekly_menu(&user_id, &start_date.0).await?;
        Ok(Json(weekly))
    }

    /// Update a menu by id; omitted fields keep their stored values
    #[oai(path = "/menus/:menu_id", method = "put", tag = "MenuTags::Menus")]
    async fn update(
        &self,
        auth: BearerAuth,
        menu_id: Path<String>,
        body: Json<UpdateMenuRequest>,
    ) -> Result<Json<MenuDetail>, ApiError> {
        let user_id = authenticate(&self.token_service, &auth)?;
        let detail = self.menu_service.update_menu(&user_id, &menu_id.0, body.0).await?;
        Ok(Json(detail))
    }
}
