use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::models::{FoodItem, ScreenTier, Theater};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Serialize)]
struct CatalogPayload {
    theaters: Vec<Theater>,
    screen_tiers: Vec<ScreenTier>,
    food_items: Vec<FoodItem>,
}

/// Everything a booking front-end needs to populate its selection widgets.
pub async fn get_catalog(State(state): State<AppState>) -> Result<Response, AppError> {
    let engine = state.engine()?;
    let catalog = engine.catalog();

    let payload = CatalogPayload {
        theaters: catalog.theaters.clone(),
        screen_tiers: catalog.screen_tiers.clone(),
        food_items: catalog.food_items.clone(),
    };

    Ok(success(payload, "Catalog retrieved").into_response())
}
