use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use time::Date;
use tracing::{info, instrument};
use uuid::Uuid;

use super::repo::PantryItem;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::meals::repo::Ingredient;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddPantryItemRequest {
    pub ingredient_id: Uuid,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub expiry_date: Option<Date>,
    pub notes: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pantry", get(list_items).post(add_item))
        .route("/pantry/:id", delete(delete_item))
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<PantryItem>>, ApiError> {
    let items = PantryItem::list_for_user(&state.db, user_id).await?;
    Ok(Json(items))
}

#[instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddPantryItemRequest>,
) -> Result<(StatusCode, Json<PantryItem>), ApiError> {
    if Ingredient::find(&state.db, payload.ingredient_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("Ingredient not found"));
    }

    let item = PantryItem::insert(
        &state.db,
        user_id,
        payload.ingredient_id,
        payload.amount,
        payload.unit.as_deref(),
        payload.expiry_date,
        payload.notes.as_deref(),
    )
    .await?;

    info!(item_id = %item.id, user_id = %user_id, "pantry item added");
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !PantryItem::delete_one(&state.db, user_id, item_id).await? {
        return Err(ApiError::not_found("Pantry item not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
