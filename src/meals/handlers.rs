use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateMealRequest, MealDetails, Pagination};
use super::repo::{Meal, MealIngredientRow};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

// Fallback art for custom meals created without a picture, as seeded meals
// always carry one.
const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1546549032-9571cd6b27df?auto=format&fit=crop&w=800&q=80";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/:id", get(get_meal))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Meal>>, ApiError> {
    let meals = Meal::list(&state.db, p.limit, p.offset).await?;
    Ok(Json(meals))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealDetails>, ApiError> {
    let meal = Meal::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal not found"))?;
    let ingredients = MealIngredientRow::for_meal(&state.db, id).await?;
    Ok(Json(MealDetails { meal, ingredients }))
}

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<Meal>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    if payload.servings < 1 {
        return Err(ApiError::validation("servings must be at least 1"));
    }
    if payload.prep_time < 0 || payload.cook_time < 0 {
        return Err(ApiError::validation("prep and cook times cannot be negative"));
    }

    let image_url = payload
        .image_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_IMAGE_URL);

    let meal = Meal::create(
        &state.db,
        user_id,
        payload.name.trim(),
        payload.description.as_deref(),
        image_url,
        payload.prep_time,
        payload.cook_time,
        payload.servings,
        &payload.dietary_tags,
        payload.cuisine_type.as_deref(),
        &payload.difficulty_level,
    )
    .await?;

    info!(meal_id = %meal.id, user_id = %user_id, "meal created");
    Ok((StatusCode::CREATED, Json(meal)))
}
