use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::UpdateProfileRequest;
use super::repo::Profile;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    Ok(Json(profile))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    if payload.household_size < 1 {
        return Err(ApiError::validation("household_size must be at least 1"));
    }

    let profile = Profile::update(
        &state.db,
        user_id,
        payload.full_name.as_deref(),
        &payload.dietary_preferences,
        &payload.allergies,
        payload.cooking_skill_level.as_str(),
        payload.household_size,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    info!(user_id = %user_id, "profile updated");
    Ok(Json(profile))
}
