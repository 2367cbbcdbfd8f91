use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{GeneratedPlanResponse, PlanItemsResponse, ScheduleMealRequest};
use super::planner;
use super::repo::{MealPlan, MealPlanItem};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::meals::repo::Meal;
use crate::profiles::repo::Profile;
use crate::state::AppState;
use crate::util::short_date;

/// How much catalog the generator gets to choose from.
const CANDIDATE_FETCH_LIMIT: i64 = 20;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans).post(create_plan))
        .route("/plans/current", get(current_plan))
        .route("/plans/generate", post(generate_plan))
        .route("/plans/:id/items", get(list_items).post(schedule_meal))
        .route("/plans/:id/items/:item_id", delete(delete_item))
}

fn week_start(now: OffsetDateTime) -> time::Date {
    let today = now.date();
    today - Duration::days(today.weekday().number_days_from_sunday() as i64)
}

#[instrument(skip(state))]
pub async fn create_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<(StatusCode, Json<MealPlan>), ApiError> {
    let start = week_start(OffsetDateTime::now_utc());
    let title = format!("Week of {}", short_date(start));

    let plan = MealPlan::create(&state.db, user_id, start, &title).await?;
    info!(plan_id = %plan.id, user_id = %user_id, "meal plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(skip(state))]
pub async fn list_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MealPlan>>, ApiError> {
    let plans = MealPlan::list_for_user(&state.db, user_id).await?;
    Ok(Json(plans))
}

#[instrument(skip(state))]
pub async fn current_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MealPlan>, ApiError> {
    let plan = MealPlan::current_for_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("No meal plan found"))?;
    Ok(Json(plan))
}

/// Builds a fresh plan for the week from the caller's dietary preferences.
/// The plan row and its generated items are a create-then-insert sequence;
/// if the item insert fails the orphaned plan is deleted before reporting.
#[instrument(skip(state))]
pub async fn generate_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<(StatusCode, Json<GeneratedPlanResponse>), ApiError> {
    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::validation("Profile required"))?;

    let candidates =
        Meal::candidates(&state.db, &profile.dietary_preferences, CANDIDATE_FETCH_LIMIT).await?;

    let start = week_start(OffsetDateTime::now_utc());
    let title = format!("Week of {}", short_date(start));
    let plan = MealPlan::create(&state.db, user_id, start, &title).await?;

    let drafts = planner::generate(&profile, &candidates, plan.id);
    if drafts.is_empty() {
        // Nothing qualified: an empty plan is a valid outcome, not an error.
        info!(plan_id = %plan.id, user_id = %user_id, "no meals matched preferences");
        return Ok((
            StatusCode::CREATED,
            Json(GeneratedPlanResponse {
                plan,
                items: vec![],
            }),
        ));
    }

    let items = match MealPlanItem::insert_batch(&state.db, &drafts).await {
        Ok(items) => items,
        Err(e) => {
            warn!(plan_id = %plan.id, error = %e, "plan item insert failed, rolling back plan");
            if let Err(del_err) = MealPlan::delete(&state.db, plan.id).await {
                error!(plan_id = %plan.id, error = %del_err, "compensating delete failed");
            }
            return Err(ApiError::Store(e));
        }
    };

    info!(plan_id = %plan.id, user_id = %user_id, items = items.len(), "meal plan generated");
    Ok((
        StatusCode::CREATED,
        Json(GeneratedPlanResponse { plan, items }),
    ))
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<PlanItemsResponse>, ApiError> {
    let plan = MealPlan::find_for_user(&state.db, user_id, plan_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal plan not found"))?;
    let items = MealPlanItem::list_with_meals(&state.db, plan.id).await?;
    Ok(Json(PlanItemsResponse { plan, items }))
}

#[instrument(skip(state, payload))]
pub async fn schedule_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(payload): Json<ScheduleMealRequest>,
) -> Result<(StatusCode, Json<MealPlanItem>), ApiError> {
    if !(0..=6).contains(&payload.day_of_week) {
        return Err(ApiError::validation("day_of_week must be between 0 and 6"));
    }
    if payload.servings < 1 {
        return Err(ApiError::validation("servings must be at least 1"));
    }

    let plan = MealPlan::find_for_user(&state.db, user_id, plan_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal plan not found"))?;

    let meal = Meal::find(&state.db, payload.meal_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal not found"))?;

    let item = MealPlanItem::insert(
        &state.db,
        plan.id,
        meal.id,
        payload.day_of_week,
        payload.meal_type.as_str(),
        payload.servings,
        payload.notes.as_deref(),
    )
    .await?;

    info!(plan_id = %plan.id, meal_id = %meal.id, day = payload.day_of_week, "meal scheduled");
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((plan_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let plan = MealPlan::find_for_user(&state.db, user_id, plan_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal plan not found"))?;

    if !MealPlanItem::delete_one(&state.db, plan.id, item_id).await? {
        return Err(ApiError::not_found("Plan item not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn week_start_is_most_recent_sunday() {
        // 2026-08-06 is a Thursday
        let start = week_start(datetime!(2026-08-06 12:00 UTC));
        assert_eq!(start, time::macros::date!(2026 - 08 - 02));
        assert_eq!(start.weekday(), time::Weekday::Sunday);
    }

    #[test]
    fn week_start_on_sunday_is_today() {
        let start = week_start(datetime!(2026-08-02 08:00 UTC));
        assert_eq!(start, time::macros::date!(2026 - 08 - 02));
    }
}
