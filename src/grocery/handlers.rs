use std::collections::HashMap;

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, patch, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::aggregator;
use super::dto::{AddItemRequest, GenerateListRequest, GroceryListDetails, ToggleItemRequest};
use super::repo::{GroceryList, GroceryListItem};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::meals::repo::{Ingredient, MealIngredientRow};
use crate::plans::repo::{MealPlan, MealPlanItem};
use crate::state::AppState;
use crate::util::short_date;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/grocery-lists", get(list_lists).post(generate_list))
        .route("/grocery-lists/:id", get(get_list).delete(delete_list))
        .route("/grocery-lists/:id/export", get(export_list))
        .route("/grocery-lists/:id/items", post(add_item))
        .route(
            "/grocery-lists/:id/items/:item_id",
            patch(toggle_item).delete(delete_item),
        )
}

/// Derives a grocery list from the named meal plan. List creation and item
/// insertion are a create-then-insert sequence; if the item insert fails the
/// orphaned list is deleted before reporting.
#[instrument(skip(state, payload))]
pub async fn generate_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<GenerateListRequest>,
) -> Result<(StatusCode, Json<GroceryList>), ApiError> {
    let plan = MealPlan::find_for_user(&state.db, user_id, payload.meal_plan_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal plan not found"))?;

    let plan_items = MealPlanItem::list_for_plan(&state.db, plan.id).await?;
    if plan_items.is_empty() {
        return Err(ApiError::validation("No meal plan items"));
    }

    let meal_ids: Vec<Uuid> = plan_items.iter().map(|item| item.meal_id).collect();
    let recipe_lines = MealIngredientRow::for_meals(&state.db, &meal_ids).await?;
    let mut by_meal: HashMap<Uuid, Vec<MealIngredientRow>> = HashMap::new();
    for line in recipe_lines {
        by_meal.entry(line.meal_id).or_default().push(line);
    }

    let title = format!(
        "Grocery List - {}",
        plan.title.as_deref().unwrap_or("Meal Plan")
    );
    let list = GroceryList::create(&state.db, user_id, plan.id, &title).await?;

    let drafts = aggregator::build(&plan_items, &by_meal, list.id);
    if !drafts.is_empty() {
        if let Err(e) = GroceryListItem::insert_batch(&state.db, &drafts).await {
            warn!(list_id = %list.id, error = %e, "item insert failed, rolling back list");
            if let Err(del_err) = GroceryList::delete(&state.db, user_id, list.id).await {
                error!(list_id = %list.id, error = %del_err, "compensating delete failed");
            }
            return Err(ApiError::Store(e));
        }
    }

    info!(list_id = %list.id, plan_id = %plan.id, items = drafts.len(), "grocery list generated");
    Ok((StatusCode::CREATED, Json(list)))
}

#[instrument(skip(state))]
pub async fn list_lists(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<GroceryList>>, ApiError> {
    let lists = GroceryList::list_for_user(&state.db, user_id).await?;
    Ok(Json(lists))
}

#[instrument(skip(state))]
pub async fn get_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<Uuid>,
) -> Result<Json<GroceryListDetails>, ApiError> {
    let list = GroceryList::find_for_user(&state.db, user_id, list_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Grocery list not found"))?;

    let items = GroceryListItem::list_for_list(&state.db, list.id).await?;
    let remaining = items.iter().filter(|i| !i.is_checked).count();
    let completed = items.len() - remaining;
    let groups = aggregator::group_by_category(items);

    Ok(Json(GroceryListDetails {
        list,
        remaining,
        completed,
        groups,
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<Uuid>,
    Json(payload): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<GroceryListItem>), ApiError> {
    let list = GroceryList::find_for_user(&state.db, user_id, list_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Grocery list not found"))?;

    if Ingredient::find(&state.db, payload.ingredient_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("Ingredient not found"));
    }

    let item = GroceryListItem::insert_one(
        &state.db,
        list.id,
        payload.ingredient_id,
        payload.amount,
        payload.unit.as_deref(),
        payload.notes.as_deref(),
    )
    .await?;

    info!(list_id = %list.id, item_id = %item.id, "grocery item added");
    Ok((StatusCode::CREATED, Json(item)))
}

/// Flips the checked flag. The store is updated first; the returned copy is
/// only adjusted once that write has been acknowledged.
#[instrument(skip(state, payload))]
pub async fn toggle_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((list_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ToggleItemRequest>,
) -> Result<Json<GroceryListItem>, ApiError> {
    let item = GroceryListItem::find_in_list(&state.db, user_id, list_id, item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Grocery item not found"))?;

    if item.is_checked == payload.is_checked {
        return Ok(Json(item));
    }

    if !GroceryListItem::set_checked(&state.db, item.id, payload.is_checked).await? {
        return Err(ApiError::not_found("Grocery item not found"));
    }

    Ok(Json(aggregator::toggle(item, payload.is_checked)))
}

#[instrument(skip(state))]
pub async fn delete_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !GroceryList::delete(&state.db, user_id, list_id).await? {
        return Err(ApiError::not_found("Grocery list not found"));
    }
    info!(list_id = %list_id, "grocery list deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((list_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let list = GroceryList::find_for_user(&state.db, user_id, list_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Grocery list not found"))?;

    if !GroceryListItem::delete_one(&state.db, list.id, item_id).await? {
        return Err(ApiError::not_found("Grocery item not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Plain-text export of the unchecked items, served as a download.
#[instrument(skip(state))]
pub async fn export_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<Uuid>,
) -> Result<(HeaderMap, String), ApiError> {
    let list = GroceryList::find_for_user(&state.db, user_id, list_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Grocery list not found"))?;

    let items = GroceryListItem::list_for_list(&state.db, list.id).await?;
    let generated_on = short_date(OffsetDateTime::now_utc().date());
    let body = aggregator::export_text(&items, &list.title, &generated_on);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    let disposition = format!(
        "attachment; filename=\"{}\"",
        aggregator::export_filename(&list.title)
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        disposition.parse().context("content disposition header")?,
    );

    Ok((headers, body))
}
