use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::aggregator::GroceryItemDraft;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroceryList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_plan_id: Option<Uuid>,
    pub title: String,
    pub is_completed: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const LIST_COLUMNS: &str =
    "id, user_id, meal_plan_id, title, is_completed, created_at, updated_at";

impl GroceryList {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        meal_plan_id: Uuid,
        title: &str,
    ) -> anyhow::Result<GroceryList> {
        let list = sqlx::query_as::<_, GroceryList>(&format!(
            "INSERT INTO grocery_lists (user_id, meal_plan_id, title)
             VALUES ($1, $2, $3)
             RETURNING {LIST_COLUMNS}"
        ))
        .bind(user_id)
        .bind(meal_plan_id)
        .bind(title)
        .fetch_one(db)
        .await?;
        Ok(list)
    }

    pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<GroceryList>> {
        let rows = sqlx::query_as::<_, GroceryList>(&format!(
            "SELECT {LIST_COLUMNS}
             FROM grocery_lists
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_for_user(
        db: &PgPool,
        user_id: Uuid,
        list_id: Uuid,
    ) -> anyhow::Result<Option<GroceryList>> {
        let list = sqlx::query_as::<_, GroceryList>(&format!(
            "SELECT {LIST_COLUMNS}
             FROM grocery_lists
             WHERE id = $1 AND user_id = $2"
        ))
        .bind(list_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(list)
    }

    /// Terminal delete; items cascade. Also the compensating delete for a
    /// list whose item insert failed.
    pub async fn delete(db: &PgPool, user_id: Uuid, list_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM grocery_lists WHERE id = $1 AND user_id = $2")
            .bind(list_id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// A grocery line joined with its ingredient record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroceryListItem {
    pub id: Uuid,
    pub grocery_list_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub is_checked: bool,
    pub notes: Option<String>,
}

const ITEM_SELECT: &str = "gi.id, gi.grocery_list_id, gi.ingredient_id, \
                           i.name AS ingredient_name, i.category, \
                           gi.amount, gi.unit, gi.is_checked, gi.notes";

impl GroceryListItem {
    /// Single-statement bulk insert of the aggregated drafts.
    pub async fn insert_batch(db: &PgPool, drafts: &[GroceryItemDraft]) -> anyhow::Result<u64> {
        let list_ids: Vec<Uuid> = drafts.iter().map(|d| d.grocery_list_id).collect();
        let ingredient_ids: Vec<Uuid> = drafts.iter().map(|d| d.ingredient_id).collect();
        let amounts: Vec<Option<f64>> = drafts.iter().map(|d| d.amount).collect();
        let units: Vec<Option<String>> = drafts.iter().map(|d| d.unit.clone()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO grocery_list_items (grocery_list_id, ingredient_id, amount, unit)
            SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::double precision[], $4::text[])
            "#,
        )
        .bind(list_ids)
        .bind(ingredient_ids)
        .bind(amounts)
        .bind(units)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_one(
        db: &PgPool,
        list_id: Uuid,
        ingredient_id: Uuid,
        amount: Option<f64>,
        unit: Option<&str>,
        notes: Option<&str>,
    ) -> anyhow::Result<GroceryListItem> {
        let item = sqlx::query_as::<_, GroceryListItem>(&format!(
            "WITH ins AS (
                 INSERT INTO grocery_list_items (grocery_list_id, ingredient_id, amount, unit, notes)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING *
             )
             SELECT {}
             FROM ins gi
             JOIN ingredients i ON i.id = gi.ingredient_id",
            ITEM_SELECT
        ))
        .bind(list_id)
        .bind(ingredient_id)
        .bind(amount)
        .bind(unit)
        .bind(notes)
        .fetch_one(db)
        .await?;
        Ok(item)
    }

    pub async fn list_for_list(db: &PgPool, list_id: Uuid) -> anyhow::Result<Vec<GroceryListItem>> {
        let rows = sqlx::query_as::<_, GroceryListItem>(&format!(
            "SELECT {ITEM_SELECT}
             FROM grocery_list_items gi
             JOIN ingredients i ON i.id = gi.ingredient_id
             WHERE gi.grocery_list_id = $1
             ORDER BY gi.created_at, gi.id"
        ))
        .bind(list_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Fetches one item, checking it belongs to a list the user owns.
    pub async fn find_in_list(
        db: &PgPool,
        user_id: Uuid,
        list_id: Uuid,
        item_id: Uuid,
    ) -> anyhow::Result<Option<GroceryListItem>> {
        let item = sqlx::query_as::<_, GroceryListItem>(&format!(
            "SELECT {ITEM_SELECT}
             FROM grocery_list_items gi
             JOIN ingredients i ON i.id = gi.ingredient_id
             JOIN grocery_lists gl ON gl.id = gi.grocery_list_id
             WHERE gi.id = $1 AND gi.grocery_list_id = $2 AND gl.user_id = $3"
        ))
        .bind(item_id)
        .bind(list_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(item)
    }

    pub async fn set_checked(db: &PgPool, item_id: Uuid, checked: bool) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE grocery_list_items SET is_checked = $2 WHERE id = $1")
            .bind(item_id)
            .bind(checked)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_one(db: &PgPool, list_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
        let result =
            sqlx::query("DELETE FROM grocery_list_items WHERE id = $1 AND grocery_list_id = $2")
                .bind(item_id)
                .bind(list_id)
                .execute(db)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
