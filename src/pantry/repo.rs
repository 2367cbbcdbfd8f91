use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// A pantry entry joined with its ingredient record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PantryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub expiry_date: Option<Date>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

const ITEM_SELECT: &str = "pi.id, pi.user_id, pi.ingredient_id, i.name AS ingredient_name, \
                           pi.amount, pi.unit, pi.expiry_date, pi.notes, pi.created_at";

impl PantryItem {
    pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<PantryItem>> {
        let rows = sqlx::query_as::<_, PantryItem>(&format!(
            "SELECT {ITEM_SELECT}
             FROM pantry_items pi
             JOIN ingredients i ON i.id = pi.ingredient_id
             WHERE pi.user_id = $1
             ORDER BY pi.expiry_date ASC NULLS LAST, pi.created_at"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        ingredient_id: Uuid,
        amount: Option<f64>,
        unit: Option<&str>,
        expiry_date: Option<Date>,
        notes: Option<&str>,
    ) -> anyhow::Result<PantryItem> {
        let item = sqlx::query_as::<_, PantryItem>(&format!(
            "WITH ins AS (
                 INSERT INTO pantry_items (user_id, ingredient_id, amount, unit, expiry_date, notes)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING *
             )
             SELECT {}
             FROM ins pi
             JOIN ingredients i ON i.id = pi.ingredient_id",
            ITEM_SELECT
        ))
        .bind(user_id)
        .bind(ingredient_id)
        .bind(amount)
        .bind(unit)
        .bind(expiry_date)
        .bind(notes)
        .fetch_one(db)
        .await?;
        Ok(item)
    }

    pub async fn delete_one(db: &PgPool, user_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM pantry_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
