use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::planner::PlanItemDraft;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub week_start_date: Date,
    pub title: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const PLAN_COLUMNS: &str = "id, user_id, week_start_date, title, created_at, updated_at";

impl MealPlan {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        week_start_date: Date,
        title: &str,
    ) -> anyhow::Result<MealPlan> {
        let plan = sqlx::query_as::<_, MealPlan>(&format!(
            "INSERT INTO meal_plans (user_id, week_start_date, title)
             VALUES ($1, $2, $3)
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(user_id)
        .bind(week_start_date)
        .bind(title)
        .fetch_one(db)
        .await?;
        Ok(plan)
    }

    pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<MealPlan>> {
        let rows = sqlx::query_as::<_, MealPlan>(&format!(
            "SELECT {PLAN_COLUMNS}
             FROM meal_plans
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// The "current" plan is the most recently created one, resolved here
    /// rather than by the order of some earlier fetch.
    pub async fn current_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<MealPlan>> {
        let plan = sqlx::query_as::<_, MealPlan>(&format!(
            "SELECT {PLAN_COLUMNS}
             FROM meal_plans
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }

    pub async fn find_for_user(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<Option<MealPlan>> {
        let plan = sqlx::query_as::<_, MealPlan>(&format!(
            "SELECT {PLAN_COLUMNS}
             FROM meal_plans
             WHERE id = $1 AND user_id = $2"
        ))
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }

    /// Compensating delete for a plan whose item insert failed; items cascade.
    pub async fn delete(db: &PgPool, plan_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM meal_plans WHERE id = $1")
            .bind(plan_id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlanItem {
    pub id: Uuid,
    pub meal_plan_id: Uuid,
    pub meal_id: Uuid,
    pub day_of_week: i16,
    pub meal_type: String,
    pub servings: i32,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

const ITEM_COLUMNS: &str =
    "id, meal_plan_id, meal_id, day_of_week, meal_type, servings, notes, created_at";

/// A plan item joined with the meal it schedules.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanItemWithMeal {
    pub id: Uuid,
    pub meal_plan_id: Uuid,
    pub meal_id: Uuid,
    pub day_of_week: i16,
    pub meal_type: String,
    pub servings: i32,
    pub notes: Option<String>,
    pub meal_name: String,
    pub meal_description: Option<String>,
    pub prep_time: i32,
    pub cook_time: i32,
}

impl MealPlanItem {
    pub async fn insert(
        db: &PgPool,
        plan_id: Uuid,
        meal_id: Uuid,
        day_of_week: i16,
        meal_type: &str,
        servings: i32,
        notes: Option<&str>,
    ) -> anyhow::Result<MealPlanItem> {
        let item = sqlx::query_as::<_, MealPlanItem>(&format!(
            "INSERT INTO meal_plan_items (meal_plan_id, meal_id, day_of_week, meal_type, servings, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(plan_id)
        .bind(meal_id)
        .bind(day_of_week)
        .bind(meal_type)
        .bind(servings)
        .bind(notes)
        .fetch_one(db)
        .await?;
        Ok(item)
    }

    /// Single-statement bulk insert: the generated week lands atomically.
    pub async fn insert_batch(
        db: &PgPool,
        drafts: &[PlanItemDraft],
    ) -> anyhow::Result<Vec<MealPlanItem>> {
        let plan_ids: Vec<Uuid> = drafts.iter().map(|d| d.meal_plan_id).collect();
        let meal_ids: Vec<Uuid> = drafts.iter().map(|d| d.meal_id).collect();
        let days: Vec<i16> = drafts.iter().map(|d| d.day_of_week).collect();
        let meal_types: Vec<String> = drafts.iter().map(|d| d.meal_type.clone()).collect();
        let servings: Vec<i32> = drafts.iter().map(|d| d.servings).collect();

        let items = sqlx::query_as::<_, MealPlanItem>(&format!(
            "INSERT INTO meal_plan_items (meal_plan_id, meal_id, day_of_week, meal_type, servings)
             SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::smallint[], $4::text[], $5::integer[])
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(plan_ids)
        .bind(meal_ids)
        .bind(days)
        .bind(meal_types)
        .bind(servings)
        .fetch_all(db)
        .await?;
        Ok(items)
    }

    pub async fn list_for_plan(db: &PgPool, plan_id: Uuid) -> anyhow::Result<Vec<MealPlanItem>> {
        let rows = sqlx::query_as::<_, MealPlanItem>(&format!(
            "SELECT {ITEM_COLUMNS}
             FROM meal_plan_items
             WHERE meal_plan_id = $1
             ORDER BY day_of_week, created_at"
        ))
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_with_meals(
        db: &PgPool,
        plan_id: Uuid,
    ) -> anyhow::Result<Vec<PlanItemWithMeal>> {
        let rows = sqlx::query_as::<_, PlanItemWithMeal>(
            r#"
            SELECT pi.id, pi.meal_plan_id, pi.meal_id, pi.day_of_week, pi.meal_type,
                   pi.servings, pi.notes,
                   m.name AS meal_name, m.description AS meal_description,
                   m.prep_time, m.cook_time
            FROM meal_plan_items pi
            JOIN meals m ON m.id = pi.meal_id
            WHERE pi.meal_plan_id = $1
            ORDER BY pi.day_of_week, pi.created_at
            "#,
        )
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn delete_one(db: &PgPool, plan_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "DELETE FROM meal_plan_items WHERE id = $1 AND meal_plan_id = $2",
        )
        .bind(item_id)
        .bind(plan_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
