use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub dietary_tags: Vec<String>,
    pub cuisine_type: Option<String>,
    pub difficulty_level: Option<String>,
    pub created_at: OffsetDateTime,
}

const MEAL_COLUMNS: &str = "id, user_id, name, description, image_url, prep_time, cook_time, \
                            servings, dietary_tags, cuisine_type, difficulty_level, created_at";

impl Meal {
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(&format!(
            "SELECT {MEAL_COLUMNS}
             FROM meals
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(meal)
    }

    /// Catalog slice the plan generator draws from. When `dietary_tags` is
    /// non-empty the array-overlap predicate is pushed down to the store, in
    /// stable catalog order either way.
    pub async fn candidates(
        db: &PgPool,
        dietary_tags: &[String],
        limit: i64,
    ) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(&format!(
            "SELECT {MEAL_COLUMNS}
             FROM meals
             WHERE cardinality($1::text[]) = 0 OR dietary_tags && $1
             ORDER BY created_at ASC
             LIMIT $2"
        ))
        .bind(dietary_tags)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
        image_url: &str,
        prep_time: i32,
        cook_time: i32,
        servings: i32,
        dietary_tags: &[String],
        cuisine_type: Option<&str>,
        difficulty_level: &str,
    ) -> anyhow::Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(&format!(
            "INSERT INTO meals (user_id, name, description, image_url, prep_time, cook_time,
                                servings, dietary_tags, cuisine_type, difficulty_level)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {MEAL_COLUMNS}"
        ))
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(image_url)
        .bind(prep_time)
        .bind(cook_time)
        .bind(servings)
        .bind(dietary_tags)
        .bind(cuisine_type)
        .bind(difficulty_level)
        .fetch_one(db)
        .await?;
        Ok(meal)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Ingredient {
    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Ingredient>> {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, category, unit, created_at
            FROM ingredients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}

/// One recipe line: a meal's ingredient joined with the ingredient record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealIngredientRow {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

impl MealIngredientRow {
    pub async fn for_meals(
        db: &PgPool,
        meal_ids: &[Uuid],
    ) -> anyhow::Result<Vec<MealIngredientRow>> {
        let rows = sqlx::query_as::<_, MealIngredientRow>(
            r#"
            SELECT mi.id, mi.meal_id, mi.ingredient_id,
                   i.name AS ingredient_name, i.category,
                   mi.amount, mi.unit, mi.notes
            FROM meal_ingredients mi
            JOIN ingredients i ON i.id = mi.ingredient_id
            WHERE mi.meal_id = ANY($1)
            ORDER BY mi.meal_id, mi.id
            "#,
        )
        .bind(meal_ids)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn for_meal(db: &PgPool, meal_id: Uuid) -> anyhow::Result<Vec<MealIngredientRow>> {
        let rows = sqlx::query_as::<_, MealIngredientRow>(
            r#"
            SELECT mi.id, mi.meal_id, mi.ingredient_id,
                   i.name AS ingredient_name, i.category,
                   mi.amount, mi.unit, mi.notes
            FROM meal_ingredients mi
            JOIN ingredients i ON i.id = mi.ingredient_id
            WHERE mi.meal_id = $1
            ORDER BY mi.id
            "#,
        )
        .bind(meal_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
