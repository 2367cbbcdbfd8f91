use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub dietary_preferences: Vec<String>,
    pub allergies: Vec<String>,
    pub cooking_skill_level: String,
    pub household_size: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const PROFILE_COLUMNS: &str = "id, user_id, full_name, email, dietary_preferences, allergies, \
                               cooking_skill_level, household_size, created_at, updated_at";

impl Profile {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Inserts the empty profile that registration creates alongside the user.
    pub async fn create<'e>(
        db: impl sqlx::PgExecutor<'e>,
        user_id: Uuid,
        email: &str,
        full_name: Option<&str>,
    ) -> anyhow::Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (user_id, email, full_name)
             VALUES ($1, $2, $3)
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(email)
        .bind(full_name)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        full_name: Option<&str>,
        dietary_preferences: &[String],
        allergies: &[String],
        cooking_skill_level: &str,
        household_size: i32,
    ) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles
             SET full_name = $2,
                 dietary_preferences = $3,
                 allergies = $4,
                 cooking_skill_level = $5,
                 household_size = $6,
                 updated_at = now()
             WHERE user_id = $1
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(full_name)
        .bind(dietary_preferences)
        .bind(allergies)
        .bind(cooking_skill_level)
        .bind(household_size)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }
}
