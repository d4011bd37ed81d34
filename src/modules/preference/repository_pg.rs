use uuid::Uuid;

use crate::{
    api::error,
    modules::preference::{repository::PreferenceRepository, schema::UserPreferenceEntity},
};

#[derive(Clone)]
pub struct PreferenceRepositoryPg {
    pool: sqlx::PgPool,
}

impl PreferenceRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PreferenceRepository for PreferenceRepositoryPg {
    async fn find_or_create(
        &self,
        user_id: &Uuid,
    ) -> Result<UserPreferenceEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        sqlx::query(
            r#"
            INSERT INTO user_preferences (id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        let preference = sqlx::query_as::<_, UserPreferenceEntity>(
            "SELECT * FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(preference)
    }

    async fn category_ids(&self, preference_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT category_id
            FROM user_preference_categories
            WHERE preference_id = $1
            ORDER BY category_id
            "#,
        )
        .bind(preference_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn set_categories(
        &self,
        preference_id: &Uuid,
        category_ids: &[Uuid],
    ) -> Result<UserPreferenceEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_preference_categories WHERE preference_id = $1")
            .bind(preference_id)
            .execute(&mut *tx)
            .await?;

        if !category_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO user_preference_categories (preference_id, category_id)
                SELECT $1, UNNEST($2::uuid[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(preference_id)
            .bind(category_ids)
            .execute(&mut *tx)
            .await?;
        }

        let preference = sqlx::query_as::<_, UserPreferenceEntity>(
            r#"
            UPDATE user_preferences
            SET updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(preference_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Preferences not found"))?;

        tx.commit().await?;

        Ok(preference)
    }
}
