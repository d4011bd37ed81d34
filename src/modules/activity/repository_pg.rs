use uuid::Uuid;

use crate::{
    api::error,
    modules::activity::{
        model::InsertActivity,
        repository::ActivityRepository,
        schema::{ActivityCategoryEntity, ActivityRow},
    },
};

const ACTIVITY_SELECT: &str = r#"
    SELECT
        a.id,
        a.category_id,
        c.name AS category_name,
        a.name,
        a.description,
        a.is_outdoor,
        a.min_duration_minutes,
        a.max_duration_minutes,
        a.notes,
        a.created_at,
        a.updated_at
    FROM activities a
    LEFT JOIN activity_categories c
        ON c.id = a.category_id
"#;

#[derive(Clone)]
pub struct ActivityRepositoryPg {
    pool: sqlx::PgPool,
}

impl ActivityRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ActivityRepository for ActivityRepositoryPg {
    async fn list_categories(&self) -> Result<Vec<ActivityCategoryEntity>, error::SystemError> {
        let categories = sqlx::query_as::<_, ActivityCategoryEntity>(
            "SELECT * FROM activity_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn find_category(
        &self,
        id: &Uuid,
    ) -> Result<Option<ActivityCategoryEntity>, error::SystemError> {
        let category = sqlx::query_as::<_, ActivityCategoryEntity>(
            "SELECT * FROM activity_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn find_categories_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<ActivityCategoryEntity>, error::SystemError> {
        let categories = sqlx::query_as::<_, ActivityCategoryEntity>(
            "SELECT * FROM activity_categories WHERE id = ANY($1) ORDER BY name",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn create_category(
        &self,
        name: &str,
        description: &Option<String>,
    ) -> Result<ActivityCategoryEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let category = sqlx::query_as::<_, ActivityCategoryEntity>(
            r#"
            INSERT INTO activity_categories (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    async fn list_activities(
        &self,
        category_id: Option<&Uuid>,
    ) -> Result<Vec<ActivityRow>, error::SystemError> {
        let sql = format!(
            "{ACTIVITY_SELECT} WHERE ($1::uuid IS NULL OR a.category_id = $1) ORDER BY a.name"
        );
        let activities = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(activities)
    }

    async fn find_activity(&self, id: &Uuid) -> Result<Option<ActivityRow>, error::SystemError> {
        let sql = format!("{ACTIVITY_SELECT} WHERE a.id = $1");
        let activity = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(activity)
    }

    async fn create_activity(
        &self,
        activity: &InsertActivity,
    ) -> Result<ActivityRow, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        sqlx::query(
            r#"
            INSERT INTO activities
                (id, category_id, name, description, is_outdoor,
                 min_duration_minutes, max_duration_minutes, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(activity.category_id)
        .bind(&activity.name)
        .bind(&activity.description)
        .bind(activity.is_outdoor)
        .bind(activity.min_duration_minutes)
        .bind(activity.max_duration_minutes)
        .bind(&activity.notes)
        .execute(&self.pool)
        .await?;

        self.find_activity(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Activity not found"))
    }
}
