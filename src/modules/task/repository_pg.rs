use uuid::Uuid;

use crate::{
    api::error,
    modules::task::{
        model::{InsertTask, TaskChanges},
        repository::TaskRepository,
        schema::TaskEntity,
    },
};

#[derive(Clone)]
pub struct TaskRepositoryPg {
    pool: sqlx::PgPool,
}

impl TaskRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TaskRepository for TaskRepositoryPg {
    async fn find_all(&self, user_id: &Uuid) -> Result<Vec<TaskEntity>, error::SystemError> {
        let tasks = sqlx::query_as::<_, TaskEntity>(
            r#"
            SELECT * FROM tasks
            WHERE user_id = $1
            ORDER BY priority, due_date NULLS LAST, created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<TaskEntity>, error::SystemError> {
        let task =
            sqlx::query_as::<_, TaskEntity>("SELECT * FROM tasks WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(task)
    }

    async fn create(&self, task: &InsertTask) -> Result<TaskEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let task = sqlx::query_as::<_, TaskEntity>(
            r#"
            INSERT INTO tasks (id, user_id, title, description, priority, due_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority)
        .bind(task.due_date)
        .bind(task.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        changes: &TaskChanges,
    ) -> Result<Option<TaskEntity>, error::SystemError> {
        let task = sqlx::query_as::<_, TaskEntity>(
            r#"
        UPDATE tasks
        SET
            title       = COALESCE($3, title),
            description = CASE WHEN $4::boolean THEN $5 ELSE description END,
            priority    = COALESCE($6, priority),
            due_date    = CASE WHEN $7::boolean THEN $8 ELSE due_date END,
            status      = COALESCE($9, status),
            updated_at  = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&changes.title) // $3: Option<String>
        .bind(changes.description.is_some()) // $4: was description provided?
        .bind(changes.description.as_ref().and_then(|v| v.as_ref())) // $5
        .bind(changes.priority) // $6: Option<i16>
        .bind(changes.due_date.is_some()) // $7: was due_date provided?
        .bind(changes.due_date.flatten()) // $8
        .bind(changes.status) // $9: Option<TaskStatus>
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete(&self, id: &Uuid, user_id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}
