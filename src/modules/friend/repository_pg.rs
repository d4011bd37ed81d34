use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        repository::FriendshipRepository,
        schema::{FriendshipEntity, FriendshipStatus},
    },
};

#[derive(Clone)]
pub struct FriendshipRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendshipRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for FriendshipRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship =
            sqlx::query_as::<_, FriendshipEntity>("SELECT * FROM friendships WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(friendship)
    }

    async fn find_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE
                (from_user_id = $1 AND to_user_id = $2)
            OR (from_user_id = $2 AND to_user_id = $1)
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn find_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let friendships = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE from_user_id = $1
               OR to_user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friendships)
    }

    async fn create_pending(
        &self,
        from_user_id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            INSERT INTO friendships (id, from_user_id, to_user_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from_user_id)
        .bind(to_user_id)
        .bind(FriendshipStatus::Pending)
        .fetch_one(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn accept_pending(
        &self,
        id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            UPDATE friendships
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND to_user_id = $2 AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(to_user_id)
        .bind(FriendshipStatus::Accepted)
        .bind(FriendshipStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn delete_pending(
        &self,
        id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            DELETE FROM friendships
            WHERE id = $1 AND to_user_id = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(to_user_id)
        .bind(FriendshipStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn delete_for_participant(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        expected: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            DELETE FROM friendships
            WHERE id = $1
              AND (from_user_id = $2 OR to_user_id = $2)
              AND status = $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }
}
