use uuid::Uuid;

use crate::{
    api::error,
    modules::task::{
        model::{InsertTask, TaskChanges},
        schema::TaskEntity,
    },
};

/// Every lookup is scoped to the owning user.
#[async_trait::async_trait]
pub trait TaskRepository {
    async fn find_all(&self, user_id: &Uuid) -> Result<Vec<TaskEntity>, error::SystemError>;

    async fn find_by_id(
        &self,
        id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<TaskEntity>, error::SystemError>;

    async fn create(&self, task: &InsertTask) -> Result<TaskEntity, error::SystemError>;

    async fn update(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        changes: &TaskChanges,
    ) -> Result<Option<TaskEntity>, error::SystemError>;

    async fn delete(&self, id: &Uuid, user_id: &Uuid) -> Result<bool, error::SystemError>;
}
