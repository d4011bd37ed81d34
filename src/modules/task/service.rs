use std::{cmp::Ordering, sync::Arc};

use uuid::Uuid;

use crate::{
    api::error,
    modules::task::{
        model::{InsertTask, PatchTaskModel, TaskChanges, TaskModel},
        repository::TaskRepository,
        schema::TaskEntity,
    },
};

#[derive(Clone)]
pub struct TaskService<R>
where
    R: TaskRepository + Send + Sync,
{
    task_repo: Arc<R>,
}

impl<R> TaskService<R>
where
    R: TaskRepository + Send + Sync,
{
    pub fn with_dependencies(task_repo: Arc<R>) -> Self {
        TaskService { task_repo }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<TaskEntity>, error::SystemError> {
        let mut tasks = self.task_repo.find_all(&user_id).await?;
        tasks.sort_by(task_order);
        Ok(tasks)
    }

    pub async fn get(&self, user_id: Uuid, task_id: Uuid) -> Result<TaskEntity, error::SystemError> {
        self.task_repo
            .find_by_id(&task_id, &user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Task not found"))
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        model: TaskModel,
    ) -> Result<TaskEntity, error::SystemError> {
        let task = self.task_repo.create(&InsertTask::new(user_id, model)).await?;
        log::debug!("Task {} created for user {}", task.id, user_id);
        Ok(task)
    }

    pub async fn replace(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        model: TaskModel,
    ) -> Result<TaskEntity, error::SystemError> {
        self.apply(user_id, task_id, model.into()).await
    }

    pub async fn patch(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        model: PatchTaskModel,
    ) -> Result<TaskEntity, error::SystemError> {
        if model.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }
        self.apply(user_id, task_id, model.into()).await
    }

    pub async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<(), error::SystemError> {
        if !self.task_repo.delete(&task_id, &user_id).await? {
            return Err(error::SystemError::not_found("Task not found"));
        }
        Ok(())
    }

    async fn apply(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> Result<TaskEntity, error::SystemError> {
        self.task_repo
            .update(&task_id, &user_id, &changes)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Task not found"))
    }
}

/// Priority first, then earliest due date (undated last), then creation time.
pub fn task_order(a: &TaskEntity, b: &TaskEntity) -> Ordering {
    let due = match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    a.priority.cmp(&b.priority).then(due).then(a.created_at.cmp(&b.created_at))
}
