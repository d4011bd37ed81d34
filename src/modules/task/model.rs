use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{constants::DEFAULT_TASK_PRIORITY, modules::task::schema::TaskStatus, utils::double_option};

/// Body for creating a task and for replacing one wholesale.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskModel {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters long"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: Option<i16>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchTaskModel {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters long"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: Option<i16>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub status: Option<TaskStatus>,
}

impl PatchTaskModel {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }
}

pub struct InsertTask {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: i16,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
}

impl InsertTask {
    pub fn new(user_id: Uuid, model: TaskModel) -> Self {
        InsertTask {
            user_id,
            title: model.title,
            description: model.description,
            priority: model.priority.unwrap_or(DEFAULT_TASK_PRIORITY),
            due_date: model.due_date,
            status: model.status.unwrap_or_default(),
        }
    }
}

/// Column changes; `None` leaves a column untouched, `Some(None)` clears a nullable one.
#[derive(Debug, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<i16>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub status: Option<TaskStatus>,
}

impl From<TaskModel> for TaskChanges {
    fn from(model: TaskModel) -> Self {
        TaskChanges {
            title: Some(model.title),
            description: Some(model.description),
            priority: Some(model.priority.unwrap_or(DEFAULT_TASK_PRIORITY)),
            due_date: Some(model.due_date),
            status: Some(model.status.unwrap_or_default()),
        }
    }
}

impl From<PatchTaskModel> for TaskChanges {
    fn from(model: PatchTaskModel) -> Self {
        TaskChanges {
            title: model.title,
            description: model.description,
            priority: model.priority,
            due_date: model.due_date,
            status: model.status,
        }
    }
}
