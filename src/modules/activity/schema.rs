use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ActivityCategoryEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// An activity joined with the name of its category, if it still has one.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ActivityRow {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub name: String,
    pub description: String,
    pub is_outdoor: bool,
    pub min_duration_minutes: i32,
    pub max_duration_minutes: i32,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
