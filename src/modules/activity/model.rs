use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    constants::{DEFAULT_MAX_DURATION_MINUTES, DEFAULT_MIN_DURATION_MINUTES},
    modules::activity::schema::ActivityRow,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryModel {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1 to 100 characters long"),
        custom(function = "not_blank")
    )]
    pub name: String,
    pub description: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Name cannot be blank".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_durations"))]
pub struct CreateActivityModel {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters long"))]
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub is_outdoor: bool,
    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    pub min_duration_minutes: Option<i32>,
    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    pub max_duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

impl CreateActivityModel {
    pub fn durations(&self) -> (i32, i32) {
        (
            self.min_duration_minutes.unwrap_or(DEFAULT_MIN_DURATION_MINUTES),
            self.max_duration_minutes.unwrap_or(DEFAULT_MAX_DURATION_MINUTES),
        )
    }
}

fn validate_durations(model: &CreateActivityModel) -> Result<(), ValidationError> {
    let (min, max) = model.durations();
    if min > max {
        let mut err = ValidationError::new("duration_range");
        err.message = Some("Minimum duration cannot exceed maximum duration".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivityQuery {
    pub category_id: Option<Uuid>,
}

pub struct InsertActivity {
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub is_outdoor: bool,
    pub min_duration_minutes: i32,
    pub max_duration_minutes: i32,
    pub notes: Option<String>,
}

impl From<CreateActivityModel> for InsertActivity {
    fn from(model: CreateActivityModel) -> Self {
        let (min_duration_minutes, max_duration_minutes) = model.durations();
        InsertActivity {
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            is_outdoor: model.is_outdoor,
            min_duration_minutes,
            max_duration_minutes,
            notes: model.notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityResponse {
    pub id: Uuid,
    /// Category name rather than id.
    pub category: Option<String>,
    pub name: String,
    pub description: String,
    pub is_outdoor: bool,
    pub min_duration_minutes: i32,
    pub max_duration_minutes: i32,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ActivityRow> for ActivityResponse {
    fn from(row: ActivityRow) -> Self {
        ActivityResponse {
            id: row.id,
            category: row.category_name,
            name: row.name,
            description: row.description,
            is_outdoor: row.is_outdoor,
            min_duration_minutes: row.min_duration_minutes,
            max_duration_minutes: row.max_duration_minutes,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
