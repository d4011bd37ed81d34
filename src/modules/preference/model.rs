use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::preference::schema::UserPreferenceEntity;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePreferenceModel {
    pub preferred_categories: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub preferred_categories: Vec<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl PreferenceResponse {
    pub fn new(preference: UserPreferenceEntity, preferred_categories: Vec<Uuid>) -> Self {
        PreferenceResponse {
            id: preference.id,
            user_id: preference.user_id,
            preferred_categories,
            created_at: preference.created_at,
            updated_at: preference.updated_at,
        }
    }
}
