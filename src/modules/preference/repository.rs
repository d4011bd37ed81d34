use uuid::Uuid;

use crate::{api::error, modules::preference::schema::UserPreferenceEntity};

#[async_trait::async_trait]
pub trait PreferenceRepository {
    /// Returns the user's preference record, inserting an empty one on first use.
    async fn find_or_create(
        &self,
        user_id: &Uuid,
    ) -> Result<UserPreferenceEntity, error::SystemError>;

    /// Category ids of a preference, ascending.
    async fn category_ids(&self, preference_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError>;

    /// Replaces the whole category set and touches `updated_at`.
    async fn set_categories(
        &self,
        preference_id: &Uuid,
        category_ids: &[Uuid],
    ) -> Result<UserPreferenceEntity, error::SystemError>;
}
