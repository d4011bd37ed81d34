use uuid::Uuid;

use crate::{
    api::error,
    modules::activity::{
        model::InsertActivity,
        schema::{ActivityCategoryEntity, ActivityRow},
    },
};

#[async_trait::async_trait]
pub trait ActivityRepository {
    async fn list_categories(&self) -> Result<Vec<ActivityCategoryEntity>, error::SystemError>;

    async fn find_category(
        &self,
        id: &Uuid,
    ) -> Result<Option<ActivityCategoryEntity>, error::SystemError>;

    async fn find_categories_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<ActivityCategoryEntity>, error::SystemError>;

    async fn create_category(
        &self,
        name: &str,
        description: &Option<String>,
    ) -> Result<ActivityCategoryEntity, error::SystemError>;

    /// Activities ordered by name, optionally limited to one category.
    async fn list_activities(
        &self,
        category_id: Option<&Uuid>,
    ) -> Result<Vec<ActivityRow>, error::SystemError>;

    async fn find_activity(&self, id: &Uuid) -> Result<Option<ActivityRow>, error::SystemError>;

    async fn create_activity(
        &self,
        activity: &InsertActivity,
    ) -> Result<ActivityRow, error::SystemError>;
}
