use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::activity::{
        model::{ActivityResponse, CreateActivityModel, CreateCategoryModel},
        repository::ActivityRepository,
        schema::ActivityCategoryEntity,
    },
};

#[derive(Clone)]
pub struct ActivityService<R>
where
    R: ActivityRepository + Send + Sync,
{
    activity_repo: Arc<R>,
}

impl<R> ActivityService<R>
where
    R: ActivityRepository + Send + Sync,
{
    pub fn with_dependencies(activity_repo: Arc<R>) -> Self {
        ActivityService { activity_repo }
    }

    pub async fn list_categories(&self) -> Result<Vec<ActivityCategoryEntity>, error::SystemError> {
        self.activity_repo.list_categories().await
    }

    pub async fn get_category(&self, id: Uuid) -> Result<ActivityCategoryEntity, error::SystemError> {
        self.activity_repo
            .find_category(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Activity category not found"))
    }

    pub async fn create_category(
        &self,
        model: CreateCategoryModel,
    ) -> Result<ActivityCategoryEntity, error::SystemError> {
        let name = model.name.trim();
        if name.is_empty() {
            return Err(error::SystemError::bad_request("Name cannot be blank"));
        }
        let category = self.activity_repo.create_category(name, &model.description).await?;
        log::info!("Activity category {} created", category.name);
        Ok(category)
    }

    pub async fn list_activities(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<ActivityResponse>, error::SystemError> {
        let rows = self.activity_repo.list_activities(category_id.as_ref()).await?;
        Ok(rows.into_iter().map(ActivityResponse::from).collect())
    }

    pub async fn get_activity(&self, id: Uuid) -> Result<ActivityResponse, error::SystemError> {
        self.activity_repo
            .find_activity(&id)
            .await?
            .map(ActivityResponse::from)
            .ok_or_else(|| error::SystemError::not_found("Activity not found"))
    }

    pub async fn create_activity(
        &self,
        model: CreateActivityModel,
    ) -> Result<ActivityResponse, error::SystemError> {
        if let Some(category_id) = &model.category_id {
            if self.activity_repo.find_category(category_id).await?.is_none() {
                return Err(error::SystemError::bad_request("Activity category does not exist"));
            }
        }

        let row = self.activity_repo.create_activity(&model.into()).await?;
        log::info!("Activity {} created", row.id);
        Ok(ActivityResponse::from(row))
    }
}
