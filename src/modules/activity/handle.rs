use actix_web::{get, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    modules::activity::{
        model::{ActivityQuery, ActivityResponse, CreateActivityModel, CreateCategoryModel},
        repository_pg::ActivityRepositoryPg,
        schema::ActivityCategoryEntity,
        service::ActivityService,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type ActivitySvc = ActivityService<ActivityRepositoryPg>;

#[get("")]
pub async fn list_categories(
    activity_service: web::Data<ActivitySvc>,
) -> Result<success::Success<Vec<ActivityCategoryEntity>>, error::Error> {
    let categories = activity_service.list_categories().await?;
    Ok(success::Success::ok(Some(categories)).message("Activity categories retrieved successfully"))
}

#[get("/{category_id}")]
pub async fn get_category(
    activity_service: web::Data<ActivitySvc>,
    category_id: web::Path<Uuid>,
) -> Result<success::Success<ActivityCategoryEntity>, error::Error> {
    let category = activity_service.get_category(*category_id).await?;
    Ok(success::Success::ok(Some(category)).message("Activity category retrieved successfully"))
}

#[post("")]
pub async fn create_category(
    activity_service: web::Data<ActivitySvc>,
    body: ValidatedJson<CreateCategoryModel>,
) -> Result<success::Success<ActivityCategoryEntity>, error::Error> {
    let category = activity_service.create_category(body.0).await?;
    Ok(success::Success::created(Some(category)).message("Activity category created successfully"))
}

#[get("")]
pub async fn list_activities(
    activity_service: web::Data<ActivitySvc>,
    query: ValidatedQuery<ActivityQuery>,
) -> Result<success::Success<Vec<ActivityResponse>>, error::Error> {
    let activities = activity_service.list_activities(query.0.category_id).await?;
    Ok(success::Success::ok(Some(activities)).message("Activities retrieved successfully"))
}

#[get("/{activity_id}")]
pub async fn get_activity(
    activity_service: web::Data<ActivitySvc>,
    activity_id: web::Path<Uuid>,
) -> Result<success::Success<ActivityResponse>, error::Error> {
    let activity = activity_service.get_activity(*activity_id).await?;
    Ok(success::Success::ok(Some(activity)).message("Activity retrieved successfully"))
}

#[post("")]
pub async fn create_activity(
    activity_service: web::Data<ActivitySvc>,
    body: ValidatedJson<CreateActivityModel>,
) -> Result<success::Success<ActivityResponse>, error::Error> {
    let activity = activity_service.create_activity(body.0).await?;
    Ok(success::Success::created(Some(activity)).message("Activity created successfully"))
}
