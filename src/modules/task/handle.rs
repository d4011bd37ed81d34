use actix_web::{HttpRequest, delete, get, patch, post, put, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::task::{
        model::{PatchTaskModel, TaskModel},
        repository_pg::TaskRepositoryPg,
        schema::TaskEntity,
        service::TaskService,
    },
    utils::ValidatedJson,
};

pub type TaskSvc = TaskService<TaskRepositoryPg>;

#[get("")]
pub async fn list_tasks(
    task_service: web::Data<TaskSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<TaskEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let tasks = task_service.list(user_id).await?;
    Ok(success::Success::ok(Some(tasks)).message("Tasks retrieved successfully"))
}

#[post("")]
pub async fn create_task(
    task_service: web::Data<TaskSvc>,
    body: ValidatedJson<TaskModel>,
    req: HttpRequest,
) -> Result<success::Success<TaskEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let task = task_service.create(user_id, body.0).await?;
    Ok(success::Success::created(Some(task)).message("Task created successfully"))
}

#[get("/{task_id}")]
pub async fn get_task(
    task_service: web::Data<TaskSvc>,
    task_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<TaskEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let task = task_service.get(user_id, *task_id).await?;
    Ok(success::Success::ok(Some(task)).message("Task retrieved successfully"))
}

#[put("/{task_id}")]
pub async fn replace_task(
    task_service: web::Data<TaskSvc>,
    task_id: web::Path<Uuid>,
    body: ValidatedJson<TaskModel>,
    req: HttpRequest,
) -> Result<success::Success<TaskEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let task = task_service.replace(user_id, *task_id, body.0).await?;
    Ok(success::Success::ok(Some(task)).message("Task updated successfully"))
}

#[patch("/{task_id}")]
pub async fn patch_task(
    task_service: web::Data<TaskSvc>,
    task_id: web::Path<Uuid>,
    body: ValidatedJson<PatchTaskModel>,
    req: HttpRequest,
) -> Result<success::Success<TaskEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let task = task_service.patch(user_id, *task_id, body.0).await?;
    Ok(success::Success::ok(Some(task)).message("Task updated successfully"))
}

#[delete("/{task_id}")]
pub async fn delete_task(
    task_service: web::Data<TaskSvc>,
    task_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    task_service.delete(user_id, *task_id).await?;
    Ok(success::Success::no_content())
}
