use crate::modules::task::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/tasks")
            .service(list_tasks)
            .service(create_task)
            .service(get_task)
            .service(replace_task)
            .service(patch_task)
            .service(delete_task),
    );
}
