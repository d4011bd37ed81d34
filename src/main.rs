use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer, http,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{RedisCache, connect_database},
    constants::AuthSettings,
    middlewares::{authentication, authorization},
    modules::{
        activity::{repository_pg::ActivityRepositoryPg, service::ActivityService},
        friend::{repository_pg::FriendshipRepositoryPg, service::FriendService},
        preference::{repository_pg::PreferenceRepositoryPg, service::PreferenceService},
        task::{repository_pg::TaskRepositoryPg, service::TaskService},
        user::{repository_pg::UserRepositoryPg, schema::UserRole, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check(db_pool: web::Data<sqlx::PgPool>) -> Result<&'static str, api::error::Error> {
    sqlx::query("SELECT 1")
        .execute(db_pool.get_ref())
        .await
        .map_err(api::error::SystemError::from)?;
    Ok("Server is running")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let redis_pool =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let friend_repo = Arc::new(FriendshipRepositoryPg::new(db_pool.clone()));
    let task_repo = Arc::new(TaskRepositoryPg::new(db_pool.clone()));
    let activity_repo = Arc::new(ActivityRepositoryPg::new(db_pool.clone()));
    let preference_repo = Arc::new(PreferenceRepositoryPg::new(db_pool.clone()));

    let user_service = UserService::with_dependencies(
        user_repo.clone(),
        Arc::new(redis_pool),
        AuthSettings::from(&*ENV),
    );
    let friend_service = FriendService::with_dependencies(friend_repo, user_repo);
    let task_service = TaskService::with_dependencies(task_repo);
    let activity_service = ActivityService::with_dependencies(activity_repo.clone());
    let preference_service = PreferenceService::with_dependencies(preference_repo, activity_repo);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
            .allowed_headers(vec![http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(friend_service.clone()))
            .app_data(web::Data::new(task_service.clone()))
            .app_data(web::Data::new(activity_service.clone()))
            .app_data(web::Data::new(preference_service.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .configure(modules::user::route::public_api_configure)
                    .service(
                        web::scope("/admin")
                            .wrap(from_fn(authorization(vec![UserRole::Admin])))
                            .wrap(from_fn(authentication))
                            .configure(modules::activity::route::admin_configure),
                    )
                    .service(
                        web::scope("")
                            .wrap(from_fn(authorization(vec![UserRole::User, UserRole::Admin])))
                            .wrap(from_fn(authentication))
                            .configure(modules::user::route::configure)
                            .configure(modules::friend::route::configure)
                            .configure(modules::task::route::configure)
                            .configure(modules::activity::route::configure)
                            .configure(modules::preference::route::configure),
                    ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
