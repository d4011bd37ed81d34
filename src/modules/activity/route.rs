use crate::modules::activity::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/activity-categories").service(list_categories).service(get_category))
        .service(scope("/activities").service(list_activities).service(get_activity));
}

/// Catalogue writes, mounted behind the admin role check.
pub fn admin_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/activity-categories").service(create_category))
        .service(scope("/activities").service(create_activity));
}
