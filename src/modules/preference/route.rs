use crate::modules::preference::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/preferences").service(get_preferences).service(update_preferences));
}
