use crate::modules::friend::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friendships")
            .service(send_friend_request)
            .service(list_friendships)
            .service(get_overview)
            .service(list_incoming_requests)
            .service(list_outgoing_requests)
            .service(list_friends)
            .service(accept_friend_request)
            .service(decline_friend_request)
            .service(remove_friendship),
    );
}
