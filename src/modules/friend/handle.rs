use actix_web::{HttpRequest, delete, get, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::{
            model::{FriendResponse, FriendshipOverview, FriendshipResponse, SendFriendRequestBody},
            repository_pg::FriendshipRepositoryPg,
            service::FriendService,
        },
        user::repository_pg::UserRepositoryPg,
    },
    utils::ValidatedJson,
};

pub type FriendSvc = FriendService<FriendshipRepositoryPg, UserRepositoryPg>;

#[post("")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendSvc>,
    body: ValidatedJson<SendFriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let request = friend_service.send_request(sender_id, body.0.to_user_id).await?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully"))
}

#[get("")]
pub async fn list_friendships(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendshipResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friendships = friend_service.list_friendships(user_id).await?;

    Ok(success::Success::ok(Some(friendships)).message("Friendships retrieved successfully"))
}

#[get("/overview")]
pub async fn get_overview(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipOverview>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let overview = friend_service.overview(user_id).await?;

    Ok(success::Success::ok(Some(overview)).message("Friendships retrieved successfully"))
}

#[get("/incoming")]
pub async fn list_incoming_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendshipResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.list_incoming_pending(user_id).await?;

    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[get("/outgoing")]
pub async fn list_outgoing_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendshipResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.list_outgoing_pending(user_id).await?;

    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[get("/friends")]
pub async fn list_friends(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.list_accepted_friends(user_id).await?;

    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[post("/{friendship_id}/accept")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendSvc>,
    friendship_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let receiver_id = get_claims(&req)?.sub;
    let friendship = friend_service.accept_request(*friendship_id, receiver_id).await?;

    Ok(success::Success::ok(Some(friendship)).message("Friend request accepted successfully"))
}

#[post("/{friendship_id}/decline")]
pub async fn decline_friend_request(
    friend_service: web::Data<FriendSvc>,
    friendship_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let receiver_id = get_claims(&req)?.sub;
    friend_service.decline_request(*friendship_id, receiver_id).await?;
    Ok(success::Success::no_content())
}

#[delete("/{friendship_id}")]
pub async fn remove_friendship(
    friend_service: web::Data<FriendSvc>,
    friendship_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    friend_service.remove_friendship(*friendship_id, user_id).await?;
    Ok(success::Success::no_content())
}
