use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::{
    friend::schema::{FriendshipEntity, FriendshipStatus},
    user::model::UserSummary,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendFriendRequestBody {
    pub to_user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FriendshipResponse {
    pub id: Uuid,
    pub from_user: UserSummary,
    pub to_user: UserSummary,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl FriendshipResponse {
    pub fn new(entity: FriendshipEntity, from_user: UserSummary, to_user: UserSummary) -> Self {
        FriendshipResponse {
            id: entity.id,
            from_user,
            to_user,
            status: entity.status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// An accepted friend as seen by one party: the counterpart plus the record id needed to unfriend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FriendResponse {
    #[serde(flatten)]
    pub user: UserSummary,
    pub friendship_id: Uuid,
    pub since: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendshipOverview {
    pub incoming: Vec<FriendshipResponse>,
    pub outgoing: Vec<FriendshipResponse>,
    pub friends: Vec<FriendResponse>,
}
