use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

/// Only active states are stored; declined and removed records are deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(type_name = "friendship_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct FriendshipEntity {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl FriendshipEntity {
    pub fn involves(&self, user_id: &Uuid) -> bool {
        self.from_user_id == *user_id || self.to_user_id == *user_id
    }

    /// The other party, if `user_id` is one of the two.
    pub fn counterpart_of(&self, user_id: &Uuid) -> Option<Uuid> {
        if self.from_user_id == *user_id {
            Some(self.to_user_id)
        } else if self.to_user_id == *user_id {
            Some(self.from_user_id)
        } else {
            None
        }
    }
}
