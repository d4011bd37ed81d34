use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::schema::{FriendshipEntity, FriendshipStatus},
};

/// Storage for friendship records. Every write is conditioned on the record's
/// current state and returns `None` when the condition no longer holds.
#[async_trait::async_trait]
pub trait FriendshipRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<FriendshipEntity>, error::SystemError>;

    /// The record linking the pair, in either direction.
    async fn find_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    /// Every record the user takes part in, oldest first.
    async fn find_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    /// Inserts a pending record. Fails with `SystemError::Conflict` when the
    /// pair already has a record.
    async fn create_pending(
        &self,
        from_user_id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError>;

    async fn accept_pending(
        &self,
        id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn delete_pending(
        &self,
        id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    /// Deletes the record if `user_id` is a party to it and it is still in `expected` state.
    async fn delete_for_participant(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        expected: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;
}
