use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{FriendResponse, FriendshipOverview, FriendshipResponse},
            repository::FriendshipRepository,
            schema::{FriendshipEntity, FriendshipStatus},
        },
        user::{model::UserSummary, repository::UserRepository},
    },
};

/// One read of a user's records plus the summaries of everyone they reference.
/// All views are derived from this snapshot.
pub struct RelationshipSnapshot {
    user_id: Uuid,
    records: Vec<FriendshipEntity>,
    users: HashMap<Uuid, UserSummary>,
}

impl RelationshipSnapshot {
    pub fn new(user_id: Uuid, mut records: Vec<FriendshipEntity>, users: Vec<UserSummary>) -> Self {
        records.retain(|r| r.involves(&user_id));
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        let users = users.into_iter().map(|u| (u.id, u)).collect();
        RelationshipSnapshot { user_id, records, users }
    }

    fn respond(&self, record: &FriendshipEntity) -> Option<FriendshipResponse> {
        let from_user = self.users.get(&record.from_user_id)?.clone();
        let to_user = self.users.get(&record.to_user_id)?.clone();
        Some(FriendshipResponse::new(record.clone(), from_user, to_user))
    }

    pub fn all(&self) -> Vec<FriendshipResponse> {
        self.records.iter().filter_map(|r| self.respond(r)).collect()
    }

    pub fn incoming_pending(&self) -> Vec<FriendshipResponse> {
        self.records
            .iter()
            .filter(|r| r.status == FriendshipStatus::Pending && r.to_user_id == self.user_id)
            .filter_map(|r| self.respond(r))
            .collect()
    }

    pub fn outgoing_pending(&self) -> Vec<FriendshipResponse> {
        self.records
            .iter()
            .filter(|r| r.status == FriendshipStatus::Pending && r.from_user_id == self.user_id)
            .filter_map(|r| self.respond(r))
            .collect()
    }

    pub fn accepted_friends(&self) -> Vec<FriendResponse> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| r.status == FriendshipStatus::Accepted)
            .filter_map(|r| {
                let counterpart = r.counterpart_of(&self.user_id)?;
                if !seen.insert(counterpart) {
                    tracing::warn!(
                        "Duplicate accepted friendship {} between {} and {}",
                        r.id,
                        self.user_id,
                        counterpart
                    );
                    return None;
                }
                let user = self.users.get(&counterpart)?.clone();
                Some(FriendResponse { user, friendship_id: r.id, since: r.updated_at })
            })
            .collect()
    }

    pub fn overview(&self) -> FriendshipOverview {
        FriendshipOverview {
            incoming: self.incoming_pending(),
            outgoing: self.outgoing_pending(),
            friends: self.accepted_friends(),
        }
    }
}

#[derive(Clone)]
pub struct FriendService<R, U>
where
    R: FriendshipRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    friend_repo: Arc<R>,
    user_repo: Arc<U>,
}

impl<R, U> FriendService<R, U>
where
    R: FriendshipRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(friend_repo: Arc<R>, user_repo: Arc<U>) -> Self {
        FriendService { friend_repo, user_repo }
    }

    pub async fn snapshot(&self, user_id: Uuid) -> Result<RelationshipSnapshot, error::SystemError> {
        let (user, records) = tokio::try_join!(
            self.user_repo.find_by_id(&user_id),
            self.friend_repo.find_for_user(&user_id),
        )?;

        let user = user.ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let counterpart_ids: Vec<Uuid> = records
            .iter()
            .filter_map(|r| r.counterpart_of(&user_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let mut users: Vec<UserSummary> = if counterpart_ids.is_empty() {
            Vec::new()
        } else {
            self.user_repo
                .find_by_ids(&counterpart_ids)
                .await?
                .into_iter()
                .map(UserSummary::from)
                .collect()
        };
        users.push(UserSummary::from(user));

        Ok(RelationshipSnapshot::new(user_id, records, users))
    }

    pub async fn list_friendships(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendshipResponse>, error::SystemError> {
        Ok(self.snapshot(user_id).await?.all())
    }

    pub async fn list_incoming_pending(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendshipResponse>, error::SystemError> {
        Ok(self.snapshot(user_id).await?.incoming_pending())
    }

    pub async fn list_outgoing_pending(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendshipResponse>, error::SystemError> {
        Ok(self.snapshot(user_id).await?.outgoing_pending())
    }

    pub async fn list_accepted_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        Ok(self.snapshot(user_id).await?.accepted_friends())
    }

    pub async fn overview(&self, user_id: Uuid) -> Result<FriendshipOverview, error::SystemError> {
        Ok(self.snapshot(user_id).await?.overview())
    }

    pub async fn send_request(
        &self,
        from_user_id: Uuid,
        to_user_id: Uuid,
    ) -> Result<FriendshipResponse, error::SystemError> {
        if from_user_id == to_user_id {
            return Err(error::SystemError::SelfRequest);
        }

        let (sender, recipient, existing) = tokio::try_join!(
            self.user_repo.find_by_id(&from_user_id),
            self.user_repo.find_by_id(&to_user_id),
            self.friend_repo.find_between(&from_user_id, &to_user_id),
        )?;

        let sender = sender.ok_or_else(|| error::SystemError::not_found("User not found"))?;
        let recipient =
            recipient.ok_or_else(|| error::SystemError::not_found("Recipient user not found"))?;

        if let Some(existing) = existing {
            return Err(duplicate_error(&existing));
        }

        let created = match self.friend_repo.create_pending(&from_user_id, &to_user_id).await {
            Ok(created) => created,
            // Lost the race against a concurrent request for the same pair.
            Err(e) if e.is_unique_violation() => {
                let existing = self.friend_repo.find_between(&from_user_id, &to_user_id).await?;
                return Err(existing
                    .as_ref()
                    .map(duplicate_error)
                    .unwrap_or(error::SystemError::AlreadyRequested));
            }
            Err(e) => return Err(e),
        };

        tracing::info!("Friend request {} sent from {} to {}", created.id, from_user_id, to_user_id);

        Ok(FriendshipResponse::new(created, sender.into(), recipient.into()))
    }

    pub async fn accept_request(
        &self,
        friendship_id: Uuid,
        acting_user_id: Uuid,
    ) -> Result<FriendshipResponse, error::SystemError> {
        let Some(accepted) =
            self.friend_repo.accept_pending(&friendship_id, &acting_user_id).await?
        else {
            return Err(self.explain_recipient_failure(&friendship_id, &acting_user_id).await);
        };

        tracing::info!("Friend request {} accepted by {}", friendship_id, acting_user_id);

        let users = self.user_repo.find_by_ids(&[accepted.from_user_id, accepted.to_user_id]).await?;
        let mut users: HashMap<Uuid, UserSummary> =
            users.into_iter().map(|u| (u.id, UserSummary::from(u))).collect();

        let from_user = users
            .remove(&accepted.from_user_id)
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        let to_user = users
            .remove(&accepted.to_user_id)
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        Ok(FriendshipResponse::new(accepted, from_user, to_user))
    }

    pub async fn decline_request(
        &self,
        friendship_id: Uuid,
        acting_user_id: Uuid,
    ) -> Result<(), error::SystemError> {
        if self.friend_repo.delete_pending(&friendship_id, &acting_user_id).await?.is_none() {
            return Err(self.explain_recipient_failure(&friendship_id, &acting_user_id).await);
        }

        tracing::info!("Friend request {} declined by {}", friendship_id, acting_user_id);
        Ok(())
    }

    /// Cancels a pending request or ends an accepted friendship. The delete is
    /// conditioned on the status read here, so a remove racing an accept fails
    /// instead of silently unfriending.
    pub async fn remove_friendship(
        &self,
        friendship_id: Uuid,
        acting_user_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let record = self
            .friend_repo
            .find_by_id(&friendship_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friendship not found"))?;

        if !record.involves(&acting_user_id) {
            return Err(error::SystemError::forbidden(
                "You are not allowed to remove this friendship",
            ));
        }

        let removed = self
            .friend_repo
            .delete_for_participant(&friendship_id, &acting_user_id, record.status)
            .await?;

        if removed.is_none() {
            return Err(match self.friend_repo.find_by_id(&friendship_id).await {
                Ok(Some(_)) => {
                    error::SystemError::invalid_state("Friendship changed while being removed")
                }
                Ok(None) => error::SystemError::not_found("Friendship not found"),
                Err(e) => e,
            });
        }

        tracing::info!("Friendship {} removed by {}", friendship_id, acting_user_id);
        Ok(())
    }

    /// Works out why a recipient-only conditional write touched nothing.
    async fn explain_recipient_failure(
        &self,
        friendship_id: &Uuid,
        acting_user_id: &Uuid,
    ) -> error::SystemError {
        let record = match self.friend_repo.find_by_id(friendship_id).await {
            Ok(record) => record,
            Err(e) => return e,
        };

        match record {
            None => error::SystemError::not_found("Friend request not found"),
            Some(r) if r.to_user_id != *acting_user_id => {
                tracing::debug!("User {} is not the recipient of {}", acting_user_id, r.id);
                error::SystemError::forbidden("Only the recipient can respond to this friend request")
            }
            Some(_) => error::SystemError::invalid_state("Friend request is no longer pending"),
        }
    }
}

fn duplicate_error(existing: &FriendshipEntity) -> error::SystemError {
    match existing.status {
        FriendshipStatus::Pending => error::SystemError::AlreadyRequested,
        FriendshipStatus::Accepted => error::SystemError::AlreadyFriends,
    }
}
