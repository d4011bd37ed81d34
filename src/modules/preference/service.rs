use std::{collections::BTreeSet, sync::Arc};

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        activity::repository::ActivityRepository,
        preference::{model::PreferenceResponse, repository::PreferenceRepository},
    },
};

#[derive(Clone)]
pub struct PreferenceService<P, A>
where
    P: PreferenceRepository + Send + Sync,
    A: ActivityRepository + Send + Sync,
{
    preference_repo: Arc<P>,
    activity_repo: Arc<A>,
}

impl<P, A> PreferenceService<P, A>
where
    P: PreferenceRepository + Send + Sync,
    A: ActivityRepository + Send + Sync,
{
    pub fn with_dependencies(preference_repo: Arc<P>, activity_repo: Arc<A>) -> Self {
        PreferenceService { preference_repo, activity_repo }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<PreferenceResponse, error::SystemError> {
        let preference = self.preference_repo.find_or_create(&user_id).await?;
        let categories = self.preference_repo.category_ids(&preference.id).await?;
        Ok(PreferenceResponse::new(preference, categories))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        category_ids: Vec<Uuid>,
    ) -> Result<PreferenceResponse, error::SystemError> {
        let categories: Vec<Uuid> =
            category_ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();

        if !categories.is_empty() {
            let known: BTreeSet<Uuid> = self
                .activity_repo
                .find_categories_by_ids(&categories)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect();

            if let Some(missing) = categories.iter().find(|id| !known.contains(id)) {
                return Err(error::SystemError::bad_request(format!(
                    "Invalid category id: {missing}"
                )));
            }
        }

        let preference = self.preference_repo.find_or_create(&user_id).await?;
        let preference = self.preference_repo.set_categories(&preference.id, &categories).await?;
        log::debug!("User {} now prefers {} categories", user_id, categories.len());

        Ok(PreferenceResponse::new(preference, categories))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::test::{MemoryActivityRepository, MemoryPreferenceRepository};

    struct Fixture {
        svc: PreferenceService<MemoryPreferenceRepository, MemoryActivityRepository>,
        activities: Arc<MemoryActivityRepository>,
    }

    fn fixture() -> Fixture {
        let activities = Arc::new(MemoryActivityRepository::default());
        let svc = PreferenceService::with_dependencies(
            Arc::new(MemoryPreferenceRepository::default()),
            activities.clone(),
        );
        Fixture { svc, activities }
    }

    fn new_id() -> Uuid {
        Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
    }

    #[actix_web::test]
    async fn first_read_creates_an_empty_record() {
        let f = fixture();
        let user = new_id();

        let first = f.svc.get(user).await.unwrap();
        assert!(first.preferred_categories.is_empty());
        assert_eq!(first.user_id, user);

        let second = f.svc.get(user).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[actix_web::test]
    async fn update_replaces_and_deduplicates() {
        let f = fixture();
        let user = new_id();
        let sport = f.activities.create_category("Sport", &None).await.unwrap().id;
        let art = f.activities.create_category("Art", &None).await.unwrap().id;

        let updated = f.svc.update(user, vec![sport, art, sport]).await.unwrap();
        let mut expected = vec![sport, art];
        expected.sort();
        assert_eq!(updated.preferred_categories, expected);

        let narrowed = f.svc.update(user, vec![art]).await.unwrap();
        assert_eq!(narrowed.preferred_categories, vec![art]);
        assert!(narrowed.updated_at >= updated.updated_at);
        assert_eq!(f.svc.get(user).await.unwrap().preferred_categories, vec![art]);
    }

    #[actix_web::test]
    async fn empty_list_clears_preferences() {
        let f = fixture();
        let user = new_id();
        let sport = f.activities.create_category("Sport", &None).await.unwrap().id;
        f.svc.update(user, vec![sport]).await.unwrap();

        let cleared = f.svc.update(user, Vec::new()).await.unwrap();
        assert!(cleared.preferred_categories.is_empty());
    }

    #[actix_web::test]
    async fn unknown_category_leaves_preferences_untouched() {
        let f = fixture();
        let user = new_id();
        let sport = f.activities.create_category("Sport", &None).await.unwrap().id;
        f.svc.update(user, vec![sport]).await.unwrap();

        let err = f.svc.update(user, vec![sport, new_id()]).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
        assert_eq!(f.svc.get(user).await.unwrap().preferred_categories, vec![sport]);
    }

    #[actix_web::test]
    async fn preferences_are_per_user() {
        let f = fixture();
        let alice = new_id();
        let bob = new_id();
        let sport = f.activities.create_category("Sport", &None).await.unwrap().id;

        f.svc.update(alice, vec![sport]).await.unwrap();
        assert!(f.svc.get(bob).await.unwrap().preferred_categories.is_empty());
    }
}
