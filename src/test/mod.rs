//! In-memory repositories backing the service tests.

use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    api::error,
    configs::Cache,
    modules::{
        activity::{
            model::InsertActivity,
            repository::ActivityRepository,
            schema::{ActivityCategoryEntity, ActivityRow},
        },
        friend::{
            repository::FriendshipRepository,
            schema::{FriendshipEntity, FriendshipStatus},
        },
        preference::{repository::PreferenceRepository, schema::UserPreferenceEntity},
        task::{
            model::{InsertTask, TaskChanges},
            repository::TaskRepository,
            schema::TaskEntity,
        },
        user::{
            model::{InsertUser, UpdateUser},
            repository::UserRepository,
            schema::{UserEntity, UserRole},
        },
    },
};

fn new_id() -> Uuid {
    Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
}

/// Strictly increasing timestamps so ordering assertions do not depend on clock resolution.
#[derive(Default)]
struct Clock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl Clock {
    fn tick(&self) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap();
        let mut now = Utc::now();
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + Duration::microseconds(1);
            }
        }
        *last = Some(now);
        now
    }
}

// cache

/// Ignores expirations; entries live until deleted.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }
}

#[async_trait::async_trait]
impl Cache for MemoryCache {
    async fn get<T>(&self, key: &str) -> Result<Option<T>, error::SystemError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        let raw = self.entries.lock().unwrap().get(key).cloned();
        match raw {
            Some(v) => Ok(Some(serde_json::from_slice(&v)?)),
            None => Ok(None),
        }
    }

    async fn set<T>(
        &self,
        key: &str,
        value: &T,
        _expiration: usize,
    ) -> Result<(), error::SystemError>
    where
        T: serde::Serialize + Sync,
    {
        let serialized = serde_json::to_vec(value)?;
        self.entries.lock().unwrap().insert(key.to_string(), serialized);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, error::SystemError> {
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }
}

// users

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<UserEntity>>,
}

impl MemoryUserRepository {
    pub fn insert(&self, username: &str) -> Uuid {
        let now = Utc::now();
        let user = UserEntity {
            id: new_id(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            hash_password: String::new(),
            role: UserRole::User,
            first_name: username.to_string(),
            last_name: String::new(),
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        self.users.lock().unwrap().push(user);
        id
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError> {
        Ok(self.users.lock().unwrap().iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| {
            u.username.eq_ignore_ascii_case(&user.username) || u.email.eq_ignore_ascii_case(&user.email)
        }) {
            return Err(error::SystemError::Conflict(None));
        }
        let now = Utc::now();
        let id = new_id();
        users.push(UserEntity {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            hash_password: user.hash_password.clone(),
            role: UserRole::User,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let mut users = self.users.lock().unwrap();
        let entity = users
            .iter_mut()
            .find(|u| u.id == *id)
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        if let Some(username) = &user.username {
            entity.username = username.clone();
        }
        if let Some(email) = &user.email {
            entity.email = email.clone();
        }
        if let Some(first_name) = &user.first_name {
            entity.first_name = first_name.clone();
        }
        if let Some(last_name) = &user.last_name {
            entity.last_name = last_name.clone();
        }
        entity.updated_at = Utc::now();
        Ok(entity.clone())
    }

    async fn search_users(
        &self,
        query: Option<&str>,
        exclude_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let needle = query.map(str::to_lowercase);
        let mut found: Vec<UserEntity> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.id != *exclude_id)
            .filter(|u| needle.as_ref().map_or(true, |n| u.username.to_lowercase().contains(n)))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.username.cmp(&b.username));
        found.truncate(limit.max(0) as usize);
        Ok(found)
    }
}

// friendships

#[derive(Default)]
pub struct MemoryFriendshipRepository {
    records: Mutex<Vec<FriendshipEntity>>,
    clock: Clock,
}

impl MemoryFriendshipRepository {
    /// Inserts a pending record directly, bypassing the pair check.
    pub fn insert_pending(&self, from_user_id: Uuid, to_user_id: Uuid) -> Uuid {
        let now = self.clock.tick();
        let record = FriendshipEntity {
            id: new_id(),
            from_user_id,
            to_user_id,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let id = record.id;
        self.records.lock().unwrap().push(record);
        id
    }

    pub fn force_status(&self, id: &Uuid, status: FriendshipStatus) {
        let now = self.clock.tick();
        if let Some(r) = self.records.lock().unwrap().iter_mut().find(|r| r.id == *id) {
            r.status = status;
            r.updated_at = now;
        }
    }

    pub fn force_delete(&self, id: &Uuid) {
        self.records.lock().unwrap().retain(|r| r.id != *id);
    }

    pub fn get(&self, id: &Uuid) -> Option<FriendshipEntity> {
        self.records.lock().unwrap().iter().find(|r| r.id == *id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_where(&self, pred: impl Fn(&FriendshipEntity) -> bool) -> Option<FriendshipEntity> {
        let mut records = self.records.lock().unwrap();
        let idx = records.iter().position(pred)?;
        Some(records.remove(idx))
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for MemoryFriendshipRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Ok(self.get(id))
    }

    async fn find_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.involves(user_id_a) && r.involves(user_id_b))
            .cloned())
    }

    async fn find_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let mut found: Vec<FriendshipEntity> =
            self.records.lock().unwrap().iter().filter(|r| r.involves(user_id)).cloned().collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn create_pending(
        &self,
        from_user_id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let now = self.clock.tick();
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.involves(from_user_id) && r.involves(to_user_id)) {
            return Err(error::SystemError::Conflict(None));
        }
        let record = FriendshipEntity {
            id: new_id(),
            from_user_id: *from_user_id,
            to_user_id: *to_user_id,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn accept_pending(
        &self,
        id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let now = self.clock.tick();
        let mut records = self.records.lock().unwrap();
        let accepted = records
            .iter_mut()
            .find(|r| {
                r.id == *id && r.to_user_id == *to_user_id && r.status == FriendshipStatus::Pending
            })
            .map(|r| {
                r.status = FriendshipStatus::Accepted;
                r.updated_at = now;
                r.clone()
            });
        Ok(accepted)
    }

    async fn delete_pending(
        &self,
        id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Ok(self.take_where(|r| {
            r.id == *id && r.to_user_id == *to_user_id && r.status == FriendshipStatus::Pending
        }))
    }

    async fn delete_for_participant(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        expected: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Ok(self.take_where(|r| r.id == *id && r.involves(user_id) && r.status == expected))
    }
}

type Hook = Box<dyn Fn() + Send + Sync>;

/// Wraps a memory repository and runs a hook right before one kind of write,
/// standing in for a concurrent request that commits in between.
pub struct InterleavingFriendshipRepository {
    inner: Arc<MemoryFriendshipRepository>,
    before_create: Option<Hook>,
    before_accept: Option<Hook>,
    before_delete: Option<Hook>,
}

impl InterleavingFriendshipRepository {
    fn new(inner: Arc<MemoryFriendshipRepository>) -> Self {
        InterleavingFriendshipRepository {
            inner,
            before_create: None,
            before_accept: None,
            before_delete: None,
        }
    }

    pub fn before_create(
        inner: Arc<MemoryFriendshipRepository>,
        hook: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self { before_create: Some(Box::new(hook)), ..Self::new(inner) }
    }

    pub fn before_accept(
        inner: Arc<MemoryFriendshipRepository>,
        hook: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self { before_accept: Some(Box::new(hook)), ..Self::new(inner) }
    }

    /// Runs before both pending and participant deletes.
    pub fn before_delete(
        inner: Arc<MemoryFriendshipRepository>,
        hook: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self { before_delete: Some(Box::new(hook)), ..Self::new(inner) }
    }

    fn run(hook: &Option<Hook>) {
        if let Some(hook) = hook {
            hook();
        }
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for InterleavingFriendshipRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<FriendshipEntity>, error::SystemError> {
        self.inner.find_by_id(id).await
    }

    async fn find_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        self.inner.find_between(user_id_a, user_id_b).await
    }

    async fn find_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        self.inner.find_for_user(user_id).await
    }

    async fn create_pending(
        &self,
        from_user_id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        Self::run(&self.before_create);
        self.inner.create_pending(from_user_id, to_user_id).await
    }

    async fn accept_pending(
        &self,
        id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Self::run(&self.before_accept);
        self.inner.accept_pending(id, to_user_id).await
    }

    async fn delete_pending(
        &self,
        id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Self::run(&self.before_delete);
        self.inner.delete_pending(id, to_user_id).await
    }

    async fn delete_for_participant(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        expected: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Self::run(&self.before_delete);
        self.inner.delete_for_participant(id, user_id, expected).await
    }
}

// tasks

#[derive(Default)]
pub struct MemoryTaskRepository {
    tasks: Mutex<Vec<TaskEntity>>,
    clock: Clock,
}

#[async_trait::async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn find_all(&self, user_id: &Uuid) -> Result<Vec<TaskEntity>, error::SystemError> {
        Ok(self.tasks.lock().unwrap().iter().filter(|t| t.user_id == *user_id).cloned().collect())
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<TaskEntity>, error::SystemError> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == *id && t.user_id == *user_id)
            .cloned())
    }

    async fn create(&self, task: &InsertTask) -> Result<TaskEntity, error::SystemError> {
        let now = self.clock.tick();
        let entity = TaskEntity {
            id: new_id(),
            user_id: task.user_id,
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date,
            status: task.status,
            created_at: now,
            updated_at: now,
        };
        self.tasks.lock().unwrap().push(entity.clone());
        Ok(entity)
    }

    async fn update(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        changes: &TaskChanges,
    ) -> Result<Option<TaskEntity>, error::SystemError> {
        let now = self.clock.tick();
        let mut tasks = self.tasks.lock().unwrap();
        let Some(task) = tasks.iter_mut().find(|t| t.id == *id && t.user_id == *user_id) else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            task.title = title.clone();
        }
        if let Some(description) = &changes.description {
            task.description = description.clone();
        }
        if let Some(priority) = changes.priority {
            task.priority = priority;
        }
        if let Some(due_date) = changes.due_date {
            task.due_date = due_date;
        }
        if let Some(status) = changes.status {
            task.status = status;
        }
        task.updated_at = now;
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: &Uuid, user_id: &Uuid) -> Result<bool, error::SystemError> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| !(t.id == *id && t.user_id == *user_id));
        Ok(tasks.len() != before)
    }
}

// activities

#[derive(Default)]
pub struct MemoryActivityRepository {
    categories: Mutex<Vec<ActivityCategoryEntity>>,
    activities: Mutex<Vec<ActivityRow>>,
}

#[async_trait::async_trait]
impl ActivityRepository for MemoryActivityRepository {
    async fn list_categories(&self) -> Result<Vec<ActivityCategoryEntity>, error::SystemError> {
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category(
        &self,
        id: &Uuid,
    ) -> Result<Option<ActivityCategoryEntity>, error::SystemError> {
        Ok(self.categories.lock().unwrap().iter().find(|c| c.id == *id).cloned())
    }

    async fn find_categories_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<ActivityCategoryEntity>, error::SystemError> {
        Ok(self.categories.lock().unwrap().iter().filter(|c| ids.contains(&c.id)).cloned().collect())
    }

    async fn create_category(
        &self,
        name: &str,
        description: &Option<String>,
    ) -> Result<ActivityCategoryEntity, error::SystemError> {
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.name == name) {
            return Err(error::SystemError::Conflict(None));
        }
        let category = ActivityCategoryEntity {
            id: new_id(),
            name: name.to_string(),
            description: description.clone(),
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn list_activities(
        &self,
        category_id: Option<&Uuid>,
    ) -> Result<Vec<ActivityRow>, error::SystemError> {
        let mut rows: Vec<ActivityRow> = self
            .activities
            .lock()
            .unwrap()
            .iter()
            .filter(|a| category_id.map_or(true, |id| a.category_id.as_ref() == Some(id)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn find_activity(&self, id: &Uuid) -> Result<Option<ActivityRow>, error::SystemError> {
        Ok(self.activities.lock().unwrap().iter().find(|a| a.id == *id).cloned())
    }

    async fn create_activity(
        &self,
        activity: &InsertActivity,
    ) -> Result<ActivityRow, error::SystemError> {
        let category_name = match &activity.category_id {
            Some(id) => self.find_category(id).await?.map(|c| c.name),
            None => None,
        };
        let now = Utc::now();
        let row = ActivityRow {
            id: new_id(),
            category_id: activity.category_id,
            category_name,
            name: activity.name.clone(),
            description: activity.description.clone(),
            is_outdoor: activity.is_outdoor,
            min_duration_minutes: activity.min_duration_minutes,
            max_duration_minutes: activity.max_duration_minutes,
            notes: activity.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.activities.lock().unwrap().push(row.clone());
        Ok(row)
    }
}

// preferences

#[derive(Default)]
pub struct MemoryPreferenceRepository {
    preferences: Mutex<Vec<UserPreferenceEntity>>,
    categories: Mutex<HashMap<Uuid, BTreeSet<Uuid>>>,
    clock: Clock,
}

#[async_trait::async_trait]
impl PreferenceRepository for MemoryPreferenceRepository {
    async fn find_or_create(
        &self,
        user_id: &Uuid,
    ) -> Result<UserPreferenceEntity, error::SystemError> {
        let now = self.clock.tick();
        let mut preferences = self.preferences.lock().unwrap();
        if let Some(existing) = preferences.iter().find(|p| p.user_id == *user_id) {
            return Ok(existing.clone());
        }
        let preference =
            UserPreferenceEntity { id: new_id(), user_id: *user_id, created_at: now, updated_at: now };
        preferences.push(preference.clone());
        Ok(preference)
    }

    async fn category_ids(&self, preference_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .get(preference_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn set_categories(
        &self,
        preference_id: &Uuid,
        category_ids: &[Uuid],
    ) -> Result<UserPreferenceEntity, error::SystemError> {
        let now = self.clock.tick();
        let mut preferences = self.preferences.lock().unwrap();
        let preference = preferences
            .iter_mut()
            .find(|p| p.id == *preference_id)
            .ok_or_else(|| error::SystemError::not_found("Preferences not found"))?;
        preference.updated_at = now;
        self.categories
            .lock()
            .unwrap()
            .insert(*preference_id, category_ids.iter().copied().collect());
        Ok(preference.clone())
    }
}
