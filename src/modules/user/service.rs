use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::Cache;
use crate::constants::{refresh_token_key, user_cache_key, AuthSettings, USER_CACHE_TTL_SECS};

use crate::modules::user::model::{
    InsertUser, SignInModel, SignUpModel, UpdateUserModel, UserResponse, UserSummary,
};
use crate::modules::user::repository::UserRepository;
use crate::modules::user::schema::UserEntity;
use crate::utils::{hash_password, verify_password, Claims, TypeClaims};

pub struct UserService<C>
where
    C: Cache + Send + Sync,
{
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<C>,
    settings: AuthSettings,
}

impl<C> Clone for UserService<C>
where
    C: Cache + Send + Sync,
{
    fn clone(&self) -> Self {
        UserService {
            repo: self.repo.clone(),
            cache: self.cache.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<C> UserService<C>
where
    C: Cache + Send + Sync,
{
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<C>,
        settings: AuthSettings,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache, settings }
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        let key = user_cache_key(&id);
        if let Some(cached_user) = self.cache.get::<UserResponse>(&key).await? {
            info!("User {} found in cache", id);
            return Ok(cached_user);
        }
        let entity = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        let response = UserResponse::from(entity);
        self.cache.set(&key, &response, USER_CACHE_TTL_SECS).await?;
        info!("User {} cached", id);
        Ok(response)
    }

    pub async fn get_summary(&self, id: Uuid) -> Result<UserSummary, error::SystemError> {
        self.repo
            .find_by_id(&id)
            .await?
            .map(UserSummary::from)
            .ok_or_else(|| error::SystemError::not_found("User not found"))
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        user: UpdateUserModel,
    ) -> Result<UserResponse, error::SystemError> {
        if user.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let updated = self.repo.update(&id, &user.into()).await?;

        self.cache.delete(&user_cache_key(&id)).await?;
        Ok(UserResponse::from(updated))
    }

    pub async fn search(
        &self,
        caller_id: Uuid,
        term: Option<String>,
    ) -> Result<Vec<UserSummary>, error::SystemError> {
        let term = normalize_search(term);
        let users = self
            .repo
            .search_users(term.as_deref(), &caller_id, self.settings.user_search_limit)
            .await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    pub async fn sign_up(&self, user: SignUpModel) -> Result<Uuid, error::SystemError> {
        let hash_password = hash_password(&user.password)?;

        let new_user = InsertUser {
            username: user.username,
            email: user.email,
            hash_password,
            first_name: user.first_name,
            last_name: user.last_name,
        };

        let user_id = self.repo.create(&new_user).await?;
        info!("User {} registered", user_id);
        Ok(user_id)
    }

    pub async fn sign_in(&self, user: SignInModel) -> Result<(String, String), error::SystemError> {
        let user_entity = self
            .repo
            .find_by_username(&user.username)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Invalid username or password"))?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            return Err(error::SystemError::unauthorized("Invalid username or password"));
        }

        self.issue_tokens(&user_entity).await
    }

    /// Exchanges a live refresh token for a fresh pair; the old `jti` is revoked.
    pub async fn refresh(
        &self,
        refresh_token: Option<String>,
    ) -> Result<(String, String), error::SystemError> {
        let claims = self.verify_refresh_token(refresh_token)?;
        let Some(jti) = claims.jti else {
            return Err(error::SystemError::unauthorized("Invalid refresh token"));
        };

        if !self.cache.delete(&refresh_token_key(&jti)).await? {
            return Err(error::SystemError::unauthorized("Refresh token revoked or expired"));
        }

        let user_entity = self
            .repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Invalid refresh token"))?;

        self.issue_tokens(&user_entity).await
    }

    pub async fn sign_out(&self, refresh_token: Option<String>) -> Result<(), error::SystemError> {
        // Signing out with a stale cookie is not an error.
        if let Ok(Claims { jti: Some(jti), .. }) = self.verify_refresh_token(refresh_token) {
            self.cache.delete(&refresh_token_key(&jti)).await?;
        }
        Ok(())
    }

    fn verify_refresh_token(&self, token: Option<String>) -> Result<Claims, error::SystemError> {
        let token =
            token.ok_or_else(|| error::SystemError::unauthorized("Missing refresh token"))?;
        let claims = Claims::decode(&token, self.settings.jwt_secret.as_ref())
            .map_err(|_| error::SystemError::unauthorized("Invalid refresh token"))?;
        if !claims.is_refresh() {
            return Err(error::SystemError::unauthorized("Invalid refresh token"));
        }
        Ok(claims)
    }

    async fn issue_tokens(
        &self,
        user_entity: &UserEntity,
    ) -> Result<(String, String), error::SystemError> {
        let access_token =
            Claims::new(&user_entity.id, &user_entity.role, self.settings.access_token_expiration)
                .with_type(TypeClaims::AccessToken)
                .encode(self.settings.jwt_secret.as_ref())?;

        let jti = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));

        let refresh_token =
            Claims::new(&user_entity.id, &user_entity.role, self.settings.refresh_token_expiration)
                .with_jti(jti)
                .with_type(TypeClaims::RefreshToken)
                .encode(self.settings.jwt_secret.as_ref())?;

        self.cache
            .set(
                &refresh_token_key(&jti),
                &user_entity.id,
                self.settings.refresh_token_expiration as usize,
            )
            .await?;

        Ok((access_token, refresh_token))
    }
}

/// Blank search terms list everyone.
pub fn normalize_search(term: Option<String>) -> Option<String> {
    term.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
