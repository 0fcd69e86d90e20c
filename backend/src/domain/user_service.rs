//! User domain service.
//!
//! Implements [`UserDirectory`] on top of a [`UserRepository`]. Argument checks
//! always run before the repository is touched; relationship changes are
//! written as forward-then-inverse pairs in one repository call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{UserDirectory, UserPersistenceError, UserRepository};
use crate::domain::{
    Failure, Game, LoginCredentials, Password, RegistrationForm, RelationMutation, User, UserId,
    UserProfile,
};

/// User service implementing the [`UserDirectory`] driving port.
#[derive(Clone)]
pub struct UserService<R> {
    users: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

fn map_user_persistence_error(error: UserPersistenceError) -> Failure {
    match error {
        UserPersistenceError::Connection { message } => Failure::unavailable(message),
        UserPersistenceError::Query { message } => Failure::internal(message),
        UserPersistenceError::Conflict { message } => {
            debug!(%message, "username already taken");
            Failure::UsernameAlreadyExisting
        }
        UserPersistenceError::Integrity { message } => {
            debug!(%message, "user row rejected by store");
            Failure::InvalidUserData
        }
    }
}

fn require_id(id: Option<UserId>) -> Result<UserId, Failure> {
    id.ok_or_else(|| Failure::invalid_argument("user id must be provided"))
}

fn require_text<'a>(value: &'a str, what: &str) -> Result<&'a str, Failure> {
    if value.trim().is_empty() {
        return Err(Failure::invalid_argument(format!("{what} must be provided")));
    }
    Ok(value)
}

fn persisted_id(user: &User, role: &str) -> Result<UserId, Failure> {
    user.id()
        .ok_or_else(|| Failure::invalid_argument(format!("{role} must be a stored user")))
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    async fn existing(&self, id: UserId) -> Result<User, Failure> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or(Failure::UserNotFound)
    }

    async fn replace(&self, user: &User) -> Result<User, Failure> {
        self.users
            .update(user)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or(Failure::UserNotFound)
    }
}

#[async_trait]
impl<R> UserDirectory for UserService<R>
where
    R: UserRepository,
{
    async fn get_all_users(&self) -> Result<Vec<User>, Failure> {
        self.users
            .find_all()
            .await
            .map_err(map_user_persistence_error)
    }

    async fn get_user_by_id(&self, id: Option<UserId>) -> Result<User, Failure> {
        let id = require_id(id)?;
        self.existing(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, Failure> {
        let username = require_text(username, "username")?;
        self.users
            .find_by_username(username)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or(Failure::UserNotFound)
    }

    async fn get_user_by_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, Failure> {
        let username = require_text(username, "username")?;
        let password = require_text(password, "password")?;
        self.users
            .find_by_username_and_password(username, password)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or(Failure::UserNotFound)
    }

    async fn get_users_by_username_like(&self, fragment: &str) -> Result<Vec<User>, Failure> {
        let fragment = require_text(fragment, "search fragment")?;
        self.users
            .find_by_username_like(fragment)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn insert_new_user(&self, candidate: User) -> Result<User, Failure> {
        let candidate = candidate.identified_as(None);
        let saved = self
            .users
            .insert(&candidate)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = ?saved.id(), username = %saved.username(), "user registered");
        Ok(saved)
    }

    async fn register(&self, form: RegistrationForm) -> Result<User, Failure> {
        let candidate = form.into_user()?;
        self.insert_new_user(candidate).await
    }

    async fn update_user_by_id(
        &self,
        id: Option<UserId>,
        replacement: User,
    ) -> Result<User, Failure> {
        let id = require_id(id)?;
        self.existing(id).await?;
        let updated = self.replace(&replacement.identified_as(Some(id))).await?;
        info!(user_id = %id, "user replaced");
        Ok(updated)
    }

    async fn update_password_by_id(
        &self,
        id: Option<UserId>,
        new_password: &str,
    ) -> Result<User, Failure> {
        let id = require_id(id)?;
        let password = Password::new(new_password).map_err(|_| Failure::NewPasswordRequired)?;
        let current = self.existing(id).await?;
        let updated = self.replace(&current.with_password(password)).await?;
        info!(user_id = %id, "password updated");
        Ok(updated)
    }

    async fn delete_by_id(&self, id: Option<UserId>) -> Result<(), Failure> {
        let id = require_id(id)?;
        self.existing(id).await?;
        self.users
            .delete(id)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn add_followed_user(&self, user: &User, followed: &User) -> Result<User, Failure> {
        let user_id = persisted_id(user, "follower")?;
        let followed_id = persisted_id(followed, "followed user")?;
        if user_id == followed_id {
            return Err(Failure::invalid_argument("users cannot follow themselves"));
        }
        self.users
            .apply_relations(&RelationMutation::follow_pair(user_id, followed_id))
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user_id, followed_id = %followed_id, "follow recorded");
        self.existing(user_id).await
    }

    async fn add_game(&self, user: &User, game: &Game) -> Result<User, Failure> {
        let user_id = persisted_id(user, "user")?;
        let game_id = game
            .id()
            .ok_or_else(|| Failure::invalid_argument("game must be a stored game"))?;
        self.users
            .apply_relations(&RelationMutation::like_pair(user_id, game_id))
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user_id, game_id = %game_id, "like recorded");
        self.existing(user_id).await
    }

    async fn change_password(&self, user: &User, new_password: &str) -> Result<User, Failure> {
        let user_id = persisted_id(user, "user")?;
        let password = Password::new(new_password).map_err(|_| Failure::NewPasswordRequired)?;
        let updated = self.replace(&user.clone().with_password(password)).await?;
        info!(user_id = %user_id, "password changed");
        Ok(updated)
    }

    async fn verify_login(&self, username: &str, password: &str) -> Result<User, Failure> {
        let credentials = LoginCredentials::try_from_parts(username, password)?;
        let user = self
            .users
            .find_by_username_and_password(credentials.username(), credentials.password())
            .await
            .map_err(map_user_persistence_error)?;
        match user {
            Some(user) => {
                debug!(user_id = ?user.id(), "login verified");
                Ok(user)
            }
            None => {
                debug!(username = credentials.username(), "login rejected");
                Err(Failure::LoginFailed)
            }
        }
    }

    async fn get_user_profile(&self, username: &str) -> Result<UserProfile, Failure> {
        let user = self.get_user_by_username(username).await?;
        let id = persisted_id(&user, "profile owner")?;
        let followed = self
            .users
            .followed_of(id)
            .await
            .map_err(map_user_persistence_error)?;
        let followers = self
            .users
            .followers_of(id)
            .await
            .map_err(map_user_persistence_error)?;
        let games = self
            .users
            .games_of(id)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(UserProfile {
            user,
            followed,
            followers,
            games,
        })
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
