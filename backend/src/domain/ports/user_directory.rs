//! Driving port for user use-cases.
//!
//! HTTP handlers depend on this trait rather than on [`UserService`] so they
//! can be exercised against mocks.
//!
//! [`UserService`]: crate::domain::UserService

use async_trait::async_trait;

use crate::domain::{Failure, Game, RegistrationForm, User, UserId, UserProfile};

/// User use-cases offered to the HTTP adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_all_users(&self) -> Result<Vec<User>, Failure>;

    async fn get_user_by_id(&self, id: Option<UserId>) -> Result<User, Failure>;

    async fn get_user_by_username(&self, username: &str) -> Result<User, Failure>;

    async fn get_user_by_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, Failure>;

    async fn get_users_by_username_like(&self, fragment: &str) -> Result<Vec<User>, Failure>;

    async fn insert_new_user(&self, candidate: User) -> Result<User, Failure>;

    async fn register(&self, form: RegistrationForm) -> Result<User, Failure>;

    async fn update_user_by_id(
        &self,
        id: Option<UserId>,
        replacement: User,
    ) -> Result<User, Failure>;

    async fn update_password_by_id(
        &self,
        id: Option<UserId>,
        new_password: &str,
    ) -> Result<User, Failure>;

    async fn delete_by_id(&self, id: Option<UserId>) -> Result<(), Failure>;

    async fn add_followed_user(&self, user: &User, followed: &User) -> Result<User, Failure>;

    async fn add_game(&self, user: &User, game: &Game) -> Result<User, Failure>;

    async fn change_password(&self, user: &User, new_password: &str) -> Result<User, Failure>;

    async fn verify_login(&self, username: &str, password: &str) -> Result<User, Failure>;

    async fn get_user_profile(&self, username: &str) -> Result<UserProfile, Failure>;
}
