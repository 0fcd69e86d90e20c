//! Driven port for user persistence and the relationship index tables.

use async_trait::async_trait;

use crate::domain::{Game, RelationMutation, User, UserId};

use super::define_persistence_error;

define_persistence_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        connection => "user store unreachable: {message}",
        query => "user query failed: {message}",
        conflict => "username already stored: {message}",
        integrity => "user row rejected: {message}",
    }
}

/// Storage for users and the follow / like index tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every stored user, by ascending identity.
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, UserPersistenceError>;

    async fn find_by_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Users whose username contains `fragment`, ignoring case.
    async fn find_by_username_like(&self, fragment: &str)
    -> Result<Vec<User>, UserPersistenceError>;

    /// Persist a user without identity and return it with its new identity.
    async fn insert(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Replace the stored row matching `user.id()`; `None` when no row matched.
    async fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError>;

    /// Remove a user together with every relationship entry naming it.
    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError>;

    /// Apply relationship entries atomically and in order.
    ///
    /// Entries already present are left untouched.
    async fn apply_relations(
        &self,
        mutations: &[RelationMutation],
    ) -> Result<(), UserPersistenceError>;

    /// Users followed by `id`, in follow order.
    async fn followed_of(&self, id: UserId) -> Result<Vec<User>, UserPersistenceError>;

    /// Users following `id`, in follow order.
    async fn followers_of(&self, id: UserId) -> Result<Vec<User>, UserPersistenceError>;

    /// Games liked by `id`, in like order.
    async fn games_of(&self, id: UserId) -> Result<Vec<Game>, UserPersistenceError>;
}
