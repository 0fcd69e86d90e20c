//! Driven port for the game catalogue.

use async_trait::async_trait;

use crate::domain::{Game, GameId, User};

use super::define_persistence_error;

define_persistence_error! {
    /// Persistence errors raised by game repository adapters.
    pub enum GamePersistenceError {
        connection => "game store unreachable: {message}",
        query => "game query failed: {message}",
        conflict => "game name already stored: {message}",
        integrity => "game row rejected: {message}",
    }
}

/// Driven port persisting games and their likers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Every stored game, by ascending identity.
    async fn find_all(&self) -> Result<Vec<Game>, GamePersistenceError>;

    async fn find_by_id(&self, id: GameId) -> Result<Option<Game>, GamePersistenceError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Game>, GamePersistenceError>;

    /// Games whose name contains `fragment`, ignoring case.
    async fn find_by_name_like(&self, fragment: &str) -> Result<Vec<Game>, GamePersistenceError>;

    /// The `count` most recent releases, newest first.
    async fn find_latest_releases(&self, count: usize) -> Result<Vec<Game>, GamePersistenceError>;

    async fn insert(&self, game: &Game) -> Result<Game, GamePersistenceError>;

    /// Replace the stored row matching `game.id()`; `None` when no row matched.
    async fn update(&self, game: &Game) -> Result<Option<Game>, GamePersistenceError>;

    /// Remove a game and every like entry naming it.
    async fn delete(&self, id: GameId) -> Result<(), GamePersistenceError>;

    /// Users who like `id`, in like order.
    async fn likers_of(&self, id: GameId) -> Result<Vec<User>, GamePersistenceError>;
}
