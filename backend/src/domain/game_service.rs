//! Game catalogue service implementing [`GameCatalogue`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{GameCatalogue, GamePersistenceError, GameRepository};
use crate::domain::{Failure, Game, GameDetails, GameId};

/// Catalogue service over a [`GameRepository`].
///
/// Implements [`GameCatalogue`] for the HTTP adapters. Lookups validate
/// their arguments before the repository is touched.
#[derive(Clone)]
pub struct GameService<R> {
    games: Arc<R>,
}

impl<R> GameService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(games: Arc<R>) -> Self {
        Self { games }
    }
}

fn map_game_persistence_error(error: GamePersistenceError) -> Failure {
    match error {
        GamePersistenceError::Connection { message } => Failure::unavailable(message),
        GamePersistenceError::Query { message } => Failure::internal(message),
        GamePersistenceError::Conflict { message } => {
            debug!(%message, "game name already taken");
            Failure::GameAlreadyExisting
        }
        GamePersistenceError::Integrity { message } => Failure::invalid_argument(message),
    }
}

fn require_id(id: Option<GameId>) -> Result<GameId, Failure> {
    id.ok_or_else(|| Failure::invalid_argument("game id must be provided"))
}

fn require_text<'a>(value: &'a str, what: &str) -> Result<&'a str, Failure> {
    if value.trim().is_empty() {
        return Err(Failure::invalid_argument(format!("{what} must be provided")));
    }
    Ok(value)
}

impl<R> GameService<R>
where
    R: GameRepository,
{
    async fn existing(&self, id: GameId) -> Result<Game, Failure> {
        self.games
            .find_by_id(id)
            .await
            .map_err(map_game_persistence_error)?
            .ok_or(Failure::GameNotFound)
    }
}

#[async_trait]
impl<R> GameCatalogue for GameService<R>
where
    R: GameRepository,
{
    async fn get_all_games(&self) -> Result<Vec<Game>, Failure> {
        self.games
            .find_all()
            .await
            .map_err(map_game_persistence_error)
    }

    async fn get_game_by_id(&self, id: Option<GameId>) -> Result<Game, Failure> {
        let id = require_id(id)?;
        self.existing(id).await
    }

    async fn get_game_by_name(&self, name: &str) -> Result<Game, Failure> {
        let name = require_text(name, "game name")?;
        self.games
            .find_by_name(name)
            .await
            .map_err(map_game_persistence_error)?
            .ok_or(Failure::GameNotFound)
    }

    async fn get_games_by_name_like(&self, fragment: &str) -> Result<Vec<Game>, Failure> {
        let fragment = require_text(fragment, "search fragment")?;
        self.games
            .find_by_name_like(fragment)
            .await
            .map_err(map_game_persistence_error)
    }

    async fn get_latest_releases_games(&self, count: usize) -> Result<Vec<Game>, Failure> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.games
            .find_latest_releases(count)
            .await
            .map_err(map_game_persistence_error)
    }

    async fn insert_new_game(&self, candidate: Game) -> Result<Game, Failure> {
        let saved = self
            .games
            .insert(&candidate.identified_as(None))
            .await
            .map_err(map_game_persistence_error)?;
        info!(game_id = ?saved.id(), name = %saved.name(), "game added");
        Ok(saved)
    }

    async fn update_game_by_id(
        &self,
        id: Option<GameId>,
        replacement: Game,
    ) -> Result<Game, Failure> {
        let id = require_id(id)?;
        self.existing(id).await?;
        let updated = self
            .games
            .update(&replacement.identified_as(Some(id)))
            .await
            .map_err(map_game_persistence_error)?
            .ok_or(Failure::GameNotFound)?;
        info!(game_id = %id, "game replaced");
        Ok(updated)
    }

    async fn delete_by_id(&self, id: Option<GameId>) -> Result<(), Failure> {
        let id = require_id(id)?;
        self.existing(id).await?;
        self.games
            .delete(id)
            .await
            .map_err(map_game_persistence_error)?;
        info!(game_id = %id, "game deleted");
        Ok(())
    }

    async fn get_game_details(&self, name: &str) -> Result<GameDetails, Failure> {
        let game = self.get_game_by_name(name).await?;
        let id = game
            .id()
            .ok_or_else(|| Failure::internal("stored game without identity"))?;
        let likers = self
            .games
            .likers_of(id)
            .await
            .map_err(map_game_persistence_error)?;
        Ok(GameDetails { game, likers })
    }
}
