//! Driving port for game use-cases.

use async_trait::async_trait;

use crate::domain::{Failure, Game, GameDetails, GameId};

/// Game use-cases offered to the HTTP adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameCatalogue: Send + Sync {
    async fn get_all_games(&self) -> Result<Vec<Game>, Failure>;

    async fn get_game_by_id(&self, id: Option<GameId>) -> Result<Game, Failure>;

    async fn get_game_by_name(&self, name: &str) -> Result<Game, Failure>;

    async fn get_games_by_name_like(&self, fragment: &str) -> Result<Vec<Game>, Failure>;

    async fn get_latest_releases_games(&self, count: usize) -> Result<Vec<Game>, Failure>;

    async fn insert_new_game(&self, candidate: Game) -> Result<Game, Failure>;

    async fn update_game_by_id(&self, id: Option<GameId>, replacement: Game)
    -> Result<Game, Failure>;

    async fn delete_by_id(&self, id: Option<GameId>) -> Result<(), Failure>;

    async fn get_game_details(&self, name: &str) -> Result<GameDetails, Failure>;
}
