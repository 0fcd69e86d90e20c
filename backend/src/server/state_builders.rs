//! Builders for the HTTP state and its store-backed services.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use gamenest::domain::ports::{GameCatalogue, GameRepository, UserDirectory, UserRepository};
use gamenest::domain::{Failure, Game, GameName, GameService, UserService};
use gamenest::inbound::http::state::HttpState;
use gamenest::outbound::memory::InMemoryStore;
use gamenest::outbound::persistence::{DieselGameRepository, DieselUserRepository};

use super::ServerConfig;

/// Demo catalogue: name, description, release date.
const DEMO_GAMES: [(&str, &str, (i32, u32, u32)); 5] = [
    ("Doom", "Rip and tear through Phobos.", (1993, 12, 10)),
    ("Half-Life", "A scientist, a crowbar and a resonance cascade.", (1998, 11, 19)),
    ("Portal", "Think with portals.", (2007, 10, 10)),
    ("Celeste", "Climb the mountain.", (2018, 1, 25)),
    ("Hades", "Escape the underworld.", (2020, 9, 17)),
];

fn services<U, G>(users: Arc<U>, games: Arc<G>) -> HttpState
where
    U: UserRepository + 'static,
    G: GameRepository + 'static,
{
    let users: Arc<dyn UserDirectory> = Arc::new(UserService::new(users));
    let games: Arc<dyn GameCatalogue> = Arc::new(GameService::new(games));
    HttpState::new(users, games)
}

/// Wire the services onto PostgreSQL when a pool is configured, otherwise
/// onto a fresh in-process store.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => {
            info!("serving from PostgreSQL");
            services(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselGameRepository::new(pool.clone())),
            )
        }
        None => {
            warn!("no database configured; data lives in memory and is lost on exit");
            let store = Arc::new(InMemoryStore::new());
            services(store.clone(), store)
        }
    }
}

fn demo_games() -> impl Iterator<Item = Game> {
    DEMO_GAMES
        .into_iter()
        .filter_map(|(name, description, (year, month, day))| {
            let name = GameName::new(name).ok()?;
            let released = NaiveDate::from_ymd_opt(year, month, day)?;
            Some(Game::new(name, description, released))
        })
}

/// Fill an empty catalogue with the demo games.
///
/// Returns how many games were inserted. A non-empty catalogue is left
/// untouched.
pub(super) async fn seed_demo_games(games: &dyn GameCatalogue) -> Result<usize, Failure> {
    if !games.get_all_games().await?.is_empty() {
        return Ok(0);
    }
    let mut inserted = 0;
    for game in demo_games() {
        match games.insert_new_game(game).await {
            Ok(_) => inserted += 1,
            Err(Failure::GameAlreadyExisting) => {}
            Err(other) => return Err(other),
        }
    }
    info!(inserted, "seeded demo games");
    Ok(inserted)
}
