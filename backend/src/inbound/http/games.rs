//! Read-only game catalogue endpoints.
//!
//! ```text
//! GET /api/games
//! GET /api/games/id/{id}
//! GET /api/games/name/{name}
//! GET /api/games/namelike/{fragment}
//! GET /api/games/latest/{count}
//! ```

use actix_web::{get, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Failure, Game, GameId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::parse_id;

/// Game as exposed over JSON.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, format = Date)]
    pub release_date: NaiveDate,
}

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id().map(GameId::get),
            name: game.name().to_string(),
            description: game.description().to_owned(),
            release_date: game.release_date(),
        }
    }
}

fn game_list(games: &[Game]) -> Vec<GameResponse> {
    games.iter().map(GameResponse::from).collect()
}

/// List the whole catalogue.
#[utoipa::path(
    get,
    path = "/api/games",
    responses((status = 200, description = "Games", body = [GameResponse])),
    tags = ["games"],
    operation_id = "listGames"
)]
#[get("/games")]
pub async fn list_games(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<GameResponse>>> {
    let games = state.games.get_all_games().await?;
    Ok(web::Json(game_list(&games)))
}

/// Fetch a game by numeric id.
#[utoipa::path(
    get,
    path = "/api/games/id/{id}",
    params(("id" = String, Path, description = "Numeric game id")),
    responses(
        (status = 200, description = "Game", body = GameResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Unknown game", body = Error)
    ),
    tags = ["games"],
    operation_id = "getGameById"
)]
#[get("/games/id/{id}")]
pub async fn get_game_by_id(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<GameResponse>> {
    let id = GameId::new(parse_id(&path)?);
    let game = state.games.get_game_by_id(Some(id)).await?;
    Ok(web::Json(GameResponse::from(&game)))
}

/// Fetch a game by exact name.
#[utoipa::path(
    get,
    path = "/api/games/name/{name}",
    params(("name" = String, Path)),
    responses(
        (status = 200, description = "Game", body = GameResponse),
        (status = 404, description = "Unknown game", body = Error)
    ),
    tags = ["games"],
    operation_id = "getGameByName"
)]
#[get("/games/name/{name}")]
pub async fn get_game_by_name(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<GameResponse>> {
    let game = state.games.get_game_by_name(&path).await?;
    Ok(web::Json(GameResponse::from(&game)))
}

/// Case-insensitive name search.
#[utoipa::path(
    get,
    path = "/api/games/namelike/{fragment}",
    params(("fragment" = String, Path)),
    responses((status = 200, description = "Matching games, possibly none", body = [GameResponse])),
    tags = ["games"],
    operation_id = "searchGames"
)]
#[get("/games/namelike/{fragment}")]
pub async fn get_games_by_name_like(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<GameResponse>>> {
    let games = state.games.get_games_by_name_like(&path).await?;
    Ok(web::Json(game_list(&games)))
}

/// Most recent releases, newest first.
#[utoipa::path(
    get,
    path = "/api/games/latest/{count}",
    params(("count" = String, Path, description = "Maximum number of games")),
    responses(
        (status = 200, description = "Games by descending release date", body = [GameResponse]),
        (status = 400, description = "Malformed count", body = Error)
    ),
    tags = ["games"],
    operation_id = "latestGames"
)]
#[get("/games/latest/{count}")]
pub async fn latest_games(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<GameResponse>>> {
    let count = path
        .trim()
        .parse::<usize>()
        .map_err(|_| Failure::BadRequest)?;
    let games = state.games.get_latest_releases_games(count).await?;
    Ok(web::Json(game_list(&games)))
}
