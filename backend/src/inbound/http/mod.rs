//! HTTP inbound adapter exposing the JSON REST endpoints.

pub mod error;
pub mod games;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
pub mod users;

pub use error::ApiResult;

use actix_web::web;

/// Lookup prefixes that answer 400 when called without their last segment.
const BARE_LOOKUPS: [&str; 14] = [
    "/users/id",
    "/users/id/",
    "/users/username",
    "/users/username/",
    "/users/usernamelike",
    "/users/usernamelike/",
    "/games/id",
    "/games/id/",
    "/games/name",
    "/games/name/",
    "/games/namelike",
    "/games/namelike/",
    "/games/latest",
    "/games/latest/",
];

/// Mount the REST surface under `/api`.
///
/// Expects [`state::HttpState`] to be registered as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use gamenest::inbound::http::configure_api;
///
/// let app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .service(users::list_users)
            .service(users::get_user_by_id)
            .service(users::get_user_by_username)
            .service(users::get_users_by_username_like)
            .service(users::create_user)
            .service(users::replace_user)
            .service(users::update_user_password)
            .service(users::delete_user)
            .service(games::list_games)
            .service(games::get_game_by_id)
            .service(games::get_game_by_name)
            .service(games::get_games_by_name_like)
            .service(games::latest_games)
            .service(
                web::resource(BARE_LOOKUPS).route(web::get().to(users::missing_path_segment)),
            ),
    );
}
