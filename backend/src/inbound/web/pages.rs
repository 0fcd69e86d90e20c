//! Server-rendered page handlers.
//!
//! The session only remembers who is logged in. Every handler re-reads the
//! logged-in user through [`SessionContext::current_user`], and mutating
//! handlers refuse anonymous callers before touching any service.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::info;
use zeroize::Zeroizing;

use super::error::{PageError, PageResult};
use super::views::{self, ProfileFlags, SearchOutcome};
use crate::domain::{ChangePasswordForm, Failure, RegistrationForm, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Number of releases shown on the home page.
pub const LATEST_RELEASES_COUNT: usize = 4;

pub(crate) fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Resolve the logged-in user or fail with `UnauthorizedOperation`.
async fn logged_user(state: &HttpState, session: &SessionContext) -> PageResult<User> {
    session.require_user_id()?;
    session
        .current_user(state.users.as_ref())
        .await?
        .ok_or(PageError::from(Failure::UnauthorizedOperation))
}

/// Login form fields.
#[derive(Debug, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl From<RegistrationInput> for RegistrationForm {
    fn from(input: RegistrationInput) -> Self {
        Self {
            username: input.username,
            password: Zeroizing::new(input.password),
            confirm_password: Zeroizing::new(input.confirm_password),
        }
    }
}

/// Query string of `/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub content_search: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowInput {
    #[serde(default)]
    pub followed_to_add: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeInput {
    #[serde(default)]
    pub game_to_add: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// Home page with the latest releases.
#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> PageResult<HttpResponse> {
    let user = session.current_user(state.users.as_ref()).await?;
    let latest = state
        .games
        .get_latest_releases_games(LATEST_RELEASES_COUNT)
        .await?;
    Ok(html(StatusCode::OK, views::index(user.as_ref(), &latest)))
}

#[get("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> PageResult<HttpResponse> {
    let logged = session.current_user(state.users.as_ref()).await?.is_some();
    let text = if logged { views::ALREADY_LOGGED } else { "" };
    Ok(html(StatusCode::OK, views::login(text, logged)))
}

/// Check credentials and remember the user in the session.
///
/// A failed attempt also forgets any previous login.
#[post("/verifyLogin")]
pub async fn verify_login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginInput>,
) -> PageResult<HttpResponse> {
    let user = match state
        .users
        .verify_login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(failure) => {
            session.clear();
            return Err(failure.into());
        }
    };
    let id = user
        .id()
        .ok_or_else(|| Failure::internal("verified user has no id"))?;
    session.persist_user(id)?;
    info!(user_id = %id, "user logged in");
    Ok(redirect("/".to_owned()))
}

#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    if let Some(id) = session.user_id() {
        info!(user_id = %id, "user logged out");
    }
    session.clear();
    redirect("/".to_owned())
}

/// Sign-up page, also served at `/register`.
pub async fn registration(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> PageResult<HttpResponse> {
    let logged = session.current_user(state.users.as_ref()).await?.is_some();
    let text = if logged { views::ALREADY_LOGGED } else { "" };
    Ok(html(StatusCode::OK, views::registration(text, logged)))
}

#[post("/save")]
pub async fn save(
    state: web::Data<HttpState>,
    form: web::Form<RegistrationInput>,
) -> PageResult<HttpResponse> {
    let user = state.users.register(form.into_inner().into()).await?;
    Ok(html(StatusCode::OK, views::registration_success(&user)))
}

#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> PageResult<HttpResponse> {
    let content = query.content_search.trim();
    if content.is_empty() {
        return Ok(html(StatusCode::OK, views::search(SearchOutcome::Blank)));
    }
    let users = state.users.get_users_by_username_like(content).await?;
    let games = state.games.get_games_by_name_like(content).await?;
    Ok(html(
        StatusCode::OK,
        views::search(SearchOutcome::Results {
            users: &users,
            games: &games,
        }),
    ))
}

/// Profile page with follow and password forms for the viewer.
#[get("/profile/{username}")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> PageResult<HttpResponse> {
    let shown = state.users.get_user_profile(&path).await?;
    let flags = match session.current_user(state.users.as_ref()).await? {
        None => ProfileFlags::default(),
        Some(viewer) => ProfileFlags {
            is_logged: true,
            is_my_profile: viewer.username() == shown.user.username(),
            // Follows are mirrored, so the viewed user's followers suffice.
            is_already_followed: shown
                .followers
                .iter()
                .any(|follower| follower.id() == viewer.id()),
        },
    };
    Ok(html(StatusCode::OK, views::profile(&shown, flags)))
}

#[get("/game/{name}")]
pub async fn game(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> PageResult<HttpResponse> {
    let details = state.games.get_game_details(&path).await?;
    let viewer = session.current_user(state.users.as_ref()).await?;
    let is_already_liked = viewer
        .as_ref()
        .and_then(User::id)
        .is_some_and(|id| details.is_liked_by(id));
    Ok(html(
        StatusCode::OK,
        views::game(&details, viewer.is_some(), is_already_liked),
    ))
}

/// Follow the named user, then show their profile.
#[post("/addUser")]
pub async fn add_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<FollowInput>,
) -> PageResult<HttpResponse> {
    let user = logged_user(&state, &session).await?;
    let followed = state
        .users
        .get_user_by_username(&form.followed_to_add)
        .await?;
    state.users.add_followed_user(&user, &followed).await?;
    Ok(redirect(format!(
        "/profile/{}",
        views::path_segment(followed.username().as_ref())
    )))
}

/// Like the named game, then show its page.
#[post("/addGame")]
pub async fn add_game(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LikeInput>,
) -> PageResult<HttpResponse> {
    let user = logged_user(&state, &session).await?;
    let liked = state.games.get_game_by_name(&form.game_to_add).await?;
    state.users.add_game(&user, &liked).await?;
    Ok(redirect(format!(
        "/game/{}",
        views::path_segment(liked.name().as_ref())
    )))
}

#[post("/changePassword")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<ChangePasswordInput>,
) -> PageResult<HttpResponse> {
    let user = logged_user(&state, &session).await?;
    let ChangePasswordInput {
        old_password,
        new_password,
    } = form.into_inner();
    let new_password = ChangePasswordForm {
        old_password: Zeroizing::new(old_password),
        new_password: Zeroizing::new(new_password),
    }
    .verify(&user)?;
    let user = state
        .users
        .change_password(&user, new_password.expose())
        .await?;
    Ok(html(StatusCode::OK, views::password_changed(&user)))
}
