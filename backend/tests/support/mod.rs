//! Shared wiring for the end-to-end tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the application is rebuilt here from the library parts: real services over
//! a fresh [`InMemoryStore`], the cookie session and the trace middleware.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use chrono::NaiveDate;

use gamenest::Trace;
use gamenest::domain::ports::{GameCatalogue, UserDirectory};
use gamenest::domain::{Game, GameName, GameService, UserService};
use gamenest::inbound::http::configure_api;
use gamenest::inbound::http::session::session_middleware;
use gamenest::inbound::http::state::HttpState;
use gamenest::inbound::web::configure_pages;
use gamenest::outbound::memory::InMemoryStore;

/// Services sharing one in-memory store.
pub struct World {
    pub users: Arc<dyn UserDirectory>,
    pub games: Arc<dyn GameCatalogue>,
}

impl World {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: Arc::new(UserService::new(store.clone())),
            games: Arc::new(GameService::new(store)),
        }
    }

    /// Application with both the JSON API and the HTML pages mounted.
    ///
    /// The app owns clones of the services, so it outlives `self`.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let state = HttpState::new(self.users.clone(), self.games.clone());
        App::new()
            .app_data(web::Data::new(state))
            .wrap(session_middleware(Key::generate(), false, SameSite::Lax))
            .wrap(Trace)
            .configure(configure_api)
            .configure(configure_pages)
    }

    /// Insert a game straight through the catalogue service.
    pub async fn seed_game(&self, name: &str, description: &str, released: (i32, u32, u32)) -> Game {
        let (year, month, day) = released;
        let game = Game::new(
            GameName::new(name).expect("valid game name"),
            description,
            NaiveDate::from_ymd_opt(year, month, day).expect("valid release date"),
        );
        self.games.insert_new_game(game).await.expect("seed game")
    }
}

/// Remembers the `session` cookie between requests, like a browser would.
#[derive(Default)]
pub struct Browser {
    session: Option<Cookie<'static>>,
}

impl Browser {
    pub fn attach(&self, req: test::TestRequest) -> test::TestRequest {
        match &self.session {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        }
    }

    pub fn absorb<B>(&mut self, res: &ServiceResponse<B>) {
        if let Some(cookie) = res.response().cookies().find(|c| c.name() == "session") {
            self.session = Some(cookie.into_owned());
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

pub fn form(uri: &str, fields: &[(&str, &str)]) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_form(fields)
}

pub fn location<B>(res: &ServiceResponse<B>) -> Option<String> {
    res.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

pub async fn page<B: MessageBody>(res: ServiceResponse<B>) -> String {
    let bytes = test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).expect("utf8 page")
}
