//! Session helpers shared by the REST and HTML adapters.
//!
//! The cookie carries only the authenticated user's id. Handlers go through
//! [`SessionContext`] so they never touch `actix-session` directly.

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::ports::UserDirectory;
use crate::domain::{Failure, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Private (encrypted and signed) cookie session middleware.
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an extracted actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record `user_id` as logged in, rotating the session first.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Failure> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|error| Failure::internal(format!("failed to persist session: {error}")))
    }

    /// Id stored in the cookie, if any. A tampered value counts as absent.
    pub fn user_id(&self) -> Option<UserId> {
        match self.0.get::<i64>(USER_ID_KEY) {
            Ok(id) => id.map(UserId::new),
            Err(error) => {
                warn!(%error, "unreadable user id in session cookie");
                None
            }
        }
    }

    /// Require a logged-in user id.
    pub fn require_user_id(&self) -> Result<UserId, Failure> {
        self.user_id().ok_or(Failure::UnauthorizedOperation)
    }

    /// Resolve the logged-in user through the directory.
    ///
    /// A cookie naming a user that no longer exists is purged and treated as
    /// anonymous.
    pub async fn current_user(&self, users: &dyn UserDirectory) -> Result<Option<User>, Failure> {
        let Some(id) = self.user_id() else {
            return Ok(None);
        };
        match users.get_user_by_id(Some(id)).await {
            Ok(user) => Ok(Some(user)),
            Err(Failure::UserNotFound) => {
                debug!(user_id = %id, "session names a deleted user; purging");
                self.clear();
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    /// Drop the session entirely.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
