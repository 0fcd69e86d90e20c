//! Shared HTTP adapter state.
//!
//! Handlers of both the JSON and the HTML surface accept this state via
//! `actix_web::web::Data` so they only depend on the driving ports and stay
//! testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{GameCatalogue, UserDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserDirectory>,
    pub games: Arc<dyn GameCatalogue>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    /// use gamenest::domain::{GameService, UserService};
    /// use gamenest::inbound::http::state::HttpState;
    /// use gamenest::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let state = HttpState::new(
    ///     Arc::new(UserService::new(store.clone())),
    ///     Arc::new(GameService::new(store)),
    /// );
    /// # let _ = state;
    /// ```
    pub fn new(users: Arc<dyn UserDirectory>, games: Arc<dyn GameCatalogue>) -> Self {
        Self { users, games }
    }
}
