//! Everything `create_server` needs besides the health flags.

use std::net::SocketAddr;

use gamenest::inbound::http::session_config::SessionSettings;
use gamenest::outbound::persistence::DbPool;

/// Session, socket and store choices for one server instance.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    /// `None` keeps users and games in memory.
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) seed_demo_games: bool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            seed_demo_games: false,
        }
    }

    /// Serve from PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_demo_games(mut self, enabled: bool) -> Self {
        self.seed_demo_games = enabled;
        self
    }
}
