//! Application settings loaded via OrthoConfig.
//!
//! Every field can come from the command line, a configuration file or a
//! `GAMENEST_`-prefixed environment variable (`GAMENEST_PORT=9000`).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GAMENEST")]
pub struct AppSettings {
    /// Interface to bind; defaults to all IPv4 interfaces.
    pub host: Option<IpAddr>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without one the server keeps its data in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the cookie signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Raw `Secure` cookie toggle (`1|0|true|false|yes|no`).
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub cookie_secure: Option<String>,
    /// Raw `SameSite` policy (`Strict|Lax|None`).
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub same_site: Option<String>,
    /// Raw toggle permitting a generated session key when the file is missing.
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub allow_ephemeral: Option<String>,
    /// Insert a handful of demo games when the store starts empty.
    #[ortho_config(default = false)]
    pub seed_demo_games: bool,
}

/// Accept a string, boolean or integer and keep its text.
///
/// The environment layer types `1` and `true` before they reach serde, while
/// the session toggles are parsed later from their raw spelling.
fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Flag(bool),
        Integer(i64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Flag(flag) => flag.to_string(),
        Scalar::Integer(number) => number.to_string(),
    }))
}

impl AppSettings {
    /// Socket address assembled from `host` and `port`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool size, falling back to the built-in default.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Key file path, falling back to the mounted secret location.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use actix_web::cookie::SameSite;
    use env_lock::lock_env;
    use rstest::rstest;

    use crate::inbound::http::session_config::{BuildMode, session_settings_from};

    const VARS: [&str; 9] = [
        "GAMENEST_HOST",
        "GAMENEST_PORT",
        "GAMENEST_DATABASE_URL",
        "GAMENEST_DB_MAX_CONNECTIONS",
        "GAMENEST_SESSION_KEY_FILE",
        "GAMENEST_COOKIE_SECURE",
        "GAMENEST_SAME_SITE",
        "GAMENEST_ALLOW_EPHEMERAL",
        "GAMENEST_SEED_DEMO_GAMES",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("gamenest")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.db_max_connections(), DEFAULT_POOL_SIZE);
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(DEFAULT_SESSION_KEY_FILE)
        );
        assert!(settings.cookie_secure.is_none());
        assert!(!settings.seed_demo_games);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("GAMENEST_HOST", Some("127.0.0.1".to_owned())),
            ("GAMENEST_PORT", Some("9090".to_owned())),
            (
                "GAMENEST_DATABASE_URL",
                Some("postgres://localhost/gamenest".to_owned()),
            ),
            ("GAMENEST_DB_MAX_CONNECTIONS", Some("3".to_owned())),
            ("GAMENEST_SESSION_KEY_FILE", Some("/tmp/key".to_owned())),
            ("GAMENEST_COOKIE_SECURE", Some("0".to_owned())),
            ("GAMENEST_SAME_SITE", Some("Strict".to_owned())),
            ("GAMENEST_ALLOW_EPHEMERAL", Some("1".to_owned())),
            ("GAMENEST_SEED_DEMO_GAMES", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090".parse().expect("addr"));
        assert_eq!(settings.database_url(), Some("postgres://localhost/gamenest"));
        assert_eq!(settings.db_max_connections(), 3);
        assert_eq!(settings.session_key_file(), PathBuf::from("/tmp/key"));
        assert_eq!(settings.cookie_secure.as_deref(), Some("0"));
        assert_eq!(settings.same_site.as_deref(), Some("Strict"));
        assert_eq!(settings.allow_ephemeral.as_deref(), Some("1"));
        assert!(settings.seed_demo_games);
    }

    #[rstest]
    #[case("1")]
    #[case("0")]
    #[case("true")]
    #[case("false")]
    #[case("yes")]
    fn session_toggles_keep_their_spelling(#[case] raw: &str) {
        let _guard = lock_env([
            ("GAMENEST_COOKIE_SECURE", Some(raw.to_owned())),
            ("GAMENEST_ALLOW_EPHEMERAL", Some(raw.to_owned())),
            ("GAMENEST_SAME_SITE", Some("Lax".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.cookie_secure.as_deref(), Some(raw));
        assert_eq!(settings.allow_ephemeral.as_deref(), Some(raw));
        assert_eq!(settings.same_site.as_deref(), Some("Lax"));
    }

    #[rstest]
    fn typed_toggles_reach_the_session_layer() {
        let _guard = lock_env([
            ("GAMENEST_COOKIE_SECURE", Some("1".to_owned())),
            ("GAMENEST_SAME_SITE", Some("None".to_owned())),
            ("GAMENEST_ALLOW_EPHEMERAL", Some("true".to_owned())),
            (
                "GAMENEST_SESSION_KEY_FILE",
                Some("/nonexistent/gamenest/session_key".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();
        let session =
            session_settings_from(&settings, BuildMode::Debug).expect("session settings resolve");
        assert!(session.cookie_secure);
        assert_eq!(session.same_site, SameSite::None);
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let _guard = lock_env([("GAMENEST_DATABASE_URL", Some("  ".to_owned()))]);
        assert_eq!(load_from_empty_args().database_url(), None);
    }
}
