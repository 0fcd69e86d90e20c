//! Cookie session settings.
//!
//! [`AppSettings`] carries the raw toggles as text. Debug builds fall back to
//! permissive defaults with a warning; release builds refuse anything missing,
//! malformed or unsafe.

use std::io;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

use crate::settings::AppSettings;

/// Shortest key file accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
pub const COOKIE_SECURE_SETTING: &str = "GAMENEST_COOKIE_SECURE";
pub const SAME_SITE_SETTING: &str = "GAMENEST_SAME_SITE";
pub const ALLOW_EPHEMERAL_SETTING: &str = "GAMENEST_ALLOW_EPHEMERAL";

/// Whether missing or weak session settings are tolerated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    /// Debug builds swallow `error` and continue with `fallback`.
    fn tolerate<T>(self, fallback: T, error: SessionConfigError) -> Result<T, SessionConfigError> {
        match self {
            Self::Debug => {
                warn!(%error, "using development fallback");
                Ok(fallback)
            }
            Self::Release => Err(error),
        }
    }
}

/// Reasons the session settings cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SessionConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name}={value:?} is not one of {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("cannot read session key {}: {source}", .path.display())]
    KeyUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "session key {} holds {length} bytes, fewer than {}",
        .path.display(),
        SESSION_KEY_MIN_LEN
    )]
    KeyTooShort { path: PathBuf, length: usize },
    #[error("SameSite=None cookies must also be Secure")]
    SameSiteNoneNeedsSecure,
    #[error("ephemeral session keys are refused in release builds")]
    EphemeralKeyInRelease,
}

/// Validated cookie session parameters.
#[derive(Clone)]
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Short hex digest of the signing key, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.key.signing());
        hex::encode(digest.get(..8).unwrap_or_default())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(raw: &str) -> Option<SameSite> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

fn flag(
    mode: BuildMode,
    name: &'static str,
    raw: Option<&str>,
    fallback: bool,
) -> Result<bool, SessionConfigError> {
    let Some(raw) = raw else {
        return mode.tolerate(fallback, SessionConfigError::Missing(name));
    };
    match parse_flag(raw) {
        Some(value) => Ok(value),
        None => mode.tolerate(
            fallback,
            SessionConfigError::Invalid {
                name,
                value: raw.to_owned(),
                expected: "1|0|true|false|yes|no|y|n",
            },
        ),
    }
}

fn same_site(
    mode: BuildMode,
    raw: Option<&str>,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let fallback = match mode {
        BuildMode::Debug => SameSite::Lax,
        BuildMode::Release => SameSite::Strict,
    };
    let Some(raw) = raw else {
        return mode.tolerate(fallback, SessionConfigError::Missing(SAME_SITE_SETTING));
    };
    match parse_same_site(raw) {
        Some(SameSite::None) if !cookie_secure => {
            mode.tolerate(SameSite::None, SessionConfigError::SameSiteNoneNeedsSecure)
        }
        Some(policy) => Ok(policy),
        None => mode.tolerate(
            fallback,
            SessionConfigError::Invalid {
                name: SAME_SITE_SETTING,
                value: raw.to_owned(),
                expected: "Strict|Lax|None",
            },
        ),
    }
}

fn session_key(
    mode: BuildMode,
    path: PathBuf,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => Zeroizing::new(bytes),
        Err(source) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "generating a throwaway session key");
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyUnreadable { path, source }),
    };
    if mode == BuildMode::Release && bytes.len() < SESSION_KEY_MIN_LEN {
        return Err(SessionConfigError::KeyTooShort {
            path,
            length: bytes.len(),
        });
    }
    Ok(Key::derive_from(&bytes))
}

/// Resolve the session settings for `mode`.
///
/// # Errors
/// In release builds: any missing or malformed toggle, an unreadable or short
/// key file, an ephemeral key request, or `SameSite=None` without `Secure`.
pub fn session_settings_from(
    settings: &AppSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = flag(
        mode,
        COOKIE_SECURE_SETTING,
        settings.cookie_secure.as_deref(),
        true,
    )?;
    let same_site = same_site(mode, settings.same_site.as_deref(), cookie_secure)?;
    let allow_ephemeral = flag(
        mode,
        ALLOW_EPHEMERAL_SETTING,
        settings.allow_ephemeral.as_deref(),
        false,
    )?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralKeyInRelease);
    }
    let key = session_key(mode, settings.session_key_file(), allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}
