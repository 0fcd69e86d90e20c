//! User data model.
//!
//! A [`User`] is a plain record: identity, username and password. Follow and
//! like relationships are not embedded; they live in the repository's index
//! tables and are surfaced through [`UserProfile`].

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::Game;

/// Maximum username length accepted by the store.
pub const USERNAME_MAX: usize = 40;

/// Validation errors returned by the user newtype constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Username was blank after trimming.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeded [`USERNAME_MAX`] characters.
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Server-assigned user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw store identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier as stored.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique login name.
///
/// ## Invariants
/// - Not blank.
/// - At most [`USERNAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if raw.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-blank password, compared verbatim at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and construct a [`Password`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.trim().is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(raw))
    }

    /// Expose the secret for comparison or storage.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Application user.
///
/// Equality covers identity, username and password only.
///
/// # Examples
/// ```
/// use gamenest::domain::{Password, User, Username};
///
/// let user = User::new(
///     Username::new("alice").unwrap(),
///     Password::new("pwd").unwrap(),
/// );
/// assert!(user.id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: Option<UserId>,
    username: Username,
    password: Password,
}

impl User {
    /// Build an unsaved user.
    pub fn new(username: Username, password: Password) -> Self {
        Self {
            id: None,
            username,
            password,
        }
    }

    /// Rehydrate a stored user.
    pub fn with_id(id: UserId, username: Username, password: Password) -> Self {
        Self {
            id: Some(id),
            username,
            password,
        }
    }

    /// Validate raw strings into a user.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, UserValidationError> {
        Ok(Self::new(Username::new(username)?, Password::new(password)?))
    }

    /// Store identity; `None` until the user is saved.
    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    /// Login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Stored password, compared verbatim on login.
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Replace the identity, returning the updated record.
    #[must_use]
    pub fn identified_as(mut self, id: Option<UserId>) -> Self {
        self.id = id;
        self
    }

    /// Replace the password, returning the updated record.
    #[must_use]
    pub fn with_password(mut self, password: Password) -> Self {
        self.password = password;
        self
    }
}

/// A user together with both sides of their relationships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// The profile's owner.
    pub user: User,
    /// Users this user follows, in follow order.
    pub followed: Vec<User>,
    /// Users following this user, in follow order.
    pub followers: Vec<User>,
    /// Games this user likes, in like order.
    pub games: Vec<Game>,
}

impl UserProfile {
    /// Whether `other` appears among the users this profile follows.
    pub fn follows(&self, other: UserId) -> bool {
        self.followed.iter().any(|user| user.id() == Some(other))
    }
}
