//! Game catalogue model.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::User;

/// Validation errors returned by [`GameName::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameValidationError {
    #[error("game name must not be empty")]
    EmptyName,
}

/// Server-assigned game identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(i64);

impl GameId {
    /// Wrap a raw store identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier as stored.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-blank catalogue title, unique across games.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameName(String);

impl GameName {
    /// Validate a raw title; blank titles are rejected.
    pub fn new(raw: impl Into<String>) -> Result<Self, GameValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(GameValidationError::EmptyName);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for GameName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<GameName> for String {
    fn from(value: GameName) -> Self {
        value.0
    }
}

impl TryFrom<String> for GameName {
    type Error = GameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A game in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    id: Option<GameId>,
    name: GameName,
    description: String,
    release_date: NaiveDate,
}

impl Game {
    /// Build an unsaved game.
    pub fn new(name: GameName, description: impl Into<String>, release_date: NaiveDate) -> Self {
        Self {
            id: None,
            name,
            description: description.into(),
            release_date,
        }
    }

    /// Store identity; `None` until the game is saved.
    pub fn id(&self) -> Option<GameId> {
        self.id
    }

    /// Unique title.
    pub fn name(&self) -> &GameName {
        &self.name
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Day of first release.
    pub fn release_date(&self) -> NaiveDate {
        self.release_date
    }

    /// Replace the identity, returning the updated record.
    #[must_use]
    pub fn identified_as(mut self, id: Option<GameId>) -> Self {
        self.id = id;
        self
    }
}

/// A game together with the users who like it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDetails {
    pub game: Game,
    pub likers: Vec<User>,
}

impl GameDetails {
    /// Whether the given user already likes this game.
    pub fn is_liked_by(&self, user: super::UserId) -> bool {
        self.likers.iter().any(|liker| liker.id() == Some(user))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case(" \t")]
    fn blank_names_are_rejected(#[case] raw: &str) {
        assert_eq!(GameName::new(raw), Err(GameValidationError::EmptyName));
    }

    #[rstest]
    fn identified_as_overwrites_identity() {
        let date = NaiveDate::from_ymd_opt(2017, 3, 3).expect("valid date");
        let game = Game::new(GameName::new("Zelda").expect("name"), "", date)
            .identified_as(Some(GameId::new(9)));
        assert_eq!(game.id(), Some(GameId::new(9)));
        assert_eq!(game.identified_as(None).id(), None);
    }
}
