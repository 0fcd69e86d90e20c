//! Internal Diesel row structs.
//!
//! Never exposed to the domain; repositories convert through the `into_*`
//! helpers, which re-run the domain validation on every row read.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::{
    Game, GameId, GameName, GameValidationError, Password, User, UserId, UserValidationError,
    Username,
};

use super::schema::{followers_relation, games, user_game_relation, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, UserValidationError> {
        Ok(User::with_id(
            UserId::new(self.id),
            Username::new(self.username)?,
            Password::new(self.password)?,
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            username: user.username().as_ref(),
            password: user.password().expose(),
        }
    }
}

impl<'a> From<&'a User> for UserUpdate<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            username: user.username().as_ref(),
            password: user.password().expose(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = games)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GameRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
}

impl GameRow {
    pub(crate) fn into_game(self) -> Result<Game, GameValidationError> {
        Ok(
            Game::new(GameName::new(self.name)?, self.description, self.release_date)
                .identified_as(Some(GameId::new(self.id))),
        )
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = games)]
pub(crate) struct GameChanges<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub release_date: NaiveDate,
}

impl<'a> From<&'a Game> for GameChanges<'a> {
    fn from(game: &'a Game) -> Self {
        Self {
            name: game.name().as_ref(),
            description: game.description(),
            release_date: game.release_date(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Insertable)]
#[diesel(table_name = followers_relation)]
pub(crate) struct FollowRow {
    pub user_id: i64,
    pub followed_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Insertable)]
#[diesel(table_name = user_game_relation)]
pub(crate) struct LikeRow {
    pub user_id: i64,
    pub game_id: i64,
}
