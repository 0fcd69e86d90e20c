//! PostgreSQL-backed `GameRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GamePersistenceError, GameRepository};
use crate::domain::{Game, GameId, User};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_helpers::{collect_rows, contains_pattern, invalid_row};
use super::models::{GameChanges, GameRow, UserRow};
use super::pool::DbPool;
use super::schema::{games, user_game_relation, users};

/// Diesel-backed implementation of the [`GameRepository`] port.
#[derive(Clone)]
pub struct DieselGameRepository {
    pool: DbPool,
}

impl DieselGameRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn optional_game(row: Option<GameRow>) -> Result<Option<Game>, GamePersistenceError> {
    row.map(|row| row.into_game().map_err(|err| invalid_row(&err)))
        .transpose()
}

fn row_limit(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[async_trait]
impl GameRepository for DieselGameRepository {
    async fn find_all(&self) -> Result<Vec<Game>, GamePersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let rows: Vec<GameRow> = games::table
            .select(GameRow::as_select())
            .order_by(games::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, GameRow::into_game)
    }

    async fn find_by_id(&self, id: GameId) -> Result<Option<Game>, GamePersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let row: Option<GameRow> = games::table
            .find(id.get())
            .select(GameRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        optional_game(row)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Game>, GamePersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let row: Option<GameRow> = games::table
            .filter(games::name.eq(name))
            .select(GameRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        optional_game(row)
    }

    async fn find_by_name_like(&self, fragment: &str) -> Result<Vec<Game>, GamePersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let rows: Vec<GameRow> = games::table
            .filter(games::name.ilike(contains_pattern(fragment)))
            .select(GameRow::as_select())
            .order_by(games::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, GameRow::into_game)
    }

    async fn find_latest_releases(&self, count: usize) -> Result<Vec<Game>, GamePersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let rows: Vec<GameRow> = games::table
            .select(GameRow::as_select())
            .order_by((games::release_date.desc(), games::id.desc()))
            .limit(row_limit(count))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, GameRow::into_game)
    }

    async fn insert(&self, game: &Game) -> Result<Game, GamePersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let row: GameRow = diesel::insert_into(games::table)
            .values(GameChanges::from(game))
            .returning(GameRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_game().map_err(|err| invalid_row(&err))
    }

    async fn update(&self, game: &Game) -> Result<Option<Game>, GamePersistenceError> {
        let id = game
            .id()
            .ok_or_else(|| GamePersistenceError::integrity("update requires an identity"))?;
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let row: Option<GameRow> = diesel::update(games::table.find(id.get()))
            .set(GameChanges::from(game))
            .returning(GameRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        optional_game(row)
    }

    async fn delete(&self, id: GameId) -> Result<(), GamePersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        diesel::delete(games::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn likers_of(&self, id: GameId) -> Result<Vec<User>, GamePersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = user_game_relation::table
            .inner_join(users::table.on(users::id.eq(user_game_relation::user_id)))
            .filter(user_game_relation::game_id.eq(id.get()))
            .order_by(user_game_relation::id)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, UserRow::into_user)
    }
}
