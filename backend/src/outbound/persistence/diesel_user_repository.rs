//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Follow and like edges live in `followers_relation` and
//! `user_game_relation`. A single row serves both directions of an edge, so
//! the forward and inverse entries of a [`RelationMutation`] pair resolve to
//! the same insert and the second one is a no-op.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Game, RelationMutation, User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_helpers::{collect_rows, contains_pattern, invalid_row};
use super::models::{FollowRow, GameRow, LikeRow, NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::{followers_relation, games, user_game_relation, users};

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row.into_user().map_err(|err| invalid_row(&err))
}

fn optional_user(row: Option<UserRow>) -> Result<Option<User>, UserPersistenceError> {
    row.map(row_to_user).transpose()
}

enum EdgeRow {
    Follow(FollowRow),
    Like(LikeRow),
}

fn edge_row(mutation: RelationMutation) -> EdgeRow {
    match mutation {
        RelationMutation::Follow { user, followed } => EdgeRow::Follow(FollowRow {
            user_id: user.get(),
            followed_id: followed.get(),
        }),
        RelationMutation::FollowedBy { user, follower } => EdgeRow::Follow(FollowRow {
            user_id: follower.get(),
            followed_id: user.get(),
        }),
        RelationMutation::Like { user, game } | RelationMutation::LikedBy { game, user } => {
            EdgeRow::Like(LikeRow {
                user_id: user.get(),
                game_id: game.get(),
            })
        }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by(users::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, UserRow::into_user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        optional_user(row)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        optional_user(row)
    }

    async fn find_by_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .filter(users::password.eq(password))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        optional_user(row)
    }

    async fn find_by_username_like(
        &self,
        fragment: &str,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::username.ilike(contains_pattern(fragment)))
            .select(UserRow::as_select())
            .order_by(users::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, UserRow::into_user)
    }

    async fn insert(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(row)
    }

    async fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError> {
        let id = user
            .id()
            .ok_or_else(|| UserPersistenceError::integrity("update requires an identity"))?;
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.find(id.get()))
            .set(UserUpdate::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        optional_user(row)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        // Relationship rows go with the user through ON DELETE CASCADE.
        diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn apply_relations(
        &self,
        mutations: &[RelationMutation],
    ) -> Result<(), UserPersistenceError> {
        let edges: Vec<EdgeRow> = mutations.iter().copied().map(edge_row).collect();
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                for edge in &edges {
                    match edge {
                        EdgeRow::Follow(row) => {
                            diesel::insert_into(followers_relation::table)
                                .values(row)
                                .on_conflict_do_nothing()
                                .execute(conn)
                                .await?;
                        }
                        EdgeRow::Like(row) => {
                            diesel::insert_into(user_game_relation::table)
                                .values(row)
                                .on_conflict_do_nothing()
                                .execute(conn)
                                .await?;
                        }
                    }
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn followed_of(&self, id: UserId) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = followers_relation::table
            .inner_join(users::table.on(users::id.eq(followers_relation::followed_id)))
            .filter(followers_relation::user_id.eq(id.get()))
            .order_by(followers_relation::id)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, UserRow::into_user)
    }

    async fn followers_of(&self, id: UserId) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = followers_relation::table
            .inner_join(users::table.on(users::id.eq(followers_relation::user_id)))
            .filter(followers_relation::followed_id.eq(id.get()))
            .order_by(followers_relation::id)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, UserRow::into_user)
    }

    async fn games_of(&self, id: UserId) -> Result<Vec<Game>, UserPersistenceError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let rows: Vec<GameRow> = user_game_relation::table
            .inner_join(games::table.on(games::id.eq(user_game_relation::game_id)))
            .filter(user_game_relation::user_id.eq(id.get()))
            .order_by(user_game_relation::id)
            .select(GameRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, GameRow::into_game)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for edge row translation.
    use rstest::rstest;

    use super::*;
    use crate::domain::GameId;

    fn follow(edge: EdgeRow) -> FollowRow {
        match edge {
            EdgeRow::Follow(row) => row,
            EdgeRow::Like(_) => panic!("expected a follow row"),
        }
    }

    fn like(edge: EdgeRow) -> LikeRow {
        match edge {
            EdgeRow::Like(row) => row,
            EdgeRow::Follow(_) => panic!("expected a like row"),
        }
    }

    #[rstest]
    fn follow_pair_collapses_to_one_row() {
        let [forward, inverse] = RelationMutation::follow_pair(UserId::new(1), UserId::new(2));
        let expected = FollowRow {
            user_id: 1,
            followed_id: 2,
        };
        assert_eq!(follow(edge_row(forward)), expected);
        assert_eq!(follow(edge_row(inverse)), expected);
    }

    #[rstest]
    fn like_pair_collapses_to_one_row() {
        let [forward, inverse] = RelationMutation::like_pair(UserId::new(3), GameId::new(9));
        let expected = LikeRow {
            user_id: 3,
            game_id: 9,
        };
        assert_eq!(like(edge_row(forward)), expected);
        assert_eq!(like(edge_row(inverse)), expected);
    }
}
