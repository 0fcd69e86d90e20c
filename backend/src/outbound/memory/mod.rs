//! In-process store implementing the user and game repository ports.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. All state sits behind one mutex, so a batch of relationship entries
//! is applied atomically with respect to every other repository call.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    GamePersistenceError, GameRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{Game, GameId, RelationMutation, User, UserId};

#[derive(Default)]
struct State {
    users: BTreeMap<UserId, User>,
    games: BTreeMap<GameId, Game>,
    next_user: i64,
    next_game: i64,
    follows: HashMap<UserId, Vec<UserId>>,
    followed_by: HashMap<UserId, Vec<UserId>>,
    likes: HashMap<UserId, Vec<GameId>>,
    liked_by: HashMap<GameId, Vec<UserId>>,
}

fn push_unique<T: PartialEq>(entries: &mut Vec<T>, value: T) {
    if !entries.contains(&value) {
        entries.push(value);
    }
}

fn contains_ignoring_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl State {
    fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users
            .iter()
            .any(|(id, user)| Some(*id) != except && user.username().as_ref() == username)
    }

    fn name_taken(&self, name: &str, except: Option<GameId>) -> bool {
        self.games
            .iter()
            .any(|(id, game)| Some(*id) != except && game.name().as_ref() == name)
    }

    fn users_for(&self, ids: Option<&Vec<UserId>>) -> Vec<User> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.users.get(id).cloned())
            .collect()
    }

    fn missing_reference(&self, mutation: &RelationMutation) -> Option<String> {
        let (users, game) = match *mutation {
            RelationMutation::Follow { user, followed } => ([user, followed], None),
            RelationMutation::FollowedBy { user, follower } => ([user, follower], None),
            RelationMutation::Like { user, game } | RelationMutation::LikedBy { game, user } => {
                ([user, user], Some(game))
            }
        };
        if let Some(id) = users.iter().find(|id| !self.users.contains_key(*id)) {
            return Some(format!("unknown user {id}"));
        }
        game.filter(|id| !self.games.contains_key(id))
            .map(|id| format!("unknown game {id}"))
    }

    fn apply(&mut self, mutation: RelationMutation) {
        match mutation {
            RelationMutation::Follow { user, followed } => {
                push_unique(self.follows.entry(user).or_default(), followed);
            }
            RelationMutation::FollowedBy { user, follower } => {
                push_unique(self.followed_by.entry(user).or_default(), follower);
            }
            RelationMutation::Like { user, game } => {
                push_unique(self.likes.entry(user).or_default(), game);
            }
            RelationMutation::LikedBy { game, user } => {
                push_unique(self.liked_by.entry(game).or_default(), user);
            }
        }
    }

    fn forget_user(&mut self, id: UserId) {
        self.follows.remove(&id);
        self.followed_by.remove(&id);
        self.likes.remove(&id);
        for entries in self.follows.values_mut().chain(self.followed_by.values_mut()) {
            entries.retain(|other| *other != id);
        }
        for entries in self.liked_by.values_mut() {
            entries.retain(|other| *other != id);
        }
    }

    fn forget_game(&mut self, id: GameId) {
        self.liked_by.remove(&id);
        for entries in self.likes.values_mut() {
            entries.retain(|other| *other != id);
        }
    }
}

/// Mutex-guarded store shared by both repository ports.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the shared state. A panic in another holder does not wedge the
    /// store: the poisoned guard is taken over and used as is.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("in-memory store lock poisoned; recovering");
            poisoned.into_inner()
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.state().users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state().users.get(&id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|user| user.username().as_ref() == username)
            .cloned())
    }

    async fn find_by_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|user| {
                user.username().as_ref() == username && user.password().expose() == password
            })
            .cloned())
    }

    async fn find_by_username_like(
        &self,
        fragment: &str,
    ) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .values()
            .filter(|user| contains_ignoring_case(user.username().as_ref(), fragment))
            .cloned()
            .collect())
    }

    async fn insert(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut state = self.state();
        if state.username_taken(user.username().as_ref(), None) {
            return Err(UserPersistenceError::conflict(user.username().as_ref()));
        }
        state.next_user += 1;
        let id = UserId::new(state.next_user);
        let saved = user.clone().identified_as(Some(id));
        state.users.insert(id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError> {
        let id = user
            .id()
            .ok_or_else(|| UserPersistenceError::integrity("update requires an identity"))?;
        let mut state = self.state();
        if !state.users.contains_key(&id) {
            return Ok(None);
        }
        if state.username_taken(user.username().as_ref(), Some(id)) {
            return Err(UserPersistenceError::conflict(user.username().as_ref()));
        }
        state.users.insert(id, user.clone());
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        let mut state = self.state();
        state.users.remove(&id);
        state.forget_user(id);
        Ok(())
    }

    async fn apply_relations(
        &self,
        mutations: &[RelationMutation],
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.state();
        if let Some(problem) = mutations.iter().find_map(|m| state.missing_reference(m)) {
            return Err(UserPersistenceError::integrity(problem));
        }
        for mutation in mutations {
            state.apply(*mutation);
        }
        Ok(())
    }

    async fn followed_of(&self, id: UserId) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.state();
        Ok(state.users_for(state.follows.get(&id)))
    }

    async fn followers_of(&self, id: UserId) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.state();
        Ok(state.users_for(state.followed_by.get(&id)))
    }

    async fn games_of(&self, id: UserId) -> Result<Vec<Game>, UserPersistenceError> {
        let state = self.state();
        Ok(state
            .likes
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|game| state.games.get(game).cloned())
            .collect())
    }
}

#[async_trait]
impl GameRepository for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Game>, GamePersistenceError> {
        Ok(self.state().games.values().cloned().collect())
    }

    async fn find_by_id(&self, id: GameId) -> Result<Option<Game>, GamePersistenceError> {
        Ok(self.state().games.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Game>, GamePersistenceError> {
        Ok(self
            .state()
            .games
            .values()
            .find(|game| game.name().as_ref() == name)
            .cloned())
    }

    async fn find_by_name_like(&self, fragment: &str) -> Result<Vec<Game>, GamePersistenceError> {
        Ok(self
            .state()
            .games
            .values()
            .filter(|game| contains_ignoring_case(game.name().as_ref(), fragment))
            .cloned()
            .collect())
    }

    async fn find_latest_releases(&self, count: usize) -> Result<Vec<Game>, GamePersistenceError> {
        let state = self.state();
        let mut games: Vec<Game> = state.games.values().cloned().collect();
        games.sort_by(|a, b| {
            b.release_date()
                .cmp(&a.release_date())
                .then_with(|| b.id().cmp(&a.id()))
        });
        games.truncate(count);
        Ok(games)
    }

    async fn insert(&self, game: &Game) -> Result<Game, GamePersistenceError> {
        let mut state = self.state();
        if state.name_taken(game.name().as_ref(), None) {
            return Err(GamePersistenceError::conflict(game.name().as_ref()));
        }
        state.next_game += 1;
        let id = GameId::new(state.next_game);
        let saved = game.clone().identified_as(Some(id));
        state.games.insert(id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, game: &Game) -> Result<Option<Game>, GamePersistenceError> {
        let id = game
            .id()
            .ok_or_else(|| GamePersistenceError::integrity("update requires an identity"))?;
        let mut state = self.state();
        if !state.games.contains_key(&id) {
            return Ok(None);
        }
        if state.name_taken(game.name().as_ref(), Some(id)) {
            return Err(GamePersistenceError::conflict(game.name().as_ref()));
        }
        state.games.insert(id, game.clone());
        Ok(Some(game.clone()))
    }

    async fn delete(&self, id: GameId) -> Result<(), GamePersistenceError> {
        let mut state = self.state();
        state.games.remove(&id);
        state.forget_game(id);
        Ok(())
    }

    async fn likers_of(&self, id: GameId) -> Result<Vec<User>, GamePersistenceError> {
        let state = self.state();
        Ok(state.users_for(state.liked_by.get(&id)))
    }
}

#[cfg(test)]
mod tests;
