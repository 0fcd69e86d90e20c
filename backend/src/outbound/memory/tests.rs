//! Regression coverage for the in-memory store.

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::GameName;

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new()
}

fn user(name: &str) -> User {
    User::try_from_parts(name, "pwd").expect("fixture user")
}

fn game(name: &str, year: i32) -> Game {
    let date = NaiveDate::from_ymd_opt(year, 6, 1).expect("fixture date");
    Game::new(GameName::new(name).expect("fixture name"), "", date)
}

async fn saved_user(store: &InMemoryStore, name: &str) -> User {
    UserRepository::insert(store, &user(name))
        .await
        .expect("insert user")
}

async fn saved_game(store: &InMemoryStore, name: &str, year: i32) -> Game {
    GameRepository::insert(store, &game(name, year))
        .await
        .expect("insert game")
}

fn id_of(user: &User) -> UserId {
    user.id().expect("stored user")
}

#[rstest]
#[tokio::test]
async fn insert_assigns_sequential_identities(store: InMemoryStore) {
    let first = saved_user(&store, "alice").await;
    let second = saved_user(&store, "bob").await;
    assert_eq!(first.id(), Some(UserId::new(1)));
    assert_eq!(second.id(), Some(UserId::new(2)));
}

#[rstest]
#[tokio::test]
async fn duplicate_username_is_a_conflict(store: InMemoryStore) {
    saved_user(&store, "alice").await;
    let error = UserRepository::insert(&store, &user("alice"))
        .await
        .expect_err("duplicate");
    assert!(matches!(error, UserPersistenceError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn like_search_ignores_case(store: InMemoryStore) {
    saved_user(&store, "UserOne").await;
    saved_user(&store, "another").await;
    let found = store
        .find_by_username_like("userone")
        .await
        .expect("search");
    assert_eq!(found.len(), 1);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_row_returns_none(store: InMemoryStore) {
    let ghost = user("ghost").identified_as(Some(UserId::new(9)));
    let outcome = UserRepository::update(&store, &ghost).await.expect("update");
    assert!(outcome.is_none());
}

#[rstest]
#[tokio::test]
async fn follow_pair_populates_both_indexes(store: InMemoryStore) {
    let alice = saved_user(&store, "alice").await;
    let bob = saved_user(&store, "bob").await;

    store
        .apply_relations(&RelationMutation::follow_pair(id_of(&alice), id_of(&bob)))
        .await
        .expect("follow");
    // Repeating the follow keeps a single edge.
    store
        .apply_relations(&RelationMutation::follow_pair(id_of(&alice), id_of(&bob)))
        .await
        .expect("follow again");

    assert_eq!(
        store.followed_of(id_of(&alice)).await.expect("followed"),
        vec![bob.clone()]
    );
    assert_eq!(
        store.followers_of(id_of(&bob)).await.expect("followers"),
        vec![alice.clone()]
    );
    assert!(store.followers_of(id_of(&alice)).await.expect("none").is_empty());
}

#[rstest]
#[tokio::test]
async fn relations_naming_unknown_rows_apply_nothing(store: InMemoryStore) {
    let alice = saved_user(&store, "alice").await;
    let error = store
        .apply_relations(&RelationMutation::like_pair(id_of(&alice), GameId::new(77)))
        .await
        .expect_err("unknown game");
    assert!(matches!(error, UserPersistenceError::Integrity { .. }));
    assert!(store.games_of(id_of(&alice)).await.expect("games").is_empty());
}

#[rstest]
#[tokio::test]
async fn like_pair_is_visible_from_both_sides(store: InMemoryStore) {
    let alice = saved_user(&store, "alice").await;
    let celeste = saved_game(&store, "Celeste", 2018).await;
    let game_id = celeste.id().expect("stored game");

    store
        .apply_relations(&RelationMutation::like_pair(id_of(&alice), game_id))
        .await
        .expect("like");

    assert_eq!(store.games_of(id_of(&alice)).await.expect("games"), vec![celeste]);
    assert_eq!(store.likers_of(game_id).await.expect("likers"), vec![alice]);
}

#[rstest]
#[tokio::test]
async fn deleting_a_user_drops_its_relationships(store: InMemoryStore) {
    let alice = saved_user(&store, "alice").await;
    let bob = saved_user(&store, "bob").await;
    let celeste = saved_game(&store, "Celeste", 2018).await;
    let game_id = celeste.id().expect("stored game");
    let mut batch = RelationMutation::follow_pair(id_of(&bob), id_of(&alice)).to_vec();
    batch.extend(RelationMutation::like_pair(id_of(&alice), game_id));
    store.apply_relations(&batch).await.expect("relations");

    UserRepository::delete(&store, id_of(&alice))
        .await
        .expect("delete");

    assert!(store.followed_of(id_of(&bob)).await.expect("followed").is_empty());
    assert!(store.likers_of(game_id).await.expect("likers").is_empty());
}

#[rstest]
#[tokio::test]
async fn latest_releases_are_newest_first_and_bounded(store: InMemoryStore) {
    for (name, year) in [("A", 2001), ("B", 2019), ("C", 2010), ("D", 2023), ("E", 1998)] {
        saved_game(&store, name, year).await;
    }

    let latest = store.find_latest_releases(4).await.expect("latest");
    let names: Vec<&str> = latest.iter().map(|g| g.name().as_ref()).collect();
    assert_eq!(names, vec!["D", "B", "C", "A"]);
}

#[rstest]
#[tokio::test]
async fn game_name_conflicts_on_update(store: InMemoryStore) {
    saved_game(&store, "Hades", 2020).await;
    let other = saved_game(&store, "Celeste", 2018).await;
    let renamed = Game::new(
        GameName::new("Hades").expect("name"),
        "",
        other.release_date(),
    )
    .identified_as(other.id());

    let error = GameRepository::update(&store, &renamed)
        .await
        .expect_err("conflict");
    assert!(matches!(error, GamePersistenceError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn a_panicking_holder_does_not_wedge_the_store(store: InMemoryStore) {
    saved_user(&store, "alice").await;
    let store = std::sync::Arc::new(store);

    let holder = std::sync::Arc::clone(&store);
    let outcome = std::thread::spawn(move || {
        let _state = holder.state();
        panic!("holder panicked while locked");
    })
    .join();
    assert!(outcome.is_err());
    assert!(store.state.is_poisoned());

    let bob = saved_user(&store, "bob").await;
    let everyone = UserRepository::find_all(store.as_ref())
        .await
        .expect("store still readable");
    assert_eq!(everyone.len(), 2);
    assert!(everyone.contains(&bob));
}
