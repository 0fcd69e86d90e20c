//! `DieselGameRepository` against embedded PostgreSQL.

#[path = "support/pg_embed.rs"]
mod pg_embed;

use chrono::NaiveDate;
use gamenest::domain::ports::{GamePersistenceError, GameRepository, UserRepository};
use gamenest::domain::{Game, GameId, GameName, RelationMutation, User};
use pg_embed::Database;
use rstest::{fixture, rstest};

#[fixture]
fn database() -> Option<Database> {
    pg_embed::database()
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn draft(name: &str, released: NaiveDate) -> Game {
    Game::new(GameName::new(name).expect("valid game name"), "", released)
}

fn saved_game(db: &Database, name: &str, released: NaiveDate) -> Game {
    db.block_on(GameRepository::insert(&db.games(), &draft(name, released)))
        .expect("insert game")
}

fn titles(games: &[Game]) -> Vec<&str> {
    games.iter().map(|game| game.name().as_ref()).collect()
}

#[rstest]
fn latest_releases_break_date_ties_by_newest_row(database: Option<Database>) {
    let Some(db) = database else { return };
    saved_game(&db, "Alpha", day(2019, 5, 1));
    saved_game(&db, "Bravo", day(2021, 3, 9));
    saved_game(&db, "Charlie", day(2021, 3, 9));
    saved_game(&db, "Delta", day(2018, 1, 1));
    let repo = db.games();

    let latest = db.block_on(repo.find_latest_releases(3)).expect("query");
    assert_eq!(titles(&latest), ["Charlie", "Bravo", "Alpha"]);
    let none = db.block_on(repo.find_latest_releases(0)).expect("query");
    assert!(none.is_empty());
    let all = db.block_on(repo.find_latest_releases(10)).expect("query");
    assert_eq!(titles(&all), ["Charlie", "Bravo", "Alpha", "Delta"]);
}

#[rstest]
#[case("zel", &["The Legend of Zelda", "Zelda II"])]
#[case("_", &["Half_Life"])]
#[case("%", &["100% Orange Juice"])]
#[case("portal", &[])]
fn name_search_is_case_insensitive_and_literal(
    database: Option<Database>,
    #[case] fragment: &str,
    #[case] expected: &[&str],
) {
    let Some(db) = database else { return };
    for name in ["The Legend of Zelda", "Zelda II", "Half_Life", "100% Orange Juice"] {
        saved_game(&db, name, day(2000, 1, 1));
    }

    let matches = db
        .block_on(db.games().find_by_name_like(fragment))
        .expect("search");
    assert_eq!(titles(&matches), expected);
}

#[rstest]
fn names_are_unique_across_insert_and_update(database: Option<Database>) {
    let Some(db) = database else { return };
    let celeste = saved_game(&db, "Celeste", day(2018, 1, 25));
    saved_game(&db, "Hades", day(2020, 9, 17));
    let repo = db.games();

    let error = db
        .block_on(GameRepository::insert(&repo, &draft("Celeste", day(2024, 1, 1))))
        .expect_err("duplicate name");
    assert!(matches!(error, GamePersistenceError::Conflict { .. }));

    let clash = draft("Hades", day(2018, 1, 25)).identified_as(celeste.id());
    let error = db
        .block_on(GameRepository::update(&repo, &clash))
        .expect_err("name taken");
    assert!(matches!(error, GamePersistenceError::Conflict { .. }));

    let found = db.block_on(repo.find_by_name("Celeste")).expect("query");
    assert_eq!(found, Some(celeste));
}

#[rstest]
fn update_and_delete_address_rows_by_id(database: Option<Database>) {
    let Some(db) = database else { return };
    let celeste = saved_game(&db, "Celeste", day(2018, 1, 25));
    let repo = db.games();

    let remastered = Game::new(
        GameName::new("Celeste DX").expect("valid game name"),
        "Farewell included",
        day(2019, 9, 9),
    )
    .identified_as(celeste.id());
    let updated = db
        .block_on(GameRepository::update(&repo, &remastered))
        .expect("update");
    assert_eq!(updated, Some(remastered.clone()));
    let id = celeste.id().expect("stored game");
    let stored = db.block_on(repo.find_by_id(id)).expect("query");
    assert_eq!(stored, Some(remastered));

    let ghost = draft("Ghost", day(2000, 1, 1)).identified_as(Some(GameId::new(999_999)));
    let missing = db
        .block_on(GameRepository::update(&repo, &ghost))
        .expect("update");
    assert_eq!(missing, None);

    db.block_on(GameRepository::delete(&repo, id)).expect("delete");
    let gone = db.block_on(repo.find_by_id(id)).expect("query");
    assert_eq!(gone, None);
    let everything = db.block_on(repo.find_all()).expect("query");
    assert!(everything.is_empty());
}

#[rstest]
fn likers_are_listed_in_like_order(database: Option<Database>) {
    let Some(db) = database else { return };
    let celeste = saved_game(&db, "Celeste", day(2018, 1, 25));
    let game_id = celeste.id().expect("stored game");
    let users = db.users();
    let mut likers = Vec::new();
    for name in ["zoe", "adam", "mia"] {
        let user = User::try_from_parts(name, "pwd").expect("valid user");
        likers.push(
            db.block_on(UserRepository::insert(&users, &user))
                .expect("insert user"),
        );
    }

    for liker in likers.iter().rev() {
        let user_id = liker.id().expect("stored user");
        db.block_on(users.apply_relations(&RelationMutation::like_pair(user_id, game_id)))
            .expect("like");
    }

    let listed = db.block_on(db.games().likers_of(game_id)).expect("query");
    let names: Vec<&str> = listed.iter().map(|user| user.username().as_ref()).collect();
    assert_eq!(names, ["mia", "adam", "zoe"]);
}
