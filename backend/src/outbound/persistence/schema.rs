//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after a migration changes a table.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        /// Unique, at most 40 characters.
        username -> Varchar,
        password -> Varchar,
    }
}

diesel::table! {
    /// Catalogue entries.
    games (id) {
        id -> Int8,
        name -> Varchar,
        description -> Text,
        release_date -> Date,
    }
}

diesel::table! {
    /// One row per follow edge; `id` preserves insertion order.
    followers_relation (id) {
        id -> Int8,
        user_id -> Int8,
        followed_id -> Int8,
    }
}

diesel::table! {
    /// One row per like edge; `id` preserves insertion order.
    user_game_relation (id) {
        id -> Int8,
        user_id -> Int8,
        game_id -> Int8,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, games, followers_relation, user_game_relation);
