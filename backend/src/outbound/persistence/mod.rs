//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user and game repository ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - Repositories only translate between row structs and domain types.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Database failures are mapped onto the persistence error enums; unique
//!   violations surface as conflicts so the services can report taken names.
//!
//! ```ignore
//! use gamenest::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/gamenest")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_game_repository;
mod diesel_helpers;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_game_repository::DieselGameRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
