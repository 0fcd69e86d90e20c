//! Domain ports for the hexagonal boundary.
//!
//! Driven ports ([`UserRepository`], [`GameRepository`]) are implemented by
//! outbound adapters. Driving ports ([`UserDirectory`], [`GameCatalogue`]) are
//! implemented by the domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_persistence_error;

mod game_catalogue;
mod game_repository;
mod user_directory;
mod user_repository;

pub use game_catalogue::GameCatalogue;
#[cfg(test)]
pub use game_catalogue::MockGameCatalogue;
pub use game_repository::{GamePersistenceError, GameRepository};
#[cfg(test)]
pub use game_repository::MockGameRepository;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
