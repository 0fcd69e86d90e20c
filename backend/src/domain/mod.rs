//! Domain primitives, services and ports.
//!
//! Purpose: hold the catalogue's entities ([`User`], [`Game`]), the typed
//! [`Failure`] taxonomy and the two services that enforce argument checks and
//! keep relationship indexes paired. Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: the transport-agnostic error envelope.
//! - Failure: every failure a service can raise.
//! - UserService / GameService: implementations of the driving ports.

pub mod auth;
pub mod error;
pub mod failure;
pub mod game;
pub mod game_service;
pub mod ports;
pub mod relations;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{ChangePasswordForm, LoginCredentials, RegistrationForm};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::failure::Failure;
pub use self::game::{Game, GameDetails, GameId, GameName, GameValidationError};
pub use self::game_service::GameService;
pub use self::relations::RelationMutation;
pub use self::trace_id::TraceId;
pub use self::user::{
    Password, USERNAME_MAX, User, UserId, UserProfile, UserValidationError, Username,
};
pub use self::user_service::UserService;
