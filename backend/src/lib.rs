//! GameNest: a small social catalogue of video games.
//!
//! Users register, log in, follow each other and like games. The crate is
//! laid out hexagonally: [`domain`] holds entities, typed failures and the
//! two services; [`inbound`] adapts HTTP (JSON and HTML) onto the services;
//! [`outbound`] provides the in-memory and PostgreSQL stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
