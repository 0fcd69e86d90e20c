//! Server-rendered HTML adapter.
//!
//! Shares [`HttpState`](crate::inbound::http::state::HttpState) and the
//! cookie session with the REST adapter, but answers failures with pages
//! instead of JSON.

pub mod error;
pub mod pages;
mod views;

use actix_web::{HttpRequest, web};

pub use error::{PageError, PageResult};

use crate::domain::Failure;

fn bad_form<E: std::fmt::Display>(err: E, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "rejecting malformed form or query");
    PageError::from(Failure::BadRequest).into()
}

/// Mount every page route at the application root.
///
/// Requires the session middleware and [`HttpState`] app data.
///
/// [`HttpState`]: crate::inbound::http::state::HttpState
pub fn configure_pages(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(bad_form))
        .app_data(web::QueryConfig::default().error_handler(bad_form))
        .service(pages::index)
        .service(pages::login)
        .service(pages::verify_login)
        .service(pages::logout)
        .service(
            web::resource(["/registration", "/register"]).route(web::get().to(pages::registration)),
        )
        .service(pages::save)
        .service(pages::search)
        .service(pages::profile)
        .service(pages::game)
        .service(pages::add_user)
        .service(pages::add_game)
        .service(pages::change_password);
}
