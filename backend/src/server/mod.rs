//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::{build_http_state, seed_demo_games};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use gamenest::Trace;
#[cfg(debug_assertions)]
use gamenest::doc::ApiDoc;
use gamenest::inbound::http::configure_api;
use gamenest::inbound::http::health::{HealthState, live, ready};
use gamenest::inbound::http::session::session_middleware;
use gamenest::inbound::http::session_config::SessionSettings;
use gamenest::inbound::http::state::HttpState;
use gamenest::inbound::web::configure_pages;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session_middleware(
            session.key,
            session.cookie_secure,
            session.same_site,
        ))
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(configure_api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Pages own "/" and must be registered last.
    app.configure(configure_pages)
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when seeding the catalogue or binding the
/// socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    if config.seed_demo_games {
        seed_demo_games(http_state.games.as_ref())
            .await
            .map_err(|err| std::io::Error::other(format!("seeding demo games failed: {err}")))?;
    }

    let ServerConfig { session, bind_addr, .. } = config;

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session: session.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "gamenest listening");
    health_state.mark_ready();
    Ok(server)
}
