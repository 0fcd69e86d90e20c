//! OpenAPI documentation for the REST surface.
//!
//! Registers every `/api` handler and the health probes. Swagger UI serves
//! the document at `/docs` in debug builds. The HTML pages are not part of
//! the document.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::games::GameResponse;
use crate::inbound::http::users::{CredentialsRequest, UserResponse, UserUpdateRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "GameNest API",
        description = "Users, follows and liked games for the GameNest catalogue."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user_by_id,
        crate::inbound::http::users::get_user_by_username,
        crate::inbound::http::users::get_users_by_username_like,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::replace_user,
        crate::inbound::http::users::update_user_password,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::games::list_games,
        crate::inbound::http::games::get_game_by_id,
        crate::inbound::http::games::get_game_by_name,
        crate::inbound::http::games::get_games_by_name_like,
        crate::inbound::http::games::latest_games,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserResponse,
        CredentialsRequest,
        UserUpdateRequest,
        GameResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "users", description = "Registration, lookup and account changes"),
        (name = "games", description = "Read-only game catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        match components.schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    #[case("Error", &["code", "message"])]
    #[case("UserResponse", &["id", "username"])]
    #[case("GameResponse", &["id", "name", "description", "releaseDate"])]
    #[case("UserUpdateRequest", &["credentials", "userToUpdate"])]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let present = schema_fields(name);
        for field in fields {
            assert!(present.iter().any(|p| p == field), "{name} lacks {field}");
        }
    }

    #[rstest]
    fn user_schema_never_mentions_passwords() {
        assert!(!schema_fields("UserResponse").iter().any(|f| f == "password"));
    }

    #[rstest]
    #[case("/api/users/update/{id}")]
    #[case("/api/games/latest/{count}")]
    #[case("/health/ready")]
    fn paths_are_documented(#[case] path: &str) {
        assert!(ApiDoc::openapi().paths.paths.contains_key(path));
    }
}
