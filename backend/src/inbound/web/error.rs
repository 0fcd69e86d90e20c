//! Failure-to-page translation for the HTML surface.
//!
//! Each [`Failure`] renders exactly one view, with the same status code the
//! JSON surface uses for it.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::{debug, error};

use super::pages::html;
use super::views;
use crate::domain::Failure;
use crate::inbound::http::error::status_for;

/// A failure raised while serving a page.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct PageError(#[from] Failure);

impl PageError {
    /// Domain failure behind this page error.
    pub fn failure(&self) -> &Failure {
        &self.0
    }

    fn body(&self) -> String {
        let text = self.0.to_string();
        match &self.0 {
            Failure::LoginFailed => views::login(&text, false),
            Failure::UsernameRequired
            | Failure::PasswordRequired
            | Failure::PasswordsDoNotMatch
            | Failure::InvalidUserData
            | Failure::UsernameAlreadyExisting => views::registration(&text, false),
            Failure::OldPasswordError | Failure::NewPasswordRequired => {
                views::password_error(&text)
            }
            Failure::UserNotFound => views::not_found("profile404", views::PROFILE_NOT_FOUND),
            Failure::GameNotFound => views::not_found("game404", views::GAME_NOT_FOUND),
            Failure::UnauthorizedOperation => views::unauthorized(&text),
            Failure::InvalidArgument { .. }
            | Failure::BadRequest
            | Failure::GameAlreadyExisting
            | Failure::Unavailable { .. }
            | Failure::Internal { .. } => views::error(&text),
        }
    }
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        status_for(self.0.code())
    }

    fn error_response(&self) -> HttpResponse {
        match &self.0 {
            Failure::Unavailable { message } | Failure::Internal { message } => {
                error!(error = %message, "page request failed");
            }
            other => debug!(failure = %other, "rendering failure page"),
        }
        html(self.status_code(), self.body())
    }
}

/// Result alias for page handlers.
pub type PageResult<T> = Result<T, PageError>;

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Failure::LoginFailed, StatusCode::UNAUTHORIZED, "login", "Invalid username or password.")]
    #[case(
        Failure::UsernameAlreadyExisting,
        StatusCode::CONFLICT,
        "registration",
        "Username already existing. Please choose another one."
    )]
    #[case(Failure::PasswordRequired, StatusCode::BAD_REQUEST, "registration", "Password is required.")]
    #[case(Failure::InvalidUserData, StatusCode::BAD_REQUEST, "registration", "Username or password invalid.")]
    #[case(Failure::OldPasswordError, StatusCode::BAD_REQUEST, "passwordError", "Old password do not match.")]
    #[case(Failure::NewPasswordRequired, StatusCode::BAD_REQUEST, "passwordError", "Password is required.")]
    #[case(Failure::UserNotFound, StatusCode::NOT_FOUND, "profile404", "Profile not found.")]
    #[case(Failure::GameNotFound, StatusCode::NOT_FOUND, "game404", "Game not found.")]
    #[case(
        Failure::UnauthorizedOperation,
        StatusCode::UNAUTHORIZED,
        "unauthorized401",
        "Unauthorized Operation. You are not logged in!"
    )]
    #[case(Failure::BadRequest, StatusCode::BAD_REQUEST, "error", "Bad Request")]
    #[case(Failure::internal("disk on fire"), StatusCode::INTERNAL_SERVER_ERROR, "error", "Internal server error")]
    #[actix_web::test]
    async fn failures_render_one_view(
        #[case] failure: Failure,
        #[case] status: StatusCode,
        #[case] view: &str,
        #[case] message: &str,
    ) {
        let response = PageError::from(failure).error_response();
        assert_eq!(response.status(), status);
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let page = String::from_utf8(bytes.to_vec()).expect("utf8 page");
        assert!(page.contains(&format!("data-view=\"{view}\"")), "{page}");
        assert!(page.contains(&views::escape(message)), "{page}");
        assert!(!page.contains("disk on fire"));
    }
}
