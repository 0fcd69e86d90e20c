//! Typed failures raised by the catalogue services.
//!
//! Every variant maps to exactly one [`ErrorCode`] and one client-facing
//! message. Adapters never inspect the message text; they switch on the
//! variant (HTML views) or on the derived [`Error`] (JSON).

use super::{Error, ErrorCode};

/// Failure raised by [`UserService`](super::UserService) and
/// [`GameService`](super::GameService).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// A required argument was absent or blank.
    #[error("{message}")]
    InvalidArgument { message: String },
    /// Generic malformed request, e.g. a missing path segment.
    #[error("Bad Request")]
    BadRequest,
    #[error("User Not Found")]
    UserNotFound,
    #[error("Game Not Found")]
    GameNotFound,
    #[error("Username is required.")]
    UsernameRequired,
    #[error("Password is required.")]
    PasswordRequired,
    /// Blank replacement password on a password change.
    #[error("Password is required.")]
    NewPasswordRequired,
    #[error("Password and Confirm Password must match.")]
    PasswordsDoNotMatch,
    /// The store rejected the user row for a reason other than uniqueness.
    #[error("Username or password invalid.")]
    InvalidUserData,
    #[error("Username already existing. Please choose another one.")]
    UsernameAlreadyExisting,
    #[error("Game already existing.")]
    GameAlreadyExisting,
    #[error("Invalid username or password.")]
    LoginFailed,
    #[error("Old password do not match.")]
    OldPasswordError,
    #[error("Unauthorized Operation. You are not logged in!")]
    UnauthorizedOperation,
    /// The backing store could not be reached.
    #[error("Service temporarily unavailable")]
    Unavailable { message: String },
    /// Unexpected store failure; `message` is logged, never shown.
    #[error("Internal server error")]
    Internal { message: String },
}

impl Failure {
    /// Build an [`Failure::InvalidArgument`] with the given message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Build an [`Failure::Unavailable`] carrying the adapter's diagnostic.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Build an [`Failure::Internal`] carrying the adapter's diagnostic.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Error category this failure belongs to.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument { .. }
            | Self::BadRequest
            | Self::UsernameRequired
            | Self::PasswordRequired
            | Self::NewPasswordRequired
            | Self::PasswordsDoNotMatch
            | Self::InvalidUserData
            | Self::OldPasswordError => ErrorCode::InvalidRequest,
            Self::UserNotFound | Self::GameNotFound => ErrorCode::NotFound,
            Self::UsernameAlreadyExisting | Self::GameAlreadyExisting => ErrorCode::Conflict,
            Self::LoginFailed | Self::UnauthorizedOperation => ErrorCode::Unauthorized,
            Self::Unavailable { .. } => ErrorCode::ServiceUnavailable,
            Self::Internal { .. } => ErrorCode::InternalError,
        }
    }
}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        match &failure {
            Failure::Unavailable { message } | Failure::Internal { message } => {
                tracing::error!(error = %message, code = ?failure.code(), "store failure");
            }
            _ => {}
        }
        Self::new(failure.code(), failure.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Failure::UserNotFound, ErrorCode::NotFound, "User Not Found")]
    #[case(Failure::GameNotFound, ErrorCode::NotFound, "Game Not Found")]
    #[case(Failure::BadRequest, ErrorCode::InvalidRequest, "Bad Request")]
    #[case(
        Failure::UsernameRequired,
        ErrorCode::InvalidRequest,
        "Username is required."
    )]
    #[case(
        Failure::PasswordRequired,
        ErrorCode::InvalidRequest,
        "Password is required."
    )]
    #[case(
        Failure::NewPasswordRequired,
        ErrorCode::InvalidRequest,
        "Password is required."
    )]
    #[case(
        Failure::PasswordsDoNotMatch,
        ErrorCode::InvalidRequest,
        "Password and Confirm Password must match."
    )]
    #[case(
        Failure::UsernameAlreadyExisting,
        ErrorCode::Conflict,
        "Username already existing. Please choose another one."
    )]
    #[case(
        Failure::LoginFailed,
        ErrorCode::Unauthorized,
        "Invalid username or password."
    )]
    #[case(
        Failure::OldPasswordError,
        ErrorCode::InvalidRequest,
        "Old password do not match."
    )]
    #[case(
        Failure::UnauthorizedOperation,
        ErrorCode::Unauthorized,
        "Unauthorized Operation. You are not logged in!"
    )]
    #[case(
        Failure::invalid_argument("id must be provided"),
        ErrorCode::InvalidRequest,
        "id must be provided"
    )]
    fn translates_to_one_code_and_message(
        #[case] failure: Failure,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        let error = Error::from(failure);
        assert_eq!(error.code(), code);
        assert_eq!(error.message(), message);
    }

    #[rstest]
    #[case(Failure::internal("relation \"users\" does not exist"))]
    #[case(Failure::unavailable("connection refused"))]
    fn store_diagnostics_never_reach_the_message(#[case] failure: Failure) {
        let error = Error::from(failure);
        assert!(!error.message().contains("users"));
        assert!(!error.message().contains("refused"));
    }
}
