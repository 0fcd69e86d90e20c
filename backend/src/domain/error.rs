//! Wire envelope for failures.
//!
//! Services raise [`Failure`](super::Failure); adapters convert it into an
//! [`Error`] before it leaves the process. The envelope carries a category,
//! the client-facing message and the request's trace id when one is in scope.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TraceId;

/// Response header echoing the request's trace id.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Failure category, serialised in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Missing, blank or malformed input.
    InvalidRequest,
    /// Bad credentials or no logged-in user.
    Unauthorized,
    /// Unknown user or game.
    NotFound,
    /// Username or game name already taken.
    Conflict,
    /// The store cannot be reached.
    ServiceUnavailable,
    /// Anything else.
    InternalError,
}

impl ErrorCode {
    /// Whether the fault lies with the server rather than the caller.
    pub fn is_server_fault(self) -> bool {
        matches!(self, Self::ServiceUnavailable | Self::InternalError)
    }
}

/// Error payload rendered by the JSON API.
///
/// # Examples
/// ```
/// use gamenest::domain::{Error, ErrorCode, Failure};
///
/// let err = Error::from(Failure::UserNotFound);
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "User Not Found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Error {
    #[schema(example = "not_found")]
    code: ErrorCode,
    #[schema(example = "User Not Found")]
    message: String,
    /// Trace id of the request that failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl Error {
    /// Build an error stamped with the trace id in scope, if any.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Category of the failure.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Trace id of the request that failed, when one was in scope.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}
