//! Users REST handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/id/{id}
//! GET    /api/users/username/{name}
//! GET    /api/users/usernamelike/{fragment}
//! POST   /api/users/new                {"username":"alice","password":"pwd"}
//! PUT    /api/users/update/{id}        {"credentials":{..},"userToUpdate":{..}}
//! PATCH  /api/users/update/{id}        {"credentials":{..},"userToUpdate":{"password":".."}}
//! DELETE /api/users/delete/{id}        {"username":"alice","password":"pwd"}
//! ```
//!
//! Mutating endpoints authenticate with the credentials carried in the body,
//! not with the session cookie.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Error, Failure, Password, User, UserId, UserValidationError, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// User as exposed over JSON. The password never leaves the server.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Option<i64>,
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().map(UserId::get),
            username: user.username().to_string(),
        }
    }
}

fn user_list(users: &[User]) -> Vec<UserResponse> {
    users.iter().map(UserResponse::from).collect()
}

/// Username and password pair, used both for sign-up and authentication.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsRequest {
    fn into_user(self) -> Result<User, Failure> {
        let username = Username::new(self.username).map_err(validation_failure)?;
        let password = Password::new(self.password).map_err(validation_failure)?;
        Ok(User::new(username, password))
    }
}

fn validation_failure(error: UserValidationError) -> Failure {
    match error {
        UserValidationError::EmptyUsername => Failure::UsernameRequired,
        UserValidationError::EmptyPassword => Failure::PasswordRequired,
        UserValidationError::UsernameTooLong { .. } => Failure::InvalidUserData,
    }
}

/// Body of `PUT`/`PATCH /api/users/update/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    pub credentials: CredentialsRequest,
    pub user_to_update: CredentialsRequest,
}

/// Parse a numeric id path segment; anything else is a bad request.
pub(crate) fn parse_id(raw: &str) -> Result<i64, Failure> {
    raw.trim().parse::<i64>().map_err(|_| {
        debug!(segment = raw, "rejecting non-numeric id");
        Failure::BadRequest
    })
}

/// Authenticate the body credentials and check they own `target`.
async fn authorise(
    state: &HttpState,
    credentials: &CredentialsRequest,
    target: UserId,
) -> Result<User, Failure> {
    let user = state
        .users
        .verify_login(&credentials.username, &credentials.password)
        .await?;
    if user.id() != Some(target) {
        debug!(authenticated = ?user.id(), %target, "credentials do not own the target user");
        return Err(Failure::BadRequest);
    }
    Ok(user)
}

/// List every registered user.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.get_all_users().await?;
    Ok(web::Json(user_list(&users)))
}

/// Fetch a user by numeric id.
#[utoipa::path(
    get,
    path = "/api/users/id/{id}",
    params(("id" = String, Path, description = "Numeric user id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserById"
)]
#[get("/users/id/{id}")]
pub async fn get_user_by_id(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::new(parse_id(&path)?);
    let user = state.users.get_user_by_id(Some(id)).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Fetch a user by exact username.
#[utoipa::path(
    get,
    path = "/api/users/username/{name}",
    params(("name" = String, Path)),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserByUsername"
)]
#[get("/users/username/{name}")]
pub async fn get_user_by_username(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users.get_user_by_username(&path).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Case-insensitive username search.
#[utoipa::path(
    get,
    path = "/api/users/usernamelike/{fragment}",
    params(("fragment" = String, Path)),
    responses(
        (status = 200, description = "Matching users, possibly none", body = [UserResponse]),
        (status = 400, description = "Blank fragment", body = Error)
    ),
    tags = ["users"],
    operation_id = "searchUsers"
)]
#[get("/users/usernamelike/{fragment}")]
pub async fn get_users_by_username_like(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.get_users_by_username_like(&path).await?;
    Ok(web::Json(user_list(&users)))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/users/new",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Created user", body = UserResponse),
        (status = 400, description = "Missing username or password", body = Error),
        (status = 409, description = "Username taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users/new")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let candidate = payload.into_inner().into_user()?;
    let user = state.users.insert_new_user(candidate).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Replace a user's username and password.
#[utoipa::path(
    put,
    path = "/api/users/update/{id}",
    params(("id" = String, Path, description = "Numeric user id")),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Malformed request or foreign id", body = Error),
        (status = 401, description = "Login failed", body = Error),
        (status = 409, description = "Username taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "replaceUser"
)]
#[put("/users/update/{id}")]
pub async fn replace_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserUpdateRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::new(parse_id(&path)?);
    let UserUpdateRequest {
        credentials,
        user_to_update,
    } = payload.into_inner();
    authorise(&state, &credentials, id).await?;
    let replacement = user_to_update.into_user()?;
    let user = state.users.update_user_by_id(Some(id), replacement).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Change only a user's password.
#[utoipa::path(
    patch,
    path = "/api/users/update/{id}",
    params(("id" = String, Path, description = "Numeric user id")),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Malformed request or foreign id", body = Error),
        (status = 401, description = "Login failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUserPassword"
)]
#[patch("/users/update/{id}")]
pub async fn update_user_password(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserUpdateRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::new(parse_id(&path)?);
    let UserUpdateRequest {
        credentials,
        user_to_update,
    } = payload.into_inner();
    authorise(&state, &credentials, id).await?;
    let user = state
        .users
        .update_password_by_id(Some(id), &user_to_update.password)
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Delete the authenticated user's own account.
#[utoipa::path(
    delete,
    path = "/api/users/delete/{id}",
    params(("id" = String, Path, description = "Numeric user id")),
    request_body = CredentialsRequest,
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Malformed request or foreign id", body = Error),
        (status = 401, description = "Login failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/delete/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let id = UserId::new(parse_id(&path)?);
    authorise(&state, &payload, id).await?;
    state.users.delete_by_id(Some(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Lookup routes hit without their final segment.
pub async fn missing_path_segment() -> ApiResult<HttpResponse> {
    Err(Error::from(Failure::BadRequest))
}
