//! Authentication and account forms.
//!
//! Inbound adapters hand raw strings to these constructors; each one decides
//! which [`Failure`] the caller sees before any repository is touched.

use zeroize::Zeroizing;

use super::{Failure, Password, User, UserValidationError, Username};

/// Complete login credentials.
///
/// ## Invariants
/// - `username` is non-blank and kept verbatim for lookups.
/// - `password` is non-blank and never trimmed.
///
/// # Examples
/// ```
/// use gamenest::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "pwd").unwrap();
/// assert_eq!(creds.username(), "alice");
/// assert!(LoginCredentials::try_from_parts("alice", " ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials, failing with [`Failure::LoginFailed`] when
    /// either part is blank.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, Failure> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(Failure::LoginFailed);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username exactly as submitted.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password exactly as submitted.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Sign-up form as submitted by a visitor.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub password: Zeroizing<String>,
    pub confirm_password: Zeroizing<String>,
}

impl RegistrationForm {
    /// Validate the form and build the unsaved user it describes.
    ///
    /// Checks run in order: username present, both passwords present,
    /// passwords equal.
    pub fn into_user(self) -> Result<User, Failure> {
        if self.username.trim().is_empty() {
            return Err(Failure::UsernameRequired);
        }
        if self.password.trim().is_empty() || self.confirm_password.trim().is_empty() {
            return Err(Failure::PasswordRequired);
        }
        if *self.password != *self.confirm_password {
            return Err(Failure::PasswordsDoNotMatch);
        }
        let username = Username::new(self.username).map_err(user_data_failure)?;
        let password = Password::new(self.password.as_str()).map_err(user_data_failure)?;
        Ok(User::new(username, password))
    }
}

/// Password change request from an authenticated user.
#[derive(Debug, Clone, Default)]
pub struct ChangePasswordForm {
    pub old_password: Zeroizing<String>,
    pub new_password: Zeroizing<String>,
}

impl ChangePasswordForm {
    /// Check the form against the stored user and return the new password.
    ///
    /// The old password is compared first, so a wrong old password wins
    /// over a blank new one.
    pub fn verify(&self, current: &User) -> Result<Password, Failure> {
        if current.password().expose() != self.old_password.as_str() {
            return Err(Failure::OldPasswordError);
        }
        Password::new(self.new_password.as_str()).map_err(|_| Failure::NewPasswordRequired)
    }
}

/// Map a user validation error raised while persisting to the store's
/// integrity failure.
pub(crate) fn user_data_failure(error: UserValidationError) -> Failure {
    tracing::debug!(%error, "rejected user data");
    Failure::InvalidUserData
}
