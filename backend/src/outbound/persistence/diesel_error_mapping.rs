//! Shared Diesel error mapping for the user and game repositories.
//!
//! Both persistence error enums carry the same four variants, so the mapping
//! is written once against [`RepositoryError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{GamePersistenceError, UserPersistenceError};

use super::pool::PoolError;

/// Constructors shared by the repository error enums.
pub(crate) trait RepositoryError: Sized {
    fn connection(message: String) -> Self;
    fn query(message: String) -> Self;
    fn conflict(message: String) -> Self;
    fn integrity(message: String) -> Self;
}

macro_rules! repository_error {
    ($name:ident) => {
        impl RepositoryError for $name {
            fn connection(message: String) -> Self {
                $name::connection(message)
            }

            fn query(message: String) -> Self {
                $name::query(message)
            }

            fn conflict(message: String) -> Self {
                $name::conflict(message)
            }

            fn integrity(message: String) -> Self {
                $name::integrity(message)
            }
        }
    };
}

repository_error!(UserPersistenceError);
repository_error!(GamePersistenceError);

pub(crate) fn map_pool_error<E: RepositoryError>(error: PoolError) -> E {
    E::connection(error.detail().to_owned())
}

/// Map a Diesel failure onto the repository's error taxonomy.
///
/// Unique violations become conflicts and carry the constraint name;
/// not-null, check and foreign-key violations become integrity errors.
pub(crate) fn map_diesel_error<E: RepositoryError>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => E::query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query("database query error".to_owned()),
        DieselError::DatabaseError(kind, info) => {
            let constraint = info
                .constraint_name()
                .unwrap_or("unnamed constraint")
                .to_owned();
            match kind {
                DatabaseErrorKind::UniqueViolation => E::conflict(constraint),
                DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::ForeignKeyViolation => E::integrity(constraint),
                DatabaseErrorKind::ClosedConnection => {
                    E::connection("database connection error".to_owned())
                }
                _ => E::query("database error".to_owned()),
            }
        }
        _ => E::query("database error".to_owned()),
    }
}
