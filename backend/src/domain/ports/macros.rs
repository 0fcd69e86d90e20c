//! Declares the persistence error enums shared by both repository ports.
//!
//! Every store failure falls into one of four buckets; only the messages
//! differ between users and games. Each variant also gets a snake_case
//! constructor, e.g. `UserPersistenceError::query("...")`.

macro_rules! define_persistence_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            connection => $connection:expr,
            query => $query:expr,
            conflict => $conflict:expr,
            integrity => $integrity:expr $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            /// The store could not be reached.
            #[error($connection)]
            Connection { message: String },
            /// A statement failed while executing.
            #[error($query)]
            Query { message: String },
            /// A unique key is already taken.
            #[error($conflict)]
            Conflict { message: String },
            /// A row broke a not-null, length or foreign-key constraint.
            #[error($integrity)]
            Integrity { message: String },
        }

        impl $name {
            define_persistence_error!(@ctors Connection Query Conflict Integrity);
        }
    };

    (@ctors $($variant:ident)*) => {
        $(
            ::paste::paste! {
                pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                    Self::$variant { message: message.into() }
                }
            }
        )*
    };
}

pub(crate) use define_persistence_error;
