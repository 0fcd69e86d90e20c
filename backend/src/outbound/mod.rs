//! Outbound adapters implementing the domain's repository ports.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//! - **memory**: a mutex-guarded store used without a database and in tests.
//!
//! Adapters convert between domain types and storage representations and
//! hold no business rules.

pub mod memory;
pub mod persistence;
