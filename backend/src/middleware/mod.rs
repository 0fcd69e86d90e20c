//! Actix middleware shared by the API and the pages.

pub mod trace;

pub use trace::Trace;
