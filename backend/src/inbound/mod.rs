//! Inbound adapters translating external requests into domain service calls.
//!
//! [`http`] serves the JSON REST surface and owns the pieces both adapters
//! share (session, state, error mapping). [`web`] serves the HTML pages.

pub mod http;
pub mod web;
