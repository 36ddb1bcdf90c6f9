//! Carbon daemon library - exposes modules for testing.

pub mod emissions;
pub mod mailer;
pub mod registry;
pub mod routes;
pub mod server;
