//! Account credential flows over the `auth` core
//!
//! Wires configuration, persistence and mail delivery ports to the authentication
//! core: login and logout, session lookup, registration, and the forgot/reset
//! password exchange.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

pub use domain::credentials;
pub use outbound::repositories;
