//! Request-scoped services composed from the ports.

pub mod auth;
pub mod ownership;

pub use auth::authenticate;
