//! # Sessions Module
//!
//! Server-side sessions issued after a successful login:
//! - SessionService: create, fetch, validate (with sliding renewal), renew
//! - SessionUser extractor guarding protected routes

pub mod extractors;
pub mod models;
pub mod service;

#[cfg(test)]
mod tests;

pub use extractors::SessionUser;
pub use service::{SessionError, SessionService, SESSION_DURATION_SECS};
