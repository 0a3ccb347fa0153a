//! # Auth Module
//!
//! This module drives federated login:
//! - OAuth2 authorization-code flow with CSRF state cookie
//! - Identity provider client (code exchange, userinfo)
//! - Session cookie issuance after the local user is resolved

pub mod handlers;
pub mod models;
pub mod provider;
pub mod routes;


pub use provider::GoogleProvider;
pub use routes::auth_routes;
