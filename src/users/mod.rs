//! # Users Module
//!
//! Local user records and their links to provider identities:
//! - UserResolver: provider identity -> local user, created on first login
//! - `GET /users/me` for the authenticated caller

pub mod handlers;
pub mod models;
pub mod resolver;
pub mod routes;


pub use resolver::UserResolver;
pub use routes::users_routes;
