//! Authentication routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /` - Landing page after login
/// - `GET /login/:provider` - Start the OAuth flow
/// - `GET /login/:provider/callback` - OAuth callback, issues the session cookie
pub fn auth_routes() -> Router {
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/login/:provider", get(handlers::login_start))
        .route("/login/:provider/callback", get(handlers::login_callback))
}
