// src/app.rs
//! Router composition shared by the server binary and the end-to-end tests

use axum::{extract::Extension, middleware, Router};
use std::sync::Arc;

use crate::common::AppState;
use crate::{auth, logging_middleware, users};

/// All routes with application state and request logging attached
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        // ====================================================================
        // AUTHENTICATION ROUTES
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // USER ROUTES
        // ====================================================================
        .merge(users::users_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(state))
}
