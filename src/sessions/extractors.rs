//! Session guard extractor for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::common::cookies::{read_cookie, SESSION_COOKIE};
use crate::common::{safe_token_log, ApiError, AppState};

/// Authenticated caller, resolved from the `session` cookie
///
/// Any handler taking this extractor is protected: a missing cookie, an
/// unknown session id and an expired session all reject with the same 401.
/// Validation renews the session when it is past the halfway point.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let session_id = match read_cookie(&parts.headers, SESSION_COOKIE) {
            Some(id) if !id.is_empty() => id,
            _ => {
                debug!("Authentication failed: missing session cookie");
                return Err(ApiError::Unauthorized("unauthorized".to_string()));
            }
        };

        match app_state.sessions.validate(&session_id).await {
            Ok(user_id) => {
                debug!(user_id = %user_id, "Session validated");
                Ok(SessionUser { user_id })
            }
            Err(e) => {
                warn!(
                    error = %e,
                    session = %safe_token_log(&session_id),
                    "Authentication failed: session rejected"
                );
                Err(e.into())
            }
        }
    }
}
