//! User handlers

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tracing::warn;

use super::models::User;
use crate::common::{ApiError, AppState};
use crate::sessions::SessionUser;

/// GET /users/me
/// Returns the authenticated user's profile
///
/// # Response
/// ```json
/// { "id": "U_...", "email": "a@example.com" }
/// ```
pub async fn me_handler(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionUser,
) -> Result<Json<User>, ApiError> {
    match state.users.get_user(&session.user_id).await? {
        Some(user) => Ok(Json(user)),
        None => {
            warn!(user_id = %session.user_id, "Session refers to a missing user");
            Err(ApiError::Unauthorized("unauthorized".to_string()))
        }
    }
}
