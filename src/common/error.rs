// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use crate::auth::provider::ProviderError;
use crate::sessions::SessionError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    InternalServer(String),
    DatabaseError(sqlx::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::DatabaseError(e)
    }
}

/// Missing, unknown and expired sessions collapse into one unauthorized outcome
/// so callers cannot tell them apart.
impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound | SessionError::Expired => {
                ApiError::Unauthorized("unauthorized".to_string())
            }
            SessionError::Database(e) => ApiError::DatabaseError(e),
            SessionError::Entropy(e) => {
                error!(error = %e, "Failed to generate session id");
                ApiError::InternalServer("failed to create session".to_string())
            }
            SessionError::InvalidTimestamp(msg) => {
                error!(error = %msg, "Stored session has an unreadable expiry");
                ApiError::InternalServer("session store corrupted".to_string())
            }
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        error!(error = %e, "Identity provider call failed");
        ApiError::InternalServer("identity provider error".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_provider_error_detail_stays_out_of_response() {
        let err: ApiError = ProviderError::ExchangeFailed("HTTP 400: secret-body".to_string()).into();
        let resp = err.into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "identity provider error");
        assert!(!String::from_utf8_lossy(&bytes).contains("secret-body"));
    }

    #[tokio::test]
    async fn test_expired_and_unknown_sessions_look_the_same() {
        let expired = ApiError::from(SessionError::Expired).into_response();
        let unknown = ApiError::from(SessionError::NotFound).into_response();

        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        let expired = to_bytes(expired.into_body(), usize::MAX).await.unwrap();
        let unknown = to_bytes(unknown.into_body(), usize::MAX).await.unwrap();
        assert_eq!(expired, unknown);
    }
}
