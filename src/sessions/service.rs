// src/sessions/service.rs
//! Server-side session lifecycle: creation, lookup, validation with sliding
//! renewal, and explicit renewal.
//!
//! Every operation has an `_at` twin that takes the current time explicitly;
//! the plain versions call it with `Utc::now()`.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use super::models::{format_timestamp, Session, SessionRow};
use crate::common::id_generator::generate_session_id;
use crate::common::safe_token_log;

/// Lifetime of a session, used for the initial grant, every renewal, and the
/// session cookie's Max-Age.
pub const SESSION_DURATION_SECS: i64 = 60 * 60 * 24 * 7;

pub fn session_duration() -> Duration {
    Duration::seconds(SESSION_DURATION_SECS)
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,

    #[error("session expired")]
    Expired,

    #[error("entropy source failure: {0}")]
    Entropy(#[from] rand::Error),

    #[error("invalid session timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct SessionService {
    db: SqlitePool,
}

impl SessionService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a session for `user_id` and return its id
    pub async fn create(&self, user_id: &str) -> Result<String, SessionError> {
        self.create_at(user_id, Utc::now()).await
    }

    pub async fn create_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<String, SessionError> {
        let session_id = generate_session_id()?;
        let expires_at = now + session_duration();

        sqlx::query("INSERT INTO user_session (id, expires_at, user_id) VALUES (?, ?, ?)")
            .bind(&session_id)
            .bind(format_timestamp(expires_at))
            .bind(user_id)
            .execute(&self.db)
            .await?;

        info!(
            user_id = %user_id,
            session = %safe_token_log(&session_id),
            expires_at = %expires_at,
            "Session created"
        );

        Ok(session_id)
    }

    /// Point lookup by id
    pub async fn fetch(&self, session_id: &str) -> Result<Session, SessionError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, expires_at, user_id FROM user_session WHERE id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(SessionError::NotFound)?;

        Session::try_from(row)
    }

    /// Resolve a session id to its user id, renewing the session when less
    /// than half of its lifetime remains.
    pub async fn validate(&self, session_id: &str) -> Result<String, SessionError> {
        self.validate_at(session_id, Utc::now()).await
    }

    pub async fn validate_at(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<String, SessionError> {
        let session = self.fetch(session_id).await?;

        if session.is_expired_at(now) {
            debug!(
                session = %safe_token_log(session_id),
                expired_at = %session.expires_at,
                "Rejected expired session"
            );
            return Err(SessionError::Expired);
        }

        if session.expires_at - now < session_duration() / 2 {
            self.renew_at(session_id, now).await?;
        }

        Ok(session.user_id)
    }

    /// Push expiry to `now + SESSION_DURATION_SECS` unconditionally
    #[allow(dead_code)]
    pub async fn renew(&self, session_id: &str) -> Result<DateTime<Utc>, SessionError> {
        self.renew_at(session_id, Utc::now()).await
    }

    pub async fn renew_at(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, SessionError> {
        let expires_at = now + session_duration();

        let result = sqlx::query("UPDATE user_session SET expires_at = ? WHERE id = ?")
            .bind(format_timestamp(expires_at))
            .bind(session_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SessionError::NotFound);
        }

        debug!(
            session = %safe_token_log(session_id),
            expires_at = %expires_at,
            "Session renewed"
        );

        Ok(expires_at)
    }
}
