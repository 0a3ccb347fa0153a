//! Session data models

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;

use super::service::SessionError;

/// `user_session` row as stored
#[derive(FromRow, Debug, Clone)]
pub struct SessionRow {
    pub id: String,
    pub expires_at: String,
    pub user_id: String,
}

/// Session with its expiry parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl TryFrom<SessionRow> for Session {
    type Error = SessionError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(Session {
            expires_at: parse_timestamp(&row.expires_at)?,
            id: row.id,
            user_id: row.user_id,
        })
    }
}

/// RFC 3339, UTC, millisecond precision
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, SessionError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SessionError::InvalidTimestamp(format!("{}: {}", raw, e)))
}
