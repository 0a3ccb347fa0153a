//! User data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User database model, also the `/users/me` response body
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// Link from a provider identity to a local user
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct OAuthAccount {
    pub provider_id: String,
    pub provider_user_id: String,
    pub user_id: String,
}
