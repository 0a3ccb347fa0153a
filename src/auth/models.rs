//! OAuth wire models
//!
//! These mirror the provider's JSON and the callback query string. They are
//! mapped onto local users explicitly in the callback handler and never
//! stored as-is.

use serde::{Deserialize, Serialize};

/// Token endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Userinfo endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Provider subject id
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
}

/// Query parameters on `/login/{provider}/callback`
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub state: Option<String>,
    pub code: Option<String>,
    pub error: Option<String>,
}
