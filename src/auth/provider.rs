// src/auth/provider.rs
//! Identity provider client: authorization URL, code exchange, profile fetch

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use super::models::{ProviderProfile, ProviderToken};
use crate::common::config::OAuthConfig;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Code exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("Failed to get user info: {0}")]
    ProfileFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// The external OAuth2 identity provider.
///
/// The callback handler only talks to the provider through this trait, so a
/// fake can stand in for it in tests.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Name used in routes and cookie names (e.g. `google`)
    fn name(&self) -> &str;

    /// Authorization endpoint URL carrying `state`
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for an access token
    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, ProviderError>;

    /// Fetch the signed-in user's profile
    async fn fetch_profile(&self, token: &ProviderToken) -> Result<ProviderProfile, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct GoogleProvider {
    config: OAuthConfig,
    client: Client,
}

impl GoogleProvider {
    pub fn new(config: OAuthConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn name(&self) -> &str {
        &self.config.provider
    }

    fn authorization_url(&self, state: &str) -> String {
        let scope_param = self.config.scopes.join(" ");

        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_url),
            urlencoding::encode(&scope_param),
            urlencoding::encode(state)
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, ProviderError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Token exchange failed");
            return Err(ProviderError::ExchangeFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<ProviderToken>()
            .await
            .map_err(|e| ProviderError::SerializationError(e.to_string()))
    }

    async fn fetch_profile(&self, token: &ProviderToken) -> Result<ProviderProfile, ProviderError> {
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Userinfo request failed");
            return Err(ProviderError::ProfileFailed(format!("HTTP {}", status)));
        }

        response
            .json::<ProviderProfile>()
            .await
            .map_err(|e| ProviderError::SerializationError(e.to_string()))
    }
}
