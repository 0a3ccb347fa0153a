// src/common/config.rs
//! Process configuration, read once at startup and passed down explicitly.
//! Request handling code never consults the environment directly.

use anyhow::Context;
use std::env;

use super::environment::{apply_cli_override, Environment};

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// OAuth2 client settings for the single configured provider
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub provider: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// Google endpoints with the given client credentials
    pub fn google(client_id: &str, client_secret: &str, redirect_url: &str) -> Self {
        Self {
            provider: "google".to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_url: redirect_url.to_string(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
            scopes: vec!["email".to_string(), "profile".to_string()],
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let client_id = env::var("GOOGLE_CLIENT_ID").context("GOOGLE_CLIENT_ID is not set")?;
        let client_secret =
            env::var("GOOGLE_CLIENT_SECRET").context("GOOGLE_CLIENT_SECRET is not set")?;
        let redirect_url = env::var("GOOGLE_REDIRECT_URL")
            .unwrap_or_else(|_| "http://localhost:3000/login/google/callback".to_string());

        Ok(Self::google(&client_id, &client_secret, &redirect_url))
    }
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub environment: Environment,
    pub oauth: OAuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://auth_api.db".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        let environment = apply_cli_override(Environment::from_env());

        Ok(Self {
            database_url,
            port,
            cors_origins,
            environment,
            oauth: OAuthConfig::from_env()?,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_defaults() {
        let config = OAuthConfig::google("id", "secret", "http://localhost/cb");
        assert_eq!(config.provider, "google");
        assert_eq!(config.token_url, GOOGLE_TOKEN_URL);
        assert_eq!(config.scopes, vec!["email", "profile"]);
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test,,"),
            vec!["http://a.test", "http://b.test"]
        );
    }
}
