// src/common/environment.rs
//! Deployment environment flag
//! Development mode relaxes the `Secure` attribute on cookies so the flow
//! works over plain http://localhost

use std::env;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        Self::parse(&env::var("APP_ENV").unwrap_or_default())
    }

    /// Anything other than `development` is treated as production
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("development") {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Whether cookies must carry the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        !self.is_development()
    }
}

/// Log environment status on startup
pub fn print_environment_status(environment: Environment) {
    if environment.is_development() {
        warn!("⚠️  DEVELOPMENT MODE - cookies are sent without the Secure flag");
    } else {
        info!("🔒 Production mode - cookies require HTTPS");
    }
}

/// CLI argument parsing for the environment flag
pub fn parse_environment_args<I>(args: I) -> Option<Environment>
where
    I: IntoIterator<Item = String>,
{
    for arg in args {
        match arg.as_str() {
            "--dev" | "--dev-mode" => return Some(Environment::Development),
            "--no-dev" | "--prod" | "--production" => return Some(Environment::Production),
            _ => {}
        }
    }

    None
}

/// Override the environment from CLI args
pub fn apply_cli_override(environment: Environment) -> Environment {
    match parse_environment_args(env::args()) {
        Some(overridden) => {
            info!(environment = ?overridden, "CLI override for APP_ENV");
            overridden
        }
        None => environment,
    }
}
