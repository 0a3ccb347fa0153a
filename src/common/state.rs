// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::provider::IdentityProvider;
use crate::common::environment::Environment;
use crate::sessions::SessionService;
use crate::users::UserResolver;

/// Application state holding the session and user services and the configured provider
#[derive(Clone)]
pub struct AppState {
    pub environment: Environment,
    pub provider: Arc<dyn IdentityProvider>,
    pub sessions: SessionService,
    pub users: UserResolver,
}

impl AppState {
    pub fn new(db: SqlitePool, environment: Environment, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            sessions: SessionService::new(db.clone()),
            users: UserResolver::new(db),
            environment,
            provider,
        }
    }
}
