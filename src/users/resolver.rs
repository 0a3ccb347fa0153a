// src/users/resolver.rs
//! Maps a provider identity to a local user, provisioning one on first login.

use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use super::models::{OAuthAccount, User};
use crate::common::id_generator::generate_user_id;
use crate::common::safe_email_log;

#[derive(Debug, Clone)]
pub struct UserResolver {
    db: SqlitePool,
}

impl UserResolver {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Return the local user id linked to `(provider, provider_user_id)`,
    /// creating the user and its link in one transaction if none exists.
    pub async fn resolve(
        &self,
        provider: &str,
        provider_user_id: &str,
        email: &str,
    ) -> Result<String, sqlx::Error> {
        if let Some(account) = self.find_account(provider, provider_user_id).await? {
            debug!(
                provider = %provider,
                provider_user_id = %provider_user_id,
                user_id = %account.user_id,
                "Found existing user for provider identity"
            );
            return Ok(account.user_id);
        }

        debug!(
            provider = %provider,
            provider_user_id = %provider_user_id,
            "No existing user found, will create new user"
        );
        self.create_linked_user(provider, provider_user_id, email)
            .await
    }

    pub async fn find_account(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> Result<Option<OAuthAccount>, sqlx::Error> {
        sqlx::query_as::<_, OAuthAccount>(
            "SELECT provider_id, provider_user_id, user_id FROM oauth_account WHERE provider_id = ? AND provider_user_id = ?",
        )
        .bind(provider)
        .bind(provider_user_id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, email FROM user WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
    }

    /// Insert the user and its provider link atomically.
    ///
    /// If another request linked the same provider identity first, the
    /// primary key on `oauth_account` rejects ours; the whole transaction is
    /// rolled back and the winner's user id is returned instead.
    pub(crate) async fn create_linked_user(
        &self,
        provider: &str,
        provider_user_id: &str,
        email: &str,
    ) -> Result<String, sqlx::Error> {
        let user_id = generate_user_id();
        let mut tx = self.db.begin().await?;

        sqlx::query("INSERT INTO user (id, email) VALUES (?, ?)")
            .bind(&user_id)
            .bind(email)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %user_id, "Database error inserting new user");
                e
            })?;

        let linked = sqlx::query(
            "INSERT INTO oauth_account (provider_id, provider_user_id, user_id) VALUES (?, ?, ?)",
        )
        .bind(provider)
        .bind(provider_user_id)
        .bind(&user_id)
        .execute(&mut *tx)
        .await;

        match linked {
            Ok(_) => {
                tx.commit().await?;
                info!(
                    user_id = %user_id,
                    email = %safe_email_log(email),
                    provider = %provider,
                    "New user account created"
                );
                Ok(user_id)
            }
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await?;
                warn!(
                    provider = %provider,
                    provider_user_id = %provider_user_id,
                    "Provider identity linked concurrently, using existing user"
                );
                match self.find_account(provider, provider_user_id).await? {
                    Some(account) => Ok(account.user_id),
                    None => Err(e),
                }
            }
            Err(e) => {
                error!(
                    error = %e,
                    provider = %provider,
                    provider_user_id = %provider_user_id,
                    "Database error linking provider identity"
                );
                Err(e)
            }
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
