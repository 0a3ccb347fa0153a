// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Run all database migrations
///
/// Tables are created if missing. Setting `RESET_DB=true` drops them first.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("⚠️  RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("✅ Dropped old tables");
    }

    create_identity_tables(pool).await?;
    create_indexes(pool).await?;

    info!("✅ Database migration completed successfully!");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Children before parents so foreign keys never dangle
    for table in ["user_session", "oauth_account", "user"] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn create_identity_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_session (
            id TEXT PRIMARY KEY,
            expires_at TEXT NOT NULL,
            user_id TEXT NOT NULL REFERENCES user(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS oauth_account (
            provider_id TEXT NOT NULL,
            provider_user_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            PRIMARY KEY (provider_id, provider_user_id),
            FOREIGN KEY (user_id) REFERENCES user(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_session_user_id ON user_session(user_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_oauth_account_user_id ON oauth_account(user_id)")
        .execute(pool)
        .await?;
    Ok(())
}

/// In-memory database with the full schema applied.
///
/// A single long-lived connection keeps every query on the same database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    use sqlx::sqlite::SqlitePoolOptions;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    create_identity_tables(&pool).await.unwrap();
    create_indexes(&pool).await.unwrap();

    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let pool = test_pool().await;
        create_identity_tables(&pool).await.unwrap();
        create_indexes(&pool).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(names, vec!["oauth_account", "user", "user_session"]);
    }

    #[tokio::test]
    async fn test_oauth_account_key_is_unique() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO user (id, email) VALUES ('U_1', 'a@example.com')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO oauth_account (provider_id, provider_user_id, user_id) VALUES ('google', 'u1', 'U_1')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let duplicate = sqlx::query(
            "INSERT INTO oauth_account (provider_id, provider_user_id, user_id) VALUES ('google', 'u1', 'U_1')",
        )
        .execute(&pool)
        .await;
        assert!(duplicate.is_err());
    }
}
