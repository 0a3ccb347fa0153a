//! Tests for the sessions module
//!
//! These tests pin down expiry and sliding renewal against explicit clocks.

#[cfg(test)]
mod tests {
    use super::super::service::session_duration;
    use super::super::*;
    use crate::common::migrations::test_pool;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use sqlx::SqlitePool;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    async fn setup() -> (SqlitePool, SessionService) {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO user (id, email) VALUES ('U_TEST', 'test@example.com')")
            .execute(&pool)
            .await
            .unwrap();
        let service = SessionService::new(pool.clone());
        (pool, service)
    }

    #[tokio::test]
    async fn test_created_session_is_valid_immediately() {
        let (_pool, service) = setup().await;
        let id = service.create_at("U_TEST", t0()).await.unwrap();

        let session = service.fetch(&id).await.unwrap();
        assert_eq!(session.user_id, "U_TEST");
        assert_eq!(session.expires_at, t0() + session_duration());

        let user_id = service.validate_at(&id, t0()).await.unwrap();
        assert_eq!(user_id, "U_TEST");
    }

    #[tokio::test]
    async fn test_session_valid_until_duration_elapses() {
        let (_pool, service) = setup().await;
        let d = session_duration();

        let almost = service.create_at("U_TEST", t0()).await.unwrap();
        assert!(service
            .validate_at(&almost, t0() + d - Duration::seconds(1))
            .await
            .is_ok());

        let exact = service.create_at("U_TEST", t0()).await.unwrap();
        assert!(matches!(
            service.validate_at(&exact, t0() + d).await,
            Err(SessionError::Expired)
        ));

        let late = service.create_at("U_TEST", t0()).await.unwrap();
        assert!(matches!(
            service.validate_at(&late, t0() + d + Duration::hours(1)).await,
            Err(SessionError::Expired)
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_not_renewed() {
        let (_pool, service) = setup().await;
        let id = service.create_at("U_TEST", t0()).await.unwrap();

        let _ = service
            .validate_at(&id, t0() + session_duration() + Duration::minutes(5))
            .await;

        let session = service.fetch(&id).await.unwrap();
        assert_eq!(session.expires_at, t0() + session_duration());
    }

    #[tokio::test]
    async fn test_validate_renews_past_halfway() {
        let (_pool, service) = setup().await;
        let id = service.create_at("U_TEST", t0()).await.unwrap();

        let now = t0() + session_duration() / 2 + Duration::seconds(1);
        service.validate_at(&id, now).await.unwrap();

        let session = service.fetch(&id).await.unwrap();
        assert_eq!(session.expires_at, now + session_duration());
    }

    #[tokio::test]
    async fn test_validate_keeps_expiry_at_exactly_half_remaining() {
        let (_pool, service) = setup().await;
        let id = service.create_at("U_TEST", t0()).await.unwrap();

        service
            .validate_at(&id, t0() + session_duration() / 2)
            .await
            .unwrap();

        let session = service.fetch(&id).await.unwrap();
        assert_eq!(session.expires_at, t0() + session_duration());
    }

    #[tokio::test]
    async fn test_repeated_validation_of_fresh_session_is_idempotent() {
        let (_pool, service) = setup().await;
        let id = service.create_at("U_TEST", t0()).await.unwrap();
        let before = service.fetch(&id).await.unwrap();

        service.validate_at(&id, t0()).await.unwrap();
        let after_first = service.fetch(&id).await.unwrap();
        service
            .validate_at(&id, t0() + Duration::milliseconds(5))
            .await
            .unwrap();
        let after_second = service.fetch(&id).await.unwrap();

        assert_eq!(before.expires_at, after_first.expires_at);
        assert_eq!(before.expires_at, after_second.expires_at);
    }

    #[tokio::test]
    async fn test_renewed_session_outlives_original_expiry() {
        let (_pool, service) = setup().await;
        let d = session_duration();
        let id = service.create_at("U_TEST", t0()).await.unwrap();

        // Activity past halfway slides the window forward
        service
            .validate_at(&id, t0() + d - Duration::hours(1))
            .await
            .unwrap();

        assert!(service
            .validate_at(&id, t0() + d + Duration::hours(1))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_renew_sets_full_duration() {
        let (_pool, service) = setup().await;
        let id = service.create_at("U_TEST", t0()).await.unwrap();

        let now = t0() + Duration::minutes(1);
        let expires_at = service.renew_at(&id, now).await.unwrap();
        assert_eq!(expires_at, now + session_duration());
        assert_eq!(service.fetch(&id).await.unwrap().expires_at, expires_at);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let (_pool, service) = setup().await;

        assert!(matches!(
            service.fetch("nope").await,
            Err(SessionError::NotFound)
        ));
        assert!(matches!(
            service.validate("nope").await,
            Err(SessionError::NotFound)
        ));
        assert!(matches!(
            service.renew("nope").await,
            Err(SessionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_session_requires_existing_user() {
        let (_pool, service) = setup().await;
        let result = service.create("U_MISSING").await;
        assert!(matches!(result, Err(SessionError::Database(_))));
    }

    #[tokio::test]
    async fn test_new_login_keeps_older_sessions() {
        let (pool, service) = setup().await;
        let first = service.create("U_TEST").await.unwrap();
        let second = service.create("U_TEST").await.unwrap();
        assert_ne!(first, second);

        assert_eq!(service.validate(&first).await.unwrap(), "U_TEST");
        assert_eq!(service.validate(&second).await.unwrap(), "U_TEST");

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM user_session WHERE user_id = 'U_TEST'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_unreadable_expiry_is_reported() {
        let (pool, service) = setup().await;
        sqlx::query(
            "INSERT INTO user_session (id, expires_at, user_id) VALUES ('bad', 'yesterday', 'U_TEST')",
        )
        .execute(&pool)
        .await
        .unwrap();

        assert!(matches!(
            service.fetch("bad").await,
            Err(SessionError::InvalidTimestamp(_))
        ));
    }
}
