//! tests/session_tests.rs

#[cfg(test)]
mod tests {
    use actix_rt::test;
    use chrono::{Duration, Utc};

    use crate::services::auth_service::TelegramAuthService;
    use crate::services::session_service::SessionService;
    use crate::tests::{signed_payload, TEST_BOT_TOKEN};

    fn verified_login(user_id: i64) -> crate::services::auth_service::VerifiedLogin {
        let auth = TelegramAuthService::new(TEST_BOT_TOKEN, Duration::days(1));
        let fields = signed_payload(&auth, user_id, Utc::now().timestamp());
        auth.verify(&fields).expect("Login should verify")
    }

    #[test]
    async fn create_get_destroy() {
        let sessions = SessionService::new(Duration::hours(1));
        let session = sessions.create(&verified_login(5)).await;

        let found = sessions.get(&session.token).await.expect("Session missing");
        assert_eq!(found.user.id, 5);
        assert!(found.expires_at > Utc::now());

        assert!(sessions.destroy(&session.token).await);
        assert!(sessions.get(&session.token).await.is_none());
        assert!(!sessions.destroy(&session.token).await);
    }

    #[test]
    async fn tokens_are_unique() {
        let sessions = SessionService::new(Duration::hours(1));
        let login = verified_login(5);
        let a = sessions.create(&login).await;
        let b = sessions.create(&login).await;
        assert_ne!(a.token, b.token);
    }

    #[test]
    async fn expired_sessions_are_dropped() {
        let sessions = SessionService::new(Duration::zero());
        let session = sessions.create(&verified_login(5)).await;
        assert!(sessions.get(&session.token).await.is_none());

        sessions.create(&verified_login(6)).await;
        sessions.create(&verified_login(7)).await;
        assert_eq!(sessions.purge_expired().await, 2);
        assert_eq!(sessions.purge_expired().await, 0);
    }

    #[test]
    async fn ttl_past_calendar_limit_does_not_overflow() {
        let sessions = SessionService::new(Duration::days(365 * 1_000_000));
        let session = sessions.create(&verified_login(5)).await;
        assert!(session.expires_at > Utc::now());
        assert!(sessions.get(&session.token).await.is_some());
    }

    #[test]
    async fn unknown_token_is_absent() {
        let sessions = SessionService::new(Duration::hours(1));
        assert!(sessions.get("does-not-exist").await.is_none());
    }
}
