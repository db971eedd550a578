//! In-memory session store.
//!
//! The session lives for the process lifetime and is never written to disk.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tuition_core::session::{Session, SessionStore, UserRecord};
use tuition_core::{Money, Result, TuitionError};

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_logged_in() -> TuitionError {
    TuitionError::auth("Please log in first")
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    async fn save(&self, session: Session) -> Result<()> {
        tracing::debug!("[SessionStore] Session saved for user {}", session.user().id);
        *self.session.write().await = Some(session);
        Ok(())
    }

    async fn debit(&self, amount: Money) -> Result<Money> {
        let mut guard = self.session.write().await;
        let session = guard.as_mut().ok_or_else(not_logged_in)?;
        Ok(session.debit(amount))
    }

    async fn replace_user(&self, user: UserRecord) -> Result<()> {
        let mut guard = self.session.write().await;
        let session = guard.take().ok_or_else(not_logged_in)?;
        *guard = Some(session.with_user(user));
        Ok(())
    }

    async fn clear(&self) {
        if self.session.write().await.take().is_some() {
            tracing::debug!("[SessionStore] Session cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuition_core::session::AccessToken;

    fn user(balance: Money) -> UserRecord {
        UserRecord {
            id: 7,
            username: Some("payer01".to_string()),
            full_name: "Nguyen Van A".to_string(),
            email: "a@example.com".to_string(),
            phone: None,
            available_balance: balance,
        }
    }

    #[tokio::test]
    async fn test_empty_store_has_no_session() {
        let store = MemorySessionStore::new();
        assert!(store.load().await.is_none());
        assert!(store.debit(1).await.unwrap_err().is_auth());
        assert!(store.replace_user(user(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_save_debit_and_clear() {
        let store = MemorySessionStore::new();
        store
            .save(Session::new(AccessToken::new("t"), user(10_000_000)))
            .await
            .unwrap();

        assert_eq!(store.debit(5_000_000).await.unwrap(), 5_000_000);
        assert_eq!(store.load().await.unwrap().available_balance(), 5_000_000);

        store.clear().await;
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_replace_user_keeps_token() {
        let store = MemorySessionStore::new();
        store
            .save(Session::new(AccessToken::new("tok"), user(1)))
            .await
            .unwrap();
        store.replace_user(user(42)).await.unwrap();

        let session = store.load().await.unwrap();
        assert_eq!(session.token().as_str(), "tok");
        assert_eq!(session.available_balance(), 42);
    }
}
