use super::model::{Session, UserRecord};
use crate::error::Result;
use crate::money::Money;

/// Holds the session of the running client.
///
/// Implementations own the only writable copy of the session; the payment
/// flow reads it and debits it, the auth use case creates and clears it.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the current session, if logged in.
    async fn load(&self) -> Option<Session>;

    /// Stores a freshly authenticated session, replacing any previous one.
    async fn save(&self, session: Session) -> Result<()>;

    /// Subtracts `amount` from the stored balance and returns the new balance.
    ///
    /// Fails with `TuitionError::Auth` when nobody is logged in.
    async fn debit(&self, amount: Money) -> Result<Money>;

    /// Replaces the user record of the current session.
    async fn replace_user(&self, user: UserRecord) -> Result<()>;

    /// Drops the session (logout).
    async fn clear(&self);
}
