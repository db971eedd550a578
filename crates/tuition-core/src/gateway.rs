//! The backend contract consumed by the client.

use crate::error::Result;
use crate::otp::OtpCode;
use crate::session::{AccessToken, UserRecord};
use crate::student::StudentLookup;
use crate::transaction::{NewTransaction, TransactionId, TransactionRecord};

/// Remote banking backend.
///
/// One method per endpoint. Implementations map HTTP outcomes onto the shared
/// error type:
///
/// - network failure or unparseable body: `TuitionError::Transport`
/// - 401 on a bearer call: `TuitionError::Auth`
/// - 404 on a lookup: `TuitionError::NotFound`
/// - any other non-success status: `TuitionError::Rejected` carrying the
///   backend's `detail`
#[async_trait::async_trait]
pub trait BankingGateway: Send + Sync {
    /// `POST /token` with form-encoded credentials.
    async fn authenticate(&self, username: &str, password: &str) -> Result<AccessToken>;

    /// `GET /customers/me`
    async fn current_user(&self, token: &AccessToken) -> Result<UserRecord>;

    /// `GET /customers/receiver/{id}`
    async fn lookup_student(&self, token: &AccessToken, student_id: &str) -> Result<StudentLookup>;

    /// `GET /customers/receiver/check/{id}`: whether a pending transaction
    /// already exists for the receiver.
    async fn has_pending_transaction(&self, token: &AccessToken, student_id: &str) -> Result<bool>;

    /// `POST /transactions/create`
    async fn create_transaction(
        &self,
        token: &AccessToken,
        request: &NewTransaction,
    ) -> Result<TransactionId>;

    /// `POST /otp/verify`. `Ok` means the backend accepted the code and
    /// finalized the transaction.
    async fn verify_otp(
        &self,
        token: &AccessToken,
        transaction_id: &TransactionId,
        code: &OtpCode,
    ) -> Result<()>;

    /// `GET /otp/resend/{transaction_id}`
    async fn resend_otp(&self, token: &AccessToken, transaction_id: &TransactionId) -> Result<()>;

    /// `GET /transactions/me`
    async fn list_transactions(&self, token: &AccessToken) -> Result<Vec<TransactionRecord>>;
}
