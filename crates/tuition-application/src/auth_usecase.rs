//! Login and logout.

use crate::payment::PaymentFlow;
use std::sync::Arc;
use tuition_core::gateway::BankingGateway;
use tuition_core::session::{Session, SessionStore, UserRecord};
use tuition_core::{Result, TuitionError};

const MISSING_CREDENTIALS: &str = "Please enter both username and password";
const USER_FETCH_FAILED: &str = "Failed to retrieve user information";

/// Use case for authenticating the payer.
///
/// Creates the session on login and tears it down (together with any payment
/// in progress) on logout.
pub struct AuthUseCase {
    gateway: Arc<dyn BankingGateway>,
    sessions: Arc<dyn SessionStore>,
    payment_flow: Option<Arc<PaymentFlow>>,
}

impl AuthUseCase {
    pub fn new(gateway: Arc<dyn BankingGateway>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            sessions,
            payment_flow: None,
        }
    }

    /// Resets `flow` whenever the user logs out.
    pub fn with_payment_flow(mut self, flow: Arc<PaymentFlow>) -> Self {
        self.payment_flow = Some(flow);
        self
    }

    /// Logs in and stores the new session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(TuitionError::validation(MISSING_CREDENTIALS));
        }

        tracing::info!("[Auth] Logging in as {}", username);
        let token = self.gateway.authenticate(username, password).await?;

        let user = self.gateway.current_user(&token).await.map_err(|e| {
            tracing::warn!("[Auth] Fetching user after login failed: {}", e);
            TuitionError::auth(USER_FETCH_FAILED)
        })?;

        let session = Session::new(token, user);
        self.sessions.save(session.clone()).await?;
        tracing::info!("[Auth] Logged in as user {}", session.user().id);
        Ok(session)
    }

    /// Clears the session and any payment state.
    pub async fn logout(&self) {
        if let Some(flow) = &self.payment_flow {
            flow.reset().await;
        }
        self.sessions.clear().await;
        tracing::info!("[Auth] Logged out");
    }

    /// The logged-in user, if any.
    pub async fn current_user(&self) -> Option<UserRecord> {
        self.sessions.load().await.map(|s| s.user().clone())
    }

    /// Re-fetches the user record (e.g. the balance) from the backend.
    pub async fn refresh_user(&self) -> Result<UserRecord> {
        let session = self
            .sessions
            .load()
            .await
            .ok_or_else(|| TuitionError::auth("Please log in first"))?;
        let user = self.gateway.current_user(session.token()).await?;
        self.sessions.replace_user(user.clone()).await?;
        Ok(user)
    }
}
