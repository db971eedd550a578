//! Transaction history of the logged-in payer.

use std::sync::Arc;
use tuition_core::gateway::BankingGateway;
use tuition_core::session::SessionStore;
use tuition_core::transaction::{TransactionRecord, sort_newest_first};
use tuition_core::{Result, TuitionError};

pub struct HistoryUseCase {
    gateway: Arc<dyn BankingGateway>,
    sessions: Arc<dyn SessionStore>,
}

impl HistoryUseCase {
    pub fn new(gateway: Arc<dyn BankingGateway>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { gateway, sessions }
    }

    /// Fetches the history, newest first.
    pub async fn list(&self) -> Result<Vec<TransactionRecord>> {
        let session = self
            .sessions
            .load()
            .await
            .ok_or_else(|| TuitionError::auth("Please log in first"))?;

        let mut records = self.gateway.list_transactions(session.token()).await?;
        sort_newest_first(&mut records);
        tracing::debug!("[History] Loaded {} transactions", records.len());
        Ok(records)
    }

    /// Fetches the history and picks one transaction.
    pub async fn find(&self, transaction_id: &str) -> Result<TransactionRecord> {
        let transaction_id = transaction_id.trim();
        self.list()
            .await?
            .into_iter()
            .find(|record| record.transaction_id.as_str() == transaction_id)
            .ok_or_else(|| TuitionError::not_found("transaction", transaction_id))
    }
}
