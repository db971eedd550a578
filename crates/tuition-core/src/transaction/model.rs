use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use strum::Display;

/// Backend transaction identifier.
///
/// The backend issues integers, but the id is only ever echoed back, so it is
/// kept as text and accepted in either JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// Body of `POST /transactions/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTransaction {
    pub payer_id: i64,
    pub receiver_id: String,
    pub debt_id: i64,
    pub amount: Money,
    pub available_balance: Money,
}

/// A transaction created in `PENDING` state, awaiting OTP verification.
///
/// Captures what the open challenge will settle; later lookups never alter it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub transaction_id: TransactionId,
    pub payer_id: i64,
    pub receiver_id: String,
    pub debt_id: i64,
    pub amount: Money,
}

/// Lifecycle status of a recorded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

/// A row of the payer's transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    #[serde(default)]
    pub payer_id: Option<i64>,
    #[serde(default)]
    pub payer_name: Option<String>,
    pub receiver_id: String,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub debt_id: Option<i64>,
    #[serde(default)]
    pub amount: Money,
    #[serde(default, deserialize_with = "status_or_pending")]
    pub status: TransactionStatus,
    #[serde(default, with = "crate::timestamp::optional")]
    pub initiated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::timestamp::optional")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub academic_year: Option<String>,
}

impl TransactionRecord {
    /// The timestamp shown for the record: completion if known, else initiation.
    pub fn display_time(&self) -> Option<&DateTime<Utc>> {
        self.completed_at.as_ref().or(self.initiated_at.as_ref())
    }

    /// Receiver name if the backend joined it, else the student id.
    pub fn receiver_label(&self) -> &str {
        self.receiver_name.as_deref().unwrap_or(&self.receiver_id)
    }
}

fn status_or_pending<'de, D>(deserializer: D) -> Result<TransactionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TransactionStatus>::deserialize(deserializer)?.unwrap_or_default())
}

/// Orders records newest first by their display time; undated records go last.
pub fn sort_newest_first(records: &mut [TransactionRecord]) {
    records.sort_by(|a, b| b.display_time().cmp(&a.display_time()));
}
