//! Wire shapes of backend responses.
//!
//! Kept separate from the domain models because the backend is loose about
//! nullability; everything is optional here and tightened on conversion.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tuition_core::Money;
use tuition_core::student::{DebtRecord, DebtStatus, StudentLookup, StudentRecord};
use tuition_core::transaction::{TransactionId, TransactionRecord};

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PendingCheckResponse {
    pub result: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTransactionResponse {
    pub transaction_id: TransactionId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// FastAPI sends `detail` as a string for handled errors and as a list of
    /// objects for validation failures.
    pub fn into_detail(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReceiverResponse {
    #[serde(rename = "Customer", default)]
    pub customer: Option<ReceiverCustomer>,
    #[serde(rename = "Debt", default)]
    pub debt: Option<DebtWire>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReceiverCustomer {
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DebtWire {
    #[serde(default)]
    pub debt_id: Option<i64>,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default, with = "tuition_core::timestamp::optional")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<DebtStatus>,
    // the banking service joins the student's identity onto the debt row
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
}

impl ReceiverResponse {
    /// Builds the domain lookup. Student identity comes from `Customer`, then
    /// from the debt row, then from the id that was asked for.
    pub fn into_lookup(self, requested_id: &str) -> StudentLookup {
        let customer = self.customer.unwrap_or(ReceiverCustomer {
            student_id: None,
            full_name: None,
            program: None,
        });
        let debt = self.debt;

        let student = StudentRecord {
            student_id: customer
                .student_id
                .or_else(|| debt.as_ref().and_then(|d| d.student_id.clone()))
                .unwrap_or_else(|| requested_id.to_string()),
            full_name: customer
                .full_name
                .or_else(|| debt.as_ref().and_then(|d| d.full_name.clone()))
                .unwrap_or_default(),
            program: customer
                .program
                .or_else(|| debt.as_ref().and_then(|d| d.program.clone())),
        };

        let debt = debt.map(|d| DebtRecord {
            debt_id: d.debt_id,
            amount: d.amount.unwrap_or(0),
            semester: d.semester,
            academic_year: d.academic_year,
            due_date: d.due_date,
            status: d.status.unwrap_or_default(),
        });

        StudentLookup { student, debt }
    }
}

/// `GET /transactions/me` answers with a bare array or wraps it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TransactionList {
    Bare(Vec<TransactionRecord>),
    Wrapped {
        #[serde(default)]
        transactions: Vec<TransactionRecord>,
    },
}

impl TransactionList {
    pub fn into_records(self) -> Vec<TransactionRecord> {
        match self {
            Self::Bare(records) | Self::Wrapped { transactions: records } => records,
        }
    }
}
