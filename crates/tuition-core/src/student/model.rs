//! Receiver-side models: the student being paid for and their tuition debt.

use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Settlement state of a tuition debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum DebtStatus {
    #[default]
    Unpaid,
    Paid,
    /// Any status this client does not know; treated as unpaid.
    #[serde(other)]
    Unknown,
}

/// The student receiving the payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub program: Option<String>,
}

/// A tuition debt as reported by the receiver lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtRecord {
    #[serde(default)]
    pub debt_id: Option<i64>,
    #[serde(default)]
    pub amount: Money,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default, with = "crate::timestamp::optional")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: DebtStatus,
}

impl DebtRecord {
    /// A debt is payable when it has an id, a positive amount and is not paid.
    pub fn is_actionable(&self) -> bool {
        self.debt_id.is_some() && self.amount > 0 && self.status != DebtStatus::Paid
    }
}

/// The raw answer of a receiver lookup: the student and whatever debt the
/// backend attached, actionable or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentLookup {
    pub student: StudentRecord,
    pub debt: Option<DebtRecord>,
}

impl StudentLookup {
    /// The debt, if it can be paid.
    pub fn actionable_debt(&self) -> Option<&DebtRecord> {
        self.debt.as_ref().filter(|debt| debt.is_actionable())
    }
}

/// Normalizes a human-entered student identifier: surrounding whitespace
/// removed, upper-cased.
pub fn normalize_student_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}
