use std::sync::atomic::{AtomicU64, Ordering};
use tuition_core::student::{DebtRecord, StudentRecord};

pub(crate) const INVALID_ID_MESSAGE: &str = "Please enter a valid student ID";
pub(crate) const FOUND_MESSAGE: &str = "Student information retrieved successfully!";
pub(crate) const NOT_FOUND_MESSAGE: &str = "Student not found or no pending tuition debt";
pub(crate) const NO_DEBT_MESSAGE: &str =
    "This student has no pending tuition debt. All tuition fees have been paid.";
pub(crate) const LOOKUP_TRANSPORT_MESSAGE: &str =
    "Failed to retrieve student information. Please check if the backend is running.";

/// Result of a student lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The student owes a payable debt; confirmation is enabled.
    Eligible {
        student: StudentRecord,
        debt: DebtRecord,
    },
    /// The student exists but nothing is payable.
    NoDebt { student: StudentRecord },
    /// The backend does not know the identifier (or refused the lookup).
    NotFound(String),
    TransportError(String),
    /// A newer lookup was issued while this one was in flight; its result
    /// was discarded.
    Superseded,
}

impl LookupOutcome {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible { .. })
    }

    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Eligible { .. } => Some(FOUND_MESSAGE),
            Self::NoDebt { .. } => Some(NO_DEBT_MESSAGE),
            Self::NotFound(message) => Some(message),
            Self::TransportError(_) => Some(LOOKUP_TRANSPORT_MESSAGE),
            Self::Superseded => None,
        }
    }
}

/// Hands out lookup sequence numbers; only the latest one may update state.
#[derive(Debug, Default)]
pub(crate) struct LookupSequencer {
    latest: AtomicU64,
}

impl LookupSequencer {
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }
}
