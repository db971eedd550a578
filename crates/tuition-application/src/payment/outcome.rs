use chrono::{DateTime, Utc};
use tuition_core::Money;
use tuition_core::otp::ChallengeClosed;
use tuition_core::payment::PreconditionFailure;
use tuition_core::student::{DebtRecord, StudentRecord};
use tuition_core::transaction::TransactionId;

pub(crate) const PROCESSING_MESSAGE: &str = "Processing payment...";
pub(crate) const SETTLEMENT_FALLBACK_MESSAGE: &str = "Payment failed. Please try again.";
pub(crate) const SETTLEMENT_TRANSPORT_MESSAGE: &str =
    "Payment processing failed. Please check your connection and try again.";
pub(crate) const MALFORMED_CODE_MESSAGE: &str = "Please enter a valid 6-digit OTP code";
pub(crate) const INVALID_CODE_MESSAGE: &str = "Invalid OTP code";
pub(crate) const VERIFICATION_FAILED_MESSAGE: &str = "Verification failed. Please try again.";
pub(crate) const EXPIRED_MESSAGE: &str = "OTP has expired. Please request a new one.";
pub(crate) const NO_CHALLENGE_MESSAGE: &str = "No OTP challenge is active.";
pub(crate) const RESENT_MESSAGE: &str = "A new otp has been sent to your email";
pub(crate) const RESEND_FAILED_MESSAGE: &str = "Failed to resend OTP. Please try again.";
pub(crate) const SUCCESS_MESSAGE: &str = "Payment successful!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The pending transaction exists and an OTP challenge is running.
    ChallengeOpened {
        transaction_id: TransactionId,
        expires_at: DateTime<Utc>,
    },
    Blocked(PreconditionFailure),
    /// The backend refused to create the pending transaction.
    SettlementRejected(String),
    /// The flow was reset (logout) while the transaction was being created;
    /// no challenge was opened.
    Superseded,
}

impl ConfirmOutcome {
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::ChallengeOpened { .. } => None,
            Self::Blocked(failure) => Some(failure.user_message()),
            Self::SettlementRejected(message) => Some(message),
            Self::Superseded => None,
        }
    }
}

/// What a verified payment settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub transaction_id: TransactionId,
    pub student: StudentRecord,
    pub debt: DebtRecord,
    pub amount: Money,
    pub new_balance: Money,
    /// Where the backend sends the confirmation email.
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified(PaymentReceipt),
    /// Not six digits; nothing was sent.
    MalformedCode,
    /// The backend rejected the code; the challenge stays open.
    InvalidCode,
    Expired,
    NoActiveChallenge,
    /// The verification call itself failed; the challenge stays open.
    VerificationFailed(String),
}

impl VerifyOutcome {
    pub fn user_message(&self) -> &str {
        match self {
            Self::Verified(_) => SUCCESS_MESSAGE,
            Self::MalformedCode => MALFORMED_CODE_MESSAGE,
            Self::InvalidCode => INVALID_CODE_MESSAGE,
            Self::Expired => EXPIRED_MESSAGE,
            Self::NoActiveChallenge => NO_CHALLENGE_MESSAGE,
            Self::VerificationFailed(_) => VERIFICATION_FAILED_MESSAGE,
        }
    }
}

impl From<ChallengeClosed> for VerifyOutcome {
    fn from(closed: ChallengeClosed) -> Self {
        match closed {
            ChallengeClosed::Expired => Self::Expired,
            ChallengeClosed::Finished => Self::NoActiveChallenge,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendOutcome {
    Sent,
    NoActiveChallenge,
    Failed(String),
}

impl ResendOutcome {
    pub fn user_message(&self) -> &str {
        match self {
            Self::Sent => RESENT_MESSAGE,
            Self::NoActiveChallenge => NO_CHALLENGE_MESSAGE,
            Self::Failed(_) => RESEND_FAILED_MESSAGE,
        }
    }
}
