//! Local payment preconditions.
//!
//! Checked in order, stopping at the first failure:
//! 1. a student with an eligible debt is selected
//! 2. the debt has an id and a positive amount
//! 3. the payer's balance covers the amount
//!
//! The fourth check (no pending transaction for the receiver) needs the
//! backend and lives with the payment flow; its failures are part of
//! [`PreconditionFailure`] so callers see one vocabulary.

use crate::money::Money;
use crate::session::Session;
use crate::student::{DebtRecord, StudentRecord};
use crate::transaction::NewTransaction;

/// The student and debt currently selected for payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSelection {
    pub student: StudentRecord,
    pub debt: DebtRecord,
}

/// Everything needed to create the pending transaction, frozen at confirm time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentPlan {
    pub payer_id: i64,
    pub available_balance: Money,
    pub student: StudentRecord,
    pub debt: DebtRecord,
    pub debt_id: i64,
    pub amount: Money,
}

impl PaymentPlan {
    pub fn receiver_id(&self) -> &str {
        &self.student.student_id
    }

    pub fn to_request(&self) -> NewTransaction {
        NewTransaction {
            payer_id: self.payer_id,
            receiver_id: self.student.student_id.clone(),
            debt_id: self.debt_id,
            amount: self.amount,
            available_balance: self.available_balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionFailure {
    NoStudentSelected,
    InvalidDebt,
    InsufficientBalance { required: Money, available: Money },
    DuplicatePending { receiver_id: String },
    /// The pending-transaction check itself could not be completed.
    PreconditionCheckFailed(String),
    /// A challenge for an earlier confirmation is still open.
    ChallengeInProgress,
}

impl PreconditionFailure {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoStudentSelected => "Please lookup student information first",
            Self::InvalidDebt => "Cannot process payment: No valid tuition debt found",
            Self::InsufficientBalance { .. } => "Insufficient balance. Please top up your account.",
            Self::DuplicatePending { .. } => {
                "There is already a pending transaction for this student. Please try again later."
            }
            Self::PreconditionCheckFailed(_) => {
                "Failed to verify transaction status. Please try again."
            }
            Self::ChallengeInProgress => {
                "Please finish or cancel the current OTP confirmation first"
            }
        }
    }
}

/// Runs checks 1-3 against the session and selection.
pub fn check_local(
    selection: Option<&PaymentSelection>,
    session: &Session,
) -> Result<PaymentPlan, PreconditionFailure> {
    let selection = selection.ok_or(PreconditionFailure::NoStudentSelected)?;

    let debt_id = match selection.debt.debt_id {
        Some(id) if selection.debt.amount > 0 => id,
        _ => return Err(PreconditionFailure::InvalidDebt),
    };

    let amount = selection.debt.amount;
    let available = session.available_balance();
    if amount > available {
        return Err(PreconditionFailure::InsufficientBalance {
            required: amount,
            available,
        });
    }

    Ok(PaymentPlan {
        payer_id: session.user().id,
        available_balance: available,
        student: selection.student.clone(),
        debt: selection.debt.clone(),
        debt_id,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AccessToken, UserRecord};
    use crate::student::DebtStatus;

    fn session(balance: Money) -> Session {
        Session::new(
            AccessToken::new("token"),
            UserRecord {
                id: 1,
                username: Some("payer".to_string()),
                full_name: "Payer".to_string(),
                email: "payer@example.com".to_string(),
                phone: None,
                available_balance: balance,
            },
        )
    }

    fn selection(debt_id: Option<i64>, amount: Money) -> PaymentSelection {
        PaymentSelection {
            student: StudentRecord {
                student_id: "SV0001234".to_string(),
                full_name: "Tran Thi B".to_string(),
                program: Some("CS".to_string()),
            },
            debt: DebtRecord {
                debt_id,
                amount,
                semester: None,
                academic_year: None,
                due_date: None,
                status: DebtStatus::Unpaid,
            },
        }
    }

    #[test]
    fn test_no_selection() {
        assert_eq!(
            check_local(None, &session(10)),
            Err(PreconditionFailure::NoStudentSelected)
        );
    }

    #[test]
    fn test_invalid_debt_checked_before_balance() {
        let result = check_local(Some(&selection(None, 5_000_000)), &session(0));
        assert_eq!(result, Err(PreconditionFailure::InvalidDebt));
        let result = check_local(Some(&selection(Some(1), 0)), &session(0));
        assert_eq!(result, Err(PreconditionFailure::InvalidDebt));
    }

    #[test]
    fn test_insufficient_balance() {
        let result = check_local(Some(&selection(Some(1), 5_000_000)), &session(1_000_000));
        assert_eq!(
            result,
            Err(PreconditionFailure::InsufficientBalance {
                required: 5_000_000,
                available: 1_000_000
            })
        );
    }

    #[test]
    fn test_exact_balance_is_enough() {
        let plan = check_local(Some(&selection(Some(1), 5_000_000)), &session(5_000_000)).unwrap();
        let request = plan.to_request();
        assert_eq!(request.receiver_id, "SV0001234");
        assert_eq!(request.amount, 5_000_000);
        assert_eq!(request.available_balance, 5_000_000);
        assert_eq!(request.payer_id, 1);
    }
}
