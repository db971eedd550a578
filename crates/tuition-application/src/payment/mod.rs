//! The OTP-confirmed payment flow.
//!
//! - `lookup`: sequencing of student lookups and their outcomes
//! - `countdown`: the one-second ticker driving an open challenge
//! - `outcome`: results of confirm, verify and resend
//! - `flow`: the orchestrator owning flow state

mod countdown;
mod flow;
mod lookup;
mod outcome;

pub use flow::{PaymentFlow, PaymentFlowSettings};
pub use lookup::LookupOutcome;
pub use outcome::{ConfirmOutcome, PaymentReceipt, ResendOutcome, VerifyOutcome};
