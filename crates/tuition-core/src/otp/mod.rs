//! One-time-password challenge domain module.
//!
//! - `code`: shape validation for user-entered codes
//! - `challenge`: the countdown-bounded challenge guarding a pending transaction

mod challenge;
mod code;

pub use challenge::{
    ChallengeClosed, CountdownDisplay, DEFAULT_COUNTDOWN_SECS, EXPIRED_LABEL, OtpChallenge,
    OtpState,
};
pub use code::{OTP_LENGTH, OtpCode};
