//! The OTP challenge state machine.
//!
//! A challenge exists only between "pending transaction created" and
//! "verified or abandoned". Absence of a challenge is the closed state.
//!
//! ```text
//! (none) --open--> Open --tick x N--> Expired
//!                   |  \--verify ok--> Verified
//!                   \--abandon-------> Abandoned
//! Expired --reissue--> Open
//! ```

use crate::format::format_countdown;
use crate::transaction::{PendingTransaction, TransactionId};
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use thiserror::Error;

/// Default lifetime of a challenge, in one-second ticks.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 300;

/// Marker displayed once the countdown has run out.
pub const EXPIRED_LABEL: &str = "EXPIRED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpState {
    Open,
    Verified,
    Expired,
    Abandoned,
}

/// Why a challenge refused to accept a verification.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeClosed {
    #[error("OTP has expired. Please request a new one.")]
    Expired,
    #[error("No OTP challenge is active.")]
    Finished,
}

/// What the countdown shows: `MM:SS` while running, `EXPIRED` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownDisplay {
    pub remaining_secs: u32,
    pub expired: bool,
}

impl fmt::Display for CountdownDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expired {
            f.write_str(EXPIRED_LABEL)
        } else {
            f.write_str(&format_countdown(self.remaining_secs))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pending: PendingTransaction,
    state: OtpState,
    countdown_secs: u32,
    remaining_secs: u32,
    expires_at: DateTime<Utc>,
}

impl OtpChallenge {
    /// Opens a challenge for a freshly created pending transaction.
    pub fn open(pending: PendingTransaction, countdown_secs: u32, now: DateTime<Utc>) -> Self {
        Self {
            pending,
            state: OtpState::Open,
            countdown_secs,
            remaining_secs: countdown_secs,
            expires_at: now + Duration::seconds(i64::from(countdown_secs)),
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.pending.transaction_id
    }

    pub fn state(&self) -> OtpState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == OtpState::Open
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn display(&self) -> CountdownDisplay {
        CountdownDisplay {
            remaining_secs: self.remaining_secs,
            expired: self.state == OtpState::Expired,
        }
    }

    /// Advances the countdown by one second. Only an open challenge ticks;
    /// reaching zero expires it.
    pub fn tick(&mut self) -> OtpState {
        if self.state == OtpState::Open {
            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            if self.remaining_secs == 0 {
                self.state = OtpState::Expired;
            }
        }
        self.state
    }

    /// Checks that a verification may be attempted right now.
    pub fn ensure_open(&self) -> Result<(), ChallengeClosed> {
        match self.state {
            OtpState::Open => Ok(()),
            OtpState::Expired => Err(ChallengeClosed::Expired),
            OtpState::Verified | OtpState::Abandoned => Err(ChallengeClosed::Finished),
        }
    }

    /// Records a backend-accepted verification. Succeeds at most once.
    pub fn mark_verified(&mut self) -> Result<&PendingTransaction, ChallengeClosed> {
        self.ensure_open()?;
        self.state = OtpState::Verified;
        Ok(&self.pending)
    }

    /// The user walked away; the countdown stops for good.
    pub fn abandon(&mut self) {
        if matches!(self.state, OtpState::Open | OtpState::Expired) {
            self.state = OtpState::Abandoned;
        }
    }

    /// A new code was issued for the same transaction: restart the full
    /// countdown. Has no effect once verified or abandoned.
    pub fn reissue(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            OtpState::Open | OtpState::Expired => {
                self.state = OtpState::Open;
                self.remaining_secs = self.countdown_secs;
                self.expires_at = now + Duration::seconds(i64::from(self.countdown_secs));
                true
            }
            OtpState::Verified | OtpState::Abandoned => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> PendingTransaction {
        PendingTransaction {
            transaction_id: TransactionId::new("TX1"),
            payer_id: 1,
            receiver_id: "SV0001234".to_string(),
            debt_id: 10,
            amount: 5_000_000,
        }
    }

    #[test]
    fn test_open_challenge_shows_full_countdown() {
        let now = Utc::now();
        let challenge = OtpChallenge::open(pending(), DEFAULT_COUNTDOWN_SECS, now);
        assert!(challenge.is_open());
        assert_eq!(challenge.display().to_string(), "05:00");
        assert_eq!(challenge.expires_at(), now + Duration::seconds(300));
    }

    #[test]
    fn test_expires_after_exactly_countdown_ticks() {
        let mut challenge = OtpChallenge::open(pending(), DEFAULT_COUNTDOWN_SECS, Utc::now());
        for _ in 0..299 {
            assert_eq!(challenge.tick(), OtpState::Open);
        }
        assert_eq!(challenge.display().to_string(), "00:01");
        assert_eq!(challenge.tick(), OtpState::Expired);
        assert_eq!(challenge.display().to_string(), EXPIRED_LABEL);

        // frozen afterwards
        assert_eq!(challenge.tick(), OtpState::Expired);
        assert_eq!(challenge.remaining_secs(), 0);
        assert_eq!(challenge.ensure_open(), Err(ChallengeClosed::Expired));
    }

    #[test]
    fn test_verification_succeeds_only_once() {
        let mut challenge = OtpChallenge::open(pending(), 300, Utc::now());
        assert_eq!(challenge.mark_verified().unwrap().amount, 5_000_000);
        assert_eq!(challenge.mark_verified(), Err(ChallengeClosed::Finished));
        assert_eq!(challenge.tick(), OtpState::Verified);
    }

    #[test]
    fn test_reissue_reopens_expired_challenge() {
        let mut challenge = OtpChallenge::open(pending(), 2, Utc::now());
        challenge.tick();
        challenge.tick();
        assert_eq!(challenge.state(), OtpState::Expired);

        assert!(challenge.reissue(Utc::now()));
        assert!(challenge.is_open());
        assert_eq!(challenge.remaining_secs(), 2);
    }

    #[test]
    fn test_abandoned_challenge_cannot_be_revived() {
        let mut challenge = OtpChallenge::open(pending(), 300, Utc::now());
        challenge.abandon();
        assert_eq!(challenge.state(), OtpState::Abandoned);
        assert!(!challenge.reissue(Utc::now()));
        assert_eq!(challenge.ensure_open(), Err(ChallengeClosed::Finished));
    }
}
