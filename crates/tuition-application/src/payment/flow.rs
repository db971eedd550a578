//! PaymentFlow - orchestrates lookup, preconditions, settlement and OTP.
//!
//! ```text
//! lookup --Eligible--> confirm --preconditions--> create pending --> OTP Open
//!                                                                      |
//!                         verify ok --> debit balance, receipt <-------+
//! ```
//!
//! Flow state (selected student, active challenge) lives behind one mutex.
//! Network calls are made with the lock released; results are applied only
//! if the state they were started from is still current.

use super::countdown::Countdown;
use super::lookup::{
    FOUND_MESSAGE, INVALID_ID_MESSAGE, LOOKUP_TRANSPORT_MESSAGE, LookupOutcome, LookupSequencer,
    NO_DEBT_MESSAGE, NOT_FOUND_MESSAGE,
};
use super::outcome::{
    ConfirmOutcome, EXPIRED_MESSAGE, INVALID_CODE_MESSAGE, MALFORMED_CODE_MESSAGE,
    PROCESSING_MESSAGE, PaymentReceipt, RESEND_FAILED_MESSAGE, RESENT_MESSAGE, ResendOutcome,
    SETTLEMENT_FALLBACK_MESSAGE, SETTLEMENT_TRANSPORT_MESSAGE, SUCCESS_MESSAGE,
    VERIFICATION_FAILED_MESSAGE, VerifyOutcome,
};
use crate::notice::Notice;
use crate::presenter::FlowPresenter;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tuition_core::config::ClientConfig;
use tuition_core::gateway::BankingGateway;
use tuition_core::otp::{ChallengeClosed, OtpChallenge, OtpCode, OtpState};
use tuition_core::payment::{PaymentPlan, PaymentSelection, PreconditionFailure, check_local};
use tuition_core::session::{Session, SessionStore};
use tuition_core::student::normalize_student_id;
use tuition_core::transaction::{PendingTransaction, TransactionId};
use tuition_core::{Money, Result, TuitionError};

/// Tunables of the payment flow, usually taken from [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentFlowSettings {
    pub min_student_id_len: usize,
    pub countdown_secs: u32,
    pub restart_countdown_on_resend: bool,
    pub reconcile_balance_after_payment: bool,
    pub notice_ttl: Duration,
}

impl PaymentFlowSettings {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            min_student_id_len: config.min_student_id_len,
            countdown_secs: config.otp.countdown_secs,
            restart_countdown_on_resend: config.otp.restart_countdown_on_resend,
            reconcile_balance_after_payment: config.payment.reconcile_balance_after_payment,
            notice_ttl: config.notice_ttl(),
        }
    }
}

impl Default for PaymentFlowSettings {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// A running challenge together with what it will settle.
pub(crate) struct ActiveChallenge {
    pub challenge: OtpChallenge,
    pub plan: PaymentPlan,
    /// Dropping the countdown stops it.
    _countdown: Countdown,
}

#[derive(Default)]
pub(crate) struct FlowState {
    pub selection: Option<PaymentSelection>,
    pub challenge: Option<ActiveChallenge>,
    /// A confirmation is between its precondition check and opening the challenge.
    pub confirming: bool,
    /// Bumped by `reset`; a confirmation started under an older generation
    /// must not open its challenge.
    pub generation: u64,
}

pub struct PaymentFlow {
    gateway: Arc<dyn BankingGateway>,
    sessions: Arc<dyn SessionStore>,
    presenter: Arc<dyn FlowPresenter>,
    settings: PaymentFlowSettings,
    lookups: LookupSequencer,
    state: Arc<Mutex<FlowState>>,
}

impl PaymentFlow {
    pub fn new(
        gateway: Arc<dyn BankingGateway>,
        sessions: Arc<dyn SessionStore>,
        presenter: Arc<dyn FlowPresenter>,
        settings: PaymentFlowSettings,
    ) -> Self {
        Self {
            gateway,
            sessions,
            presenter,
            settings,
            lookups: LookupSequencer::default(),
            state: Arc::new(Mutex::new(FlowState::default())),
        }
    }

    // ============================================================================
    // Queries
    // ============================================================================

    /// The student and debt currently displayed for payment.
    pub async fn selection(&self) -> Option<PaymentSelection> {
        self.state.lock().await.selection.clone()
    }

    /// Whether confirming would pass the selection check.
    pub async fn confirm_enabled(&self) -> bool {
        self.state.lock().await.selection.is_some()
    }

    /// A snapshot of the current challenge, if one is open or expired.
    pub async fn challenge(&self) -> Option<OtpChallenge> {
        self.state
            .lock()
            .await
            .challenge
            .as_ref()
            .map(|active| active.challenge.clone())
    }

    // ============================================================================
    // Student lookup
    // ============================================================================

    /// Looks up a student and the debt to pay.
    ///
    /// Identifiers shorter than the configured minimum are rejected with a
    /// validation error before any network call. Only the latest lookup may
    /// change the displayed student; older responses resolve to
    /// [`LookupOutcome::Superseded`].
    pub async fn lookup(&self, raw_id: &str) -> Result<LookupOutcome> {
        let student_id = normalize_student_id(raw_id);
        let seq = self.lookups.issue();

        if student_id.chars().count() < self.settings.min_student_id_len {
            let mut state = self.state.lock().await;
            if self.lookups.is_latest(seq) {
                self.clear_selection(&mut state);
            }
            self.notify_error(INVALID_ID_MESSAGE);
            return Err(TuitionError::validation(INVALID_ID_MESSAGE));
        }

        let session = self.require_session().await?;
        tracing::debug!("[PaymentFlow] Lookup #{} for {}", seq, student_id);

        let outcome = match self.gateway.lookup_student(session.token(), &student_id).await {
            Ok(lookup) => match lookup.actionable_debt().cloned() {
                Some(debt) => LookupOutcome::Eligible {
                    student: lookup.student,
                    debt,
                },
                None => LookupOutcome::NoDebt {
                    student: lookup.student,
                },
            },
            Err(TuitionError::NotFound { .. }) => {
                LookupOutcome::NotFound(NOT_FOUND_MESSAGE.to_string())
            }
            Err(TuitionError::Rejected { detail, .. }) => {
                LookupOutcome::NotFound(detail.unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()))
            }
            Err(e) if e.is_auth() => return Err(e),
            Err(e) => {
                tracing::warn!("[PaymentFlow] Lookup #{} failed: {}", seq, e);
                LookupOutcome::TransportError(e.to_string())
            }
        };

        let mut state = self.state.lock().await;
        if !self.lookups.is_latest(seq) {
            tracing::debug!("[PaymentFlow] Lookup #{} superseded, discarding", seq);
            return Ok(LookupOutcome::Superseded);
        }

        match &outcome {
            LookupOutcome::Eligible { student, debt } => {
                state.selection = Some(PaymentSelection {
                    student: student.clone(),
                    debt: debt.clone(),
                });
                self.presenter.student_changed(Some((student, debt)));
                self.presenter.confirm_enabled(true);
                self.presenter
                    .notice(Notice::success(FOUND_MESSAGE, self.settings.notice_ttl));
            }
            LookupOutcome::NoDebt { .. } => {
                self.clear_selection(&mut state);
                self.presenter
                    .notice(Notice::info(NO_DEBT_MESSAGE, self.settings.notice_ttl));
            }
            LookupOutcome::NotFound(message) => {
                self.clear_selection(&mut state);
                self.notify_error(message);
            }
            LookupOutcome::TransportError(_) => {
                self.clear_selection(&mut state);
                self.notify_error(LOOKUP_TRANSPORT_MESSAGE);
            }
            LookupOutcome::Superseded => {}
        }

        Ok(outcome)
    }

    fn clear_selection(&self, state: &mut FlowState) {
        state.selection = None;
        self.presenter.student_changed(None);
        self.presenter.confirm_enabled(false);
    }

    // ============================================================================
    // Confirmation: preconditions and pending transaction
    // ============================================================================

    /// Runs the payment preconditions, creates the pending transaction and
    /// opens its OTP challenge.
    ///
    /// Only a missing or rejected session is returned as an error; every
    /// other failure is an outcome.
    pub async fn confirm(&self) -> Result<ConfirmOutcome> {
        let session = self.require_session().await?;

        let (plan, generation) = {
            let mut state = self.state.lock().await;
            let in_progress = state.confirming
                || state
                    .challenge
                    .as_ref()
                    .is_some_and(|active| active.challenge.is_open());
            if in_progress {
                return Ok(self.blocked(PreconditionFailure::ChallengeInProgress));
            }
            match check_local(state.selection.as_ref(), &session) {
                Ok(plan) => {
                    state.confirming = true;
                    (plan, state.generation)
                }
                Err(failure) => return Ok(self.blocked(failure)),
            }
        };

        let result = self.submit(&session, plan, generation).await;
        let mut state = self.state.lock().await;
        if state.generation == generation {
            state.confirming = false;
        }
        result
    }

    async fn submit(
        &self,
        session: &Session,
        plan: PaymentPlan,
        generation: u64,
    ) -> Result<ConfirmOutcome> {
        let token = session.token();

        match self
            .gateway
            .has_pending_transaction(token, plan.receiver_id())
            .await
        {
            Ok(false) => {}
            Ok(true) => {
                return Ok(self.blocked(PreconditionFailure::DuplicatePending {
                    receiver_id: plan.receiver_id().to_string(),
                }));
            }
            Err(e) if e.is_auth() => return Err(e),
            Err(e) => {
                tracing::warn!("[PaymentFlow] Pending check failed: {}", e);
                let failure = PreconditionFailure::PreconditionCheckFailed(e.to_string());
                return Ok(self.blocked(failure));
            }
        }

        self.presenter
            .notice(Notice::info(PROCESSING_MESSAGE, self.settings.notice_ttl));

        let request = plan.to_request();
        let transaction_id = match self.gateway.create_transaction(token, &request).await {
            Ok(id) => id,
            Err(e) if e.is_auth() => return Err(e),
            Err(e) => {
                tracing::warn!("[PaymentFlow] Create transaction failed: {}", e);
                let message = match &e {
                    TuitionError::Transport(_) => SETTLEMENT_TRANSPORT_MESSAGE.to_string(),
                    other => other
                        .rejection_detail()
                        .unwrap_or(SETTLEMENT_FALLBACK_MESSAGE)
                        .to_string(),
                };
                self.notify_error(&message);
                return Ok(ConfirmOutcome::SettlementRejected(message));
            }
        };

        tracing::info!(
            "[PaymentFlow] Pending transaction {} created for {}",
            transaction_id,
            plan.receiver_id()
        );

        let pending = PendingTransaction {
            transaction_id: transaction_id.clone(),
            payer_id: plan.payer_id,
            receiver_id: plan.receiver_id().to_string(),
            debt_id: plan.debt_id,
            amount: plan.amount,
        };
        let challenge = OtpChallenge::open(pending, self.settings.countdown_secs, Utc::now());
        let expires_at = challenge.expires_at();

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::warn!(
                "[PaymentFlow] Flow was reset while creating {}; not opening its challenge",
                transaction_id
            );
            return Ok(ConfirmOutcome::Superseded);
        }
        self.presenter.otp_opened(&challenge);
        // an expired challenge left from an earlier confirmation is replaced here
        state.challenge = Some(ActiveChallenge {
            challenge,
            plan,
            _countdown: Countdown::start(
                self.state.clone(),
                self.presenter.clone(),
                transaction_id.clone(),
            ),
        });

        Ok(ConfirmOutcome::ChallengeOpened {
            transaction_id,
            expires_at,
        })
    }

    fn blocked(&self, failure: PreconditionFailure) -> ConfirmOutcome {
        tracing::info!("[PaymentFlow] Confirmation blocked: {:?}", failure);
        self.notify_error(failure.user_message());
        ConfirmOutcome::Blocked(failure)
    }

    // ============================================================================
    // OTP verification
    // ============================================================================

    /// Submits a code for the open challenge.
    ///
    /// A backend acceptance finalizes the payment: the challenge is destroyed
    /// and the local balance debited, exactly once. An acceptance arriving
    /// after the challenge expired or was closed changes nothing.
    pub async fn verify(&self, raw_code: &str) -> Result<VerifyOutcome> {
        let Some(code) = OtpCode::parse(raw_code) else {
            self.presenter.otp_error(MALFORMED_CODE_MESSAGE);
            return Ok(VerifyOutcome::MalformedCode);
        };

        let session = self.require_session().await?;
        let transaction_id = {
            let state = self.state.lock().await;
            match self.open_transaction(&state) {
                Ok(id) => id,
                Err(outcome) => return Ok(outcome),
            }
        };

        match self
            .gateway
            .verify_otp(session.token(), &transaction_id, &code)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_auth() => return Err(e),
            Err(e) if e.is_transport() => {
                tracing::warn!("[PaymentFlow] Verification of {} failed: {}", transaction_id, e);
                self.presenter.otp_error(VERIFICATION_FAILED_MESSAGE);
                return Ok(VerifyOutcome::VerificationFailed(e.to_string()));
            }
            Err(e) => {
                tracing::info!("[PaymentFlow] Code rejected for {}: {}", transaction_id, e);
                self.presenter.otp_error(INVALID_CODE_MESSAGE);
                return Ok(VerifyOutcome::InvalidCode);
            }
        }

        let active = {
            let mut state = self.state.lock().await;
            let current = state
                .challenge
                .as_mut()
                .filter(|active| active.challenge.transaction_id() == &transaction_id);
            let Some(current) = current else {
                tracing::warn!(
                    "[PaymentFlow] Verification of {} arrived after the challenge closed",
                    transaction_id
                );
                return Ok(VerifyOutcome::NoActiveChallenge);
            };
            if let Err(closed) = current.challenge.mark_verified() {
                tracing::warn!(
                    "[PaymentFlow] Verification of {} arrived too late: {}",
                    transaction_id,
                    closed
                );
                return Ok(closed.into());
            }

            let active = state.challenge.take();
            state.selection = None;
            self.presenter.otp_closed();
            self.presenter.student_changed(None);
            self.presenter.confirm_enabled(false);
            active
        };
        let Some(active) = active else {
            return Ok(VerifyOutcome::NoActiveChallenge);
        };

        let amount = active.plan.amount;
        let mut new_balance = self.sessions.debit(amount).await?;
        if self.settings.reconcile_balance_after_payment {
            new_balance = self.reconcile_balance(&session).await.unwrap_or(new_balance);
        }

        tracing::info!(
            "[PaymentFlow] Transaction {} verified, balance now {}",
            transaction_id,
            new_balance
        );

        let receipt = PaymentReceipt {
            transaction_id,
            student: active.plan.student,
            debt: active.plan.debt,
            amount,
            new_balance,
            email: session.user().email.clone(),
        };
        self.presenter.payment_succeeded(&receipt);
        self.presenter
            .notice(Notice::success(SUCCESS_MESSAGE, self.settings.notice_ttl));
        Ok(VerifyOutcome::Verified(receipt))
    }

    /// Transaction id of the challenge if it accepts verification.
    fn open_transaction(
        &self,
        state: &FlowState,
    ) -> std::result::Result<TransactionId, VerifyOutcome> {
        let Some(active) = state.challenge.as_ref() else {
            return Err(VerifyOutcome::NoActiveChallenge);
        };
        match active.challenge.ensure_open() {
            Ok(()) => Ok(active.challenge.transaction_id().clone()),
            Err(ChallengeClosed::Expired) => {
                self.presenter.otp_error(EXPIRED_MESSAGE);
                Err(VerifyOutcome::Expired)
            }
            Err(ChallengeClosed::Finished) => Err(VerifyOutcome::NoActiveChallenge),
        }
    }

    /// Replaces the locally debited balance by the backend's.
    async fn reconcile_balance(&self, session: &Session) -> Option<Money> {
        match self.gateway.current_user(session.token()).await {
            Ok(user) => {
                let balance = user.available_balance;
                if let Err(e) = self.sessions.replace_user(user).await {
                    tracing::warn!("[PaymentFlow] Could not store refreshed user: {}", e);
                    return None;
                }
                Some(balance)
            }
            Err(e) => {
                tracing::warn!("[PaymentFlow] Balance reconciliation failed: {}", e);
                None
            }
        }
    }

    // ============================================================================
    // Resend and abandon
    // ============================================================================

    /// Asks the backend to issue a new code for the current transaction.
    ///
    /// With `restart_countdown_on_resend` the challenge restarts its full
    /// countdown, re-opening it if it had expired.
    pub async fn resend(&self) -> Result<ResendOutcome> {
        let session = self.require_session().await?;
        let transaction_id = {
            let state = self.state.lock().await;
            match state.challenge.as_ref() {
                Some(active)
                    if matches!(active.challenge.state(), OtpState::Open | OtpState::Expired) =>
                {
                    active.challenge.transaction_id().clone()
                }
                _ => return Ok(ResendOutcome::NoActiveChallenge),
            }
        };

        match self.gateway.resend_otp(session.token(), &transaction_id).await {
            Ok(()) => {}
            Err(e) if e.is_auth() => return Err(e),
            Err(e) => {
                tracing::warn!("[PaymentFlow] Resend for {} failed: {}", transaction_id, e);
                self.presenter.otp_error(RESEND_FAILED_MESSAGE);
                return Ok(ResendOutcome::Failed(e.to_string()));
            }
        }

        let mut state = self.state.lock().await;
        if self.settings.restart_countdown_on_resend {
            if let Some(active) = state
                .challenge
                .as_mut()
                .filter(|active| active.challenge.transaction_id() == &transaction_id)
            {
                if active.challenge.reissue(Utc::now()) {
                    // replacing the countdown stops the previous ticker
                    active._countdown = Countdown::start(
                        self.state.clone(),
                        self.presenter.clone(),
                        transaction_id.clone(),
                    );
                    self.presenter.countdown(active.challenge.display());
                }
            }
        }
        tracing::info!("[PaymentFlow] New OTP issued for {}", transaction_id);
        self.presenter.otp_error(RESENT_MESSAGE);
        Ok(ResendOutcome::Sent)
    }

    /// The user walked away from the OTP prompt.
    ///
    /// Stops the countdown and forgets the challenge. The pending transaction
    /// stays on the backend; no call is made. Returns whether a challenge
    /// was active.
    pub async fn abandon(&self) -> bool {
        let mut state = self.state.lock().await;
        let Some(mut active) = state.challenge.take() else {
            return false;
        };
        active.challenge.abandon();
        tracing::info!(
            "[PaymentFlow] Challenge for {} abandoned",
            active.challenge.transaction_id()
        );
        self.presenter.otp_closed();
        true
    }

    /// Drops all flow state (logout).
    pub async fn reset(&self) {
        // invalidates lookups still in flight
        self.lookups.issue();
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.confirming = false;
        if state.challenge.take().is_some() {
            self.presenter.otp_closed();
        }
        self.clear_selection(&mut state);
    }

    async fn require_session(&self) -> Result<Session> {
        self.sessions
            .load()
            .await
            .ok_or_else(|| TuitionError::auth("Please log in first"))
    }

    fn notify_error(&self, message: &str) {
        self.presenter
            .notice(Notice::error(message, self.settings.notice_ttl));
    }
}
