use super::flow::FlowState;
use super::outcome::EXPIRED_MESSAGE;
use crate::presenter::FlowPresenter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tuition_core::otp::OtpState;
use tuition_core::transaction::TransactionId;

/// Ticks the open challenge of `transaction_id` once per second until it
/// leaves the `Open` state or the countdown is dropped.
pub(crate) struct Countdown {
    cancel: CancellationToken,
}

impl Countdown {
    pub fn start(
        state: Arc<Mutex<FlowState>>,
        presenter: Arc<dyn FlowPresenter>,
        transaction_id: TransactionId,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            // the first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let mut guard = state.lock().await;
                // a stop may have raced with the tick
                if token.is_cancelled() {
                    break;
                }
                let Some(active) = guard
                    .challenge
                    .as_mut()
                    .filter(|active| active.challenge.transaction_id() == &transaction_id)
                else {
                    break;
                };

                let next = active.challenge.tick();
                presenter.countdown(active.challenge.display());
                match next {
                    OtpState::Open => {}
                    OtpState::Expired => {
                        tracing::info!(
                            "[Countdown] OTP for transaction {} expired",
                            transaction_id
                        );
                        presenter.otp_error(EXPIRED_MESSAGE);
                        break;
                    }
                    OtpState::Verified | OtpState::Abandoned => break,
                }
            }
            tracing::debug!("[Countdown] Stopped for transaction {}", transaction_id);
        });

        Self { cancel }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
