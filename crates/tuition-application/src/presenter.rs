//! Presentation sink for the payment flow.

use crate::notice::Notice;
use crate::payment::PaymentReceipt;
use tuition_core::otp::{CountdownDisplay, OtpChallenge};
use tuition_core::student::{DebtRecord, StudentRecord};

/// Receives state transitions of the payment flow and renders them.
///
/// Calls may happen while the flow holds its state lock; implementations must
/// return quickly and must not call back into the flow.
pub trait FlowPresenter: Send + Sync {
    fn notice(&self, notice: Notice);

    /// The displayed student changed; `None` clears the display.
    fn student_changed(&self, selection: Option<(&StudentRecord, &DebtRecord)>);

    fn confirm_enabled(&self, enabled: bool);

    fn otp_opened(&self, challenge: &OtpChallenge);

    /// One countdown tick.
    fn countdown(&self, display: CountdownDisplay);

    /// Message shown inside the OTP prompt.
    fn otp_error(&self, message: &str);

    fn otp_closed(&self);

    fn payment_succeeded(&self, receipt: &PaymentReceipt);
}

/// Presenter that drops everything, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPresenter;

impl FlowPresenter for NoopPresenter {
    fn notice(&self, _notice: Notice) {}
    fn student_changed(&self, _selection: Option<(&StudentRecord, &DebtRecord)>) {}
    fn confirm_enabled(&self, _enabled: bool) {}
    fn otp_opened(&self, _challenge: &OtpChallenge) {}
    fn countdown(&self, _display: CountdownDisplay) {}
    fn otp_error(&self, _message: &str) {}
    fn otp_closed(&self) {}
    fn payment_succeeded(&self, _receipt: &PaymentReceipt) {}
}
