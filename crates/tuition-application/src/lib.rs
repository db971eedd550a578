//! Application layer of the tuition payment client.
//!
//! Use cases coordinate the banking gateway, the session store and a
//! presenter sink to implement login, the OTP-confirmed payment flow and the
//! transaction history.

pub mod auth_usecase;
pub mod history_usecase;
pub mod notice;
pub mod payment;
pub mod presenter;
pub mod receipt;

pub use auth_usecase::AuthUseCase;
pub use history_usecase::HistoryUseCase;
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use payment::{
    ConfirmOutcome, LookupOutcome, PaymentFlow, PaymentFlowSettings, PaymentReceipt,
    ResendOutcome, VerifyOutcome,
};
pub use presenter::{FlowPresenter, NoopPresenter};
