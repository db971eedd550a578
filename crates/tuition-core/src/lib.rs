//! Domain layer of the tuition payment client: models, error type, the
//! backend contract and the pure parts of the payment state machine.

pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod money;
pub mod otp;
pub mod payment;
pub mod session;
pub mod student;
pub mod timestamp;
pub mod transaction;

// Re-export common error type
pub use error::{BusinessRule, Result, TuitionError};
pub use money::{Money, format_vnd};
