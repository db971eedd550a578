//! Payment preconditions.

mod preconditions;

pub use preconditions::{PaymentPlan, PaymentSelection, PreconditionFailure, check_local};
