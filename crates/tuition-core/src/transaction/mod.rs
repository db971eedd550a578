//! Transaction domain module.
//!
//! - `model`: transaction ids, the pending transaction opened by a payment,
//!   and the history records listed by `GET /transactions/me`

mod model;

pub use model::{
    NewTransaction, PendingTransaction, TransactionId, TransactionRecord, TransactionStatus,
    sort_newest_first,
};
