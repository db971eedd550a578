//! Student and tuition debt domain module.

mod model;

pub use model::{DebtRecord, DebtStatus, StudentLookup, StudentRecord, normalize_student_id};
