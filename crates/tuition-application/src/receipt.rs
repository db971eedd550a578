//! Plain-text receipts for recorded transactions.

use chrono::{DateTime, Utc};
use tuition_core::format::{NOT_AVAILABLE, format_datetime};
use tuition_core::format_vnd;
use tuition_core::transaction::TransactionRecord;

const RULE: &str = "===========================================";
const SECTION: &str = "-------------------------------------------";

/// File name a receipt is saved under.
pub fn receipt_file_name(record: &TransactionRecord) -> String {
    format!("receipt_{}.txt", record.transaction_id)
}

/// Renders the tuition payment receipt for `record`.
///
/// `payer_fallback` names the payer when the backend did not join a payer
/// name onto the record (normally the logged-in user).
pub fn render_receipt(
    record: &TransactionRecord,
    payer_fallback: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let payer = record.payer_name.as_deref().unwrap_or(payer_fallback);
    let semester = record.semester.as_deref().unwrap_or(NOT_AVAILABLE);
    let academic_year = record.academic_year.as_deref().unwrap_or(NOT_AVAILABLE);

    let lines = [
        RULE.to_string(),
        "        TUITION PAYMENT RECEIPT".to_string(),
        RULE.to_string(),
        String::new(),
        format!("Transaction ID: {}", record.transaction_id),
        format!("Date: {}", format_datetime(record.display_time())),
        format!("Status: {}", record.status),
        String::new(),
        SECTION.to_string(),
        "PAYER INFORMATION".to_string(),
        SECTION.to_string(),
        format!("Name: {}", payer),
        String::new(),
        SECTION.to_string(),
        "STUDENT INFORMATION".to_string(),
        SECTION.to_string(),
        format!("Student ID: {}", record.receiver_id),
        format!("Student Name: {}", record.receiver_label()),
        String::new(),
        SECTION.to_string(),
        "PAYMENT DETAILS".to_string(),
        SECTION.to_string(),
        format!("Semester: {}", semester),
        format!("Academic Year: {}", academic_year),
        format!("Amount: {}", format_vnd(record.amount)),
        String::new(),
        SECTION.to_string(),
        "This is an official receipt for tuition payment.".to_string(),
        format!("Generated on: {}", format_datetime(Some(&generated_at))),
        RULE.to_string(),
    ];

    let mut receipt = lines.join("\n");
    receipt.push('\n');
    receipt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(json: &str) -> TransactionRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_receipt_contains_record_fields() {
        let record = record(
            r#"{"transaction_id": 42, "receiver_id": "SV0001234", "receiver_name": "Tran Thi B",
                "payer_name": "Nguyen Van A", "amount": 5000000, "status": "SUCCESS",
                "completed_at": "2025-01-15T09:05:00", "semester": "HK1",
                "academic_year": "2024-2025"}"#,
        );
        let generated = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
        let receipt = render_receipt(&record, "ignored", generated);

        assert!(receipt.contains("Transaction ID: 42"));
        assert!(receipt.contains("Date: 15/01/2025 09:05"));
        assert!(receipt.contains("Status: SUCCESS"));
        assert!(receipt.contains("Name: Nguyen Van A"));
        assert!(receipt.contains("Student Name: Tran Thi B"));
        assert!(receipt.contains("Amount: 5.000.000 ₫"));
        assert!(receipt.contains("Generated on: 01/02/2025 10:00"));
        assert_eq!(receipt_file_name(&record), "receipt_42.txt");
    }

    #[test]
    fn test_receipt_fallbacks() {
        let record = record(r#"{"transaction_id": "7", "receiver_id": "SV0009999"}"#);
        let receipt = render_receipt(&record, "Logged In User", Utc::now());

        assert!(receipt.contains("Name: Logged In User"));
        assert!(receipt.contains("Student Name: SV0009999"));
        assert!(receipt.contains("Date: N/A"));
        assert!(receipt.contains("Status: PENDING"));
        assert!(receipt.contains("Semester: N/A"));
    }
}
