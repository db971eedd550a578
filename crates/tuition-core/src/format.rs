//! Date formatting helpers shared by the flow and the history views.

use chrono::{DateTime, Utc};

/// Placeholder shown for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// `dd/mm/yyyy`, or `N/A` when the date is absent.
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `dd/mm/yyyy HH:MM`, or `N/A` when the timestamp is absent.
pub fn format_datetime(date: Option<&DateTime<Utc>>) -> String {
    date.map(|d| d.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Renders remaining seconds as zero-padded `MM:SS`.
pub fn format_countdown(remaining_secs: u32) -> String {
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2025, 1, 15, 9, 5, 0).unwrap();
        assert_eq!(format_date(Some(&date)), "15/01/2025");
        assert_eq!(format_datetime(Some(&date)), "15/01/2025 09:05");
        assert_eq!(format_date(None), "N/A");
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(300), "05:00");
        assert_eq!(format_countdown(61), "01:01");
        assert_eq!(format_countdown(9), "00:09");
        assert_eq!(format_countdown(0), "00:00");
    }
}
