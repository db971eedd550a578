//! Money representation and currency formatting.
//!
//! All money values are whole Vietnamese dong held in an `i64`; the backend
//! never sends fractional amounts.

/// Amount in VND.
pub type Money = i64;

/// Formats an amount the way the payment pages display it: dot-grouped
/// thousands followed by the dong sign, e.g. `5.000.000 ₫`.
pub fn format_vnd(amount: Money) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-{} ₫", grouped)
    } else {
        format!("{} ₫", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_vnd_groups_thousands() {
        assert_eq!(format_vnd(5_000_000), "5.000.000 ₫");
        assert_eq!(format_vnd(12_500), "12.500 ₫");
        assert_eq!(format_vnd(999), "999 ₫");
        assert_eq!(format_vnd(0), "0 ₫");
    }

    #[test]
    fn test_format_vnd_keeps_sign() {
        assert_eq!(format_vnd(-1_000_000), "-1.000.000 ₫");
    }
}
