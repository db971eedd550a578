use serde::Serialize;
use std::fmt;

/// Number of digits in a one-time password.
pub const OTP_LENGTH: usize = 6;

/// A one-time password of the right shape: exactly six ASCII digits.
///
/// Holding an `OtpCode` means the local shape check passed; whether the code
/// is correct is for the backend to decide.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    /// Validates user input. Surrounding whitespace is ignored; anything else
    /// that is not six digits is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() == OTP_LENGTH && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(******)")
    }
}
