//! Client configuration model.
//!
//! Loaded from `config.toml`; every key is optional and falls back to the
//! defaults below.

use crate::otp::DEFAULT_COUNTDOWN_SECS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_MIN_STUDENT_ID_LEN: usize = 7;
pub const DEFAULT_NOTICE_TTL_SECS: u64 = 5;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub min_student_id_len: usize,
    pub notice_ttl_secs: u64,
    pub log_level: String,
    pub otp: OtpSettings,
    pub payment: PaymentSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            min_student_id_len: DEFAULT_MIN_STUDENT_ID_LEN,
            notice_ttl_secs: DEFAULT_NOTICE_TTL_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            otp: OtpSettings::default(),
            payment: PaymentSettings::default(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpSettings {
    pub countdown_secs: u32,
    /// Whether a resent code restarts the countdown (and revives an expired
    /// challenge).
    pub restart_countdown_on_resend: bool,
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            restart_countdown_on_resend: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentSettings {
    /// Re-fetch the user record after a verified payment instead of trusting
    /// the locally debited balance.
    pub reconcile_balance_after_payment: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.otp.countdown_secs, 300);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: ClientConfig = toml::from_str(
            r#"
            api_base_url = "https://bank.example.com"
            request_timeout_secs = 15

            [otp]
            restart_countdown_on_resend = false
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://bank.example.com");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert!(!config.otp.restart_countdown_on_resend);
        assert_eq!(config.otp.countdown_secs, 300);
        assert_eq!(config.min_student_id_len, 7);
    }
}
