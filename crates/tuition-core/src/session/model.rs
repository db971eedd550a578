//! Authenticated session model.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer token issued by `POST /token`.
///
/// `Debug` is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// The payer, as returned by `GET /customers/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(alias = "customer_id")]
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "phone_number")]
    pub phone: Option<String>,
    pub available_balance: Money,
}

/// An authenticated session.
///
/// Token and user only ever exist together; "logged out" is the absence of
/// a `Session`, never a half-filled one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: AccessToken,
    user: UserRecord,
}

impl Session {
    pub fn new(token: AccessToken, user: UserRecord) -> Self {
        Self { token, user }
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    pub fn available_balance(&self) -> Money {
        self.user.available_balance
    }

    /// Replaces the user record, keeping the token.
    pub fn with_user(mut self, user: UserRecord) -> Self {
        self.user = user;
        self
    }

    /// Subtracts a settled amount from the local balance and returns the new balance.
    pub fn debit(&mut self, amount: Money) -> Money {
        self.user.available_balance -= amount;
        self.user.available_balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_accepts_backend_field_names() {
        let json = r#"{
            "customer_id": 7,
            "username": "payer01",
            "full_name": "Nguyen Van A",
            "email": "a@example.com",
            "phone_number": "0901234567",
            "available_balance": 10000000
        }"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.phone.as_deref(), Some("0901234567"));
        assert_eq!(user.available_balance, 10_000_000);
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AccessToken::new("secret-token");
        assert!(!format!("{:?}", token).contains("secret"));
        assert_eq!(token.bearer(), "Bearer secret-token");
    }

    #[test]
    fn test_debit_updates_balance() {
        let user = UserRecord {
            id: 1,
            username: None,
            full_name: "Payer".to_string(),
            email: String::new(),
            phone: None,
            available_balance: 10_000_000,
        };
        let mut session = Session::new(AccessToken::new("t"), user);
        assert_eq!(session.debit(5_000_000), 5_000_000);
        assert_eq!(session.available_balance(), 5_000_000);
    }
}
