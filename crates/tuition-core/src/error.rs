//! Error types for the tuition payment client.

use crate::money::Money;
use thiserror::Error;

/// Business rules the backend or the local preconditions can refuse a payment on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusinessRule {
    /// The student exists but owes nothing payable.
    #[error("This student has no pending tuition debt. All tuition fees have been paid.")]
    NoEligibleDebt,

    /// The payer cannot cover the debt.
    #[error("Insufficient balance: {required} required, {available} available")]
    InsufficientBalance { required: Money, available: Money },

    /// Another payment for the same receiver is still pending on the backend.
    #[error("A pending transaction already exists for student '{receiver_id}'")]
    DuplicatePending { receiver_id: String },
}

/// A shared error type for the whole client.
///
/// Variants follow the error taxonomy of the payment flow (validation,
/// not-found, business rule, transport, auth) plus the ambient failures of
/// configuration and file handling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuitionError {
    /// Local input rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend reports the entity absent
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A business rule refused the operation
    #[error("Business rule violated: {0}")]
    BusinessRule(BusinessRule),

    /// Network failure or unparseable response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("Request rejected ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    /// Bearer token rejected or credentials invalid
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },
}

impl TuitionError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Rejected error
    pub fn rejected(status: u16, detail: Option<String>) -> Self {
        Self::Rejected { status, detail }
    }

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::BusinessRule(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Backend-supplied detail of a rejection, if any.
    pub fn rejection_detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Returns the text shown to the user for this error.
    ///
    /// Validation, auth and business-rule messages are already user-facing;
    /// everything else collapses to a generic retry hint.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Auth(message) => message.clone(),
            Self::BusinessRule(rule) => rule.to_string(),
            Self::NotFound { entity_type, id } => format!("No {} found for '{}'", entity_type, id),
            Self::Rejected { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| "The request was refused. Please try again.".to_string()),
            Self::Transport(_) => {
                "Connection error. Please check if the backend server is running.".to_string()
            }
            Self::Config(message) => format!("Configuration problem: {}", message),
            Self::Io { .. } | Self::Serialization { .. } => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<BusinessRule> for TuitionError {
    fn from(rule: BusinessRule) -> Self {
        Self::BusinessRule(rule)
    }
}

impl From<std::io::Error> for TuitionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TuitionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TuitionError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TuitionError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TuitionError>`.
pub type Result<T> = std::result::Result<T, TuitionError>;
