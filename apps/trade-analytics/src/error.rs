//! Error handling for the analytics engine.
//!
//! Every failure carries an [`ErrorCode`] so callers (persistence layer,
//! reporting jobs) can branch on a stable reason string instead of parsing
//! messages.
//!
//! | Code | Raised by |
//! |------|-----------|
//! | `INVALID_TRADE_INPUT` | P&L / risk:reward calculators, enrichment |
//! | `PRECONDITION_VIOLATION` | Aggregation boundary (open or unsorted trades) |
//! | `CONFIG_ERROR` | Configuration loading and validation |
//! | `WORKER_ERROR` | Background aggregation task panicked or was cancelled |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// Error codes for the analytics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Non-positive price or quantity, negative fee, or missing exit price.
    InvalidTradeInput,
    /// Open or out-of-order trades reached the aggregator.
    PreconditionViolation,
    /// Configuration could not be loaded or failed validation.
    ConfigError,
    /// Background aggregation task failed.
    WorkerError,
}

impl ErrorCode {
    /// Get the reason string for this code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidTradeInput => "INVALID_TRADE_INPUT",
            Self::PreconditionViolation => "PRECONDITION_VIOLATION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::WorkerError => "WORKER_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors surfaced by the analytics engine.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A trade field failed validation; the record is not enriched.
    #[error("Invalid trade input for '{field}': {message}")]
    InvalidTradeInput {
        /// Offending field name.
        field: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// The aggregator was handed open or unsorted trades.
    #[error("Aggregation precondition violated: {message}")]
    PreconditionViolation {
        /// Description of the violation.
        message: String,
    },

    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The blocking aggregation task did not complete.
    #[error("Aggregation task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl AnalyticsError {
    /// Build an `InvalidTradeInput` error.
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidTradeInput {
            field,
            message: message.into(),
        }
    }

    /// Build an `InvalidTradeInput` error for arithmetic that leaves the
    /// decimal range.
    pub fn overflow(field: &'static str, operation: &str) -> Self {
        Self::invalid_input(field, format!("{operation} overflows the decimal range"))
    }

    /// Build a `PreconditionViolation` error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionViolation {
            message: message.into(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidTradeInput { .. } => ErrorCode::InvalidTradeInput,
            Self::PreconditionViolation { .. } => ErrorCode::PreconditionViolation,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Worker(_) => ErrorCode::WorkerError,
        }
    }
}

/// Result alias used across the crate.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_reason() {
        assert_eq!(ErrorCode::InvalidTradeInput.reason(), "INVALID_TRADE_INPUT");
        assert_eq!(
            ErrorCode::PreconditionViolation.to_string(),
            "PRECONDITION_VIOLATION"
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err = AnalyticsError::invalid_input("quantity", "must be positive, got 0");
        assert_eq!(err.code(), ErrorCode::InvalidTradeInput);
        assert_eq!(
            err.to_string(),
            "Invalid trade input for 'quantity': must be positive, got 0"
        );
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let err = AnalyticsError::overflow("quantity", "entry_price * quantity");
        assert_eq!(err.code(), ErrorCode::InvalidTradeInput);
        assert!(err.to_string().contains("entry_price * quantity overflows"));
    }

    #[test]
    fn test_precondition_code() {
        let err = AnalyticsError::precondition("trade t-2 is open");
        assert_eq!(err.code(), ErrorCode::PreconditionViolation);
        assert!(err.to_string().contains("t-2"));
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::ConfigError).unwrap();
        assert_eq!(json, "\"CONFIG_ERROR\"");
    }
}
