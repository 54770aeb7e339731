//! Error taxonomy for the calculation engine and its configuration store.

use thiserror::Error;

/// Bad, missing or non-numeric input. Always names the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("field '{field}' must be numeric")]
    NotNumeric { field: String },

    #[error("field '{field}' must be finite, got {value}")]
    NotFinite { field: String, value: f64 },

    #[error("field '{field}' must be {expected}, got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        expected: &'static str,
    },

    #[error("invalid trade_type '{0}', must be 'buy' or 'sell'")]
    InvalidTradeType(String),

    #[error("expected 'trades' array in request body")]
    TradesNotArray,

    #[error("'trades' array must contain at least one trade")]
    EmptyBatch,
}

impl ValidationError {
    pub(crate) fn out_of_range(field: &str, value: f64, expected: &'static str) -> Self {
        Self::OutOfRange {
            field: field.to_string(),
            value,
            expected,
        }
    }

    /// Fields reported missing, if this is a missing-field error.
    pub fn missing_fields(&self) -> Option<&[String]> {
        match self {
            Self::MissingFields(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Degenerate position-sizing prices.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidPriceError {
    #[error("invalid price levels: entry and stop loss must be different (both {0})")]
    EqualPrices(f64),

    #[error("invalid price levels: {field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

/// Failure inside a configuration store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Implicit classification of a [`CoreError`], used by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Computation,
    ConfigurationMissing,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Computation => "computation",
            ErrorKind::ConfigurationMissing => "configuration_missing",
            ErrorKind::Storage => "storage",
        }
    }
}

/// Everything the engine can report to its caller.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidPrice(#[from] InvalidPriceError),

    #[error("no account configuration saved for '{0}'")]
    ConfigurationMissing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::InvalidPrice(_) => ErrorKind::Computation,
            CoreError::ConfigurationMissing(_) => ErrorKind::ConfigurationMissing,
            CoreError::Store(_) => ErrorKind::Storage,
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
