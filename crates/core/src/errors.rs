//! Core error types for the PledgePoint kiosk.
//!
//! This module defines transport-agnostic error types. HTTP- and
//! terminal-specific failures are converted to these types by the
//! `connect` crate.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the kiosk workflow.
///
/// Every variant renders to a user-facing message at the flow boundary;
/// none is fatal to the process. The caller retries the same step.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (connect, timeout, IO) before any response.
    #[error("Request failed: {0}")]
    Http(String),

    /// The backend answered with a non-success status.
    #[error("Backend error: {0}")]
    Api(String),

    /// A success response could not be decoded.
    #[error("Failed to parse response: {0}")]
    Deserialization(String),

    /// Payment terminal failure (discovery, connection, collect, confirm).
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A business rule rejected the operation (amount below minimum,
    /// missing price reference, step entered without its inputs).
    #[error("{0}")]
    Rule(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors for donor-entered fields and gift inputs.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Deserialization(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
