//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Data-quality problems in individual tranche records are reported through
//! these errors at the record level and then turned into skip diagnostics by
//! the pipeline, so a single bad row never aborts a batch.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A financing tranche record was malformed.
    #[error("Invalid tranche '{tranche_id}': {message}")]
    InvalidTranche {
        /// The identifier of the tranche, or `<unknown>` when the row has none.
        tranche_id: String,
        /// A description of what made the record invalid.
        message: String,
    },

    /// A `YYYY-MM` period string could not be understood.
    #[error("Invalid period '{value}': {message}")]
    InvalidPeriod {
        /// The rejected input.
        value: String,
        /// A description of the problem.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
