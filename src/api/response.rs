//! Response types for the payroll engine API.
//!
//! This module defines the report bodies returned by each endpoint and the
//! error response structures of the HTTP API.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{MonthlyAggregate, ReconciliationLine};

/// Report body of the `/accrual` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualReport {
    /// Sum of every month.
    pub total: Decimal,
    /// Distinct employees financed in each month, keyed by its first day.
    pub headcount_by_month: BTreeMap<NaiveDate, usize>,
    /// Monthly aggregates sorted by month.
    pub months: Vec<MonthlyAggregate>,
}

impl AccrualReport {
    /// Builds the report of `months`, totalling cost and headcount.
    pub fn from_months(months: Vec<MonthlyAggregate>) -> Self {
        Self {
            total: months.iter().map(|m| m.total).sum(),
            headcount_by_month: months.iter().map(|m| (m.year_month, m.headcount())).collect(),
            months,
        }
    }
}

/// Report body of the `/reconciliation` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// First day of the reconciled month.
    pub period: NaiveDate,
    /// Total projected for the month.
    pub total_budgeted: Decimal,
    /// Total paid in the month.
    pub total_paid: Decimal,
    /// Per-employee lines.
    pub lines: Vec<ReconciliationLine>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidTranche {
                tranche_id,
                message,
            } => ApiErrorResponse::bad_request(ApiError::with_details(
                "INVALID_TRANCHE",
                format!("Invalid tranche '{}': {}", tranche_id, message),
                "The tranche data contains invalid information",
            )),
            EngineError::InvalidPeriod { value, message } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "INVALID_PERIOD",
                    format!("Invalid period '{}': {}", value, message),
                    "Periods are written as YYYY-MM",
                ))
            }
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}
