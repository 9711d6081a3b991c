//! Request types for the payroll engine API.
//!
//! This module defines the JSON request bodies of the `/accrual`,
//! `/projection` and `/reconciliation` endpoints. Tranches are accepted in
//! their raw row shape and go through the preprocessor like any other input.

use serde::{Deserialize, Serialize};

use crate::config::ConfigLoader;
use crate::models::{PaidPayrollLine, StatutoryTable, StatutoryYearParams, TrancheRecord};

use super::response::ApiError;

/// Request body for the `/accrual` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualRequest {
    /// Raw tranche rows.
    pub tranches: Vec<TrancheRecord>,
    /// Statutory parameters replacing the configured table.
    #[serde(default)]
    pub statutory: Option<Vec<StatutoryYearParams>>,
}

/// Request body for the `/projection` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    /// The year to project.
    pub year: i32,
    /// Raw tranche rows.
    pub tranches: Vec<TrancheRecord>,
    /// Statutory parameters replacing the configured table.
    #[serde(default)]
    pub statutory: Option<Vec<StatutoryYearParams>>,
}

/// Request body for the `/reconciliation` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationRequest {
    /// The month to reconcile, as `YYYY-MM`.
    pub period: String,
    /// Raw tranche rows.
    pub tranches: Vec<TrancheRecord>,
    /// Amounts actually paid in the month.
    #[serde(default)]
    pub paid: Vec<PaidPayrollLine>,
    /// Statutory parameters replacing the configured table.
    #[serde(default)]
    pub statutory: Option<Vec<StatutoryYearParams>>,
}

/// Resolves the statutory table of a request.
///
/// Uses the request's own parameters when present, else the configured
/// table. Two entries for the same year are a validation error.
pub(crate) fn resolve_statutory(
    statutory: Option<Vec<StatutoryYearParams>>,
    config: &ConfigLoader,
) -> Result<StatutoryTable, ApiError> {
    let Some(params) = statutory else {
        return Ok(config.statutory().clone());
    };

    let mut table = StatutoryTable::new();
    for entry in params {
        if table.insert(entry).is_some() {
            return Err(ApiError::with_details(
                "VALIDATION_ERROR",
                format!("duplicate statutory parameters for year {}", entry.year),
                "Each year may appear at most once in 'statutory'",
            ));
        }
    }
    Ok(table)
}
