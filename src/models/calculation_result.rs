//! Calculation result envelope.
//!
//! Every computation served to a reporting caller is wrapped in a
//! [`CalculationResult`] that identifies the run and carries its
//! [`RunDiagnostics`]: the records left out, the years priced without
//! statutory parameters, and warnings summarizing both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SkippedRecord;

/// Warning code for years accrued without statutory parameters.
pub const MISSING_STATUTORY_YEAR: &str = "MISSING_STATUTORY_YEAR";

/// Warning code for records left out of the computation.
pub const RECORDS_SKIPPED: &str = "RECORDS_SKIPPED";

/// A warning raised by a run.
///
/// Warnings flag results that are complete but may need attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description.
    pub message: String,
    /// The severity level ("low", "medium" or "high").
    pub severity: String,
}

/// Diagnostics of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// Records rejected by the preprocessor or the engine.
    pub skipped: Vec<SkippedRecord>,
    /// Years accrued with zeroed statutory parameters.
    pub missing_statutory_years: Vec<i32>,
    /// Summary warnings.
    pub warnings: Vec<RunWarning>,
    /// Computation time in microseconds.
    pub duration_us: u64,
}

impl RunDiagnostics {
    /// Builds diagnostics and derives the summary warnings.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::RunDiagnostics;
    ///
    /// let diagnostics = RunDiagnostics::new(vec![], vec![2027], 120);
    /// assert_eq!(diagnostics.warnings.len(), 1);
    /// assert_eq!(diagnostics.warnings[0].code, "MISSING_STATUTORY_YEAR");
    /// ```
    pub fn new(
        skipped: Vec<SkippedRecord>,
        missing_statutory_years: Vec<i32>,
        duration_us: u64,
    ) -> Self {
        let mut warnings = Vec::new();

        for year in &missing_statutory_years {
            warnings.push(RunWarning {
                code: MISSING_STATUTORY_YEAR.to_string(),
                message: format!(
                    "No statutory parameters for {}; its months were priced with zeroed parameters",
                    year
                ),
                severity: "medium".to_string(),
            });
        }

        if !skipped.is_empty() {
            warnings.push(RunWarning {
                code: RECORDS_SKIPPED.to_string(),
                message: format!("{} record(s) could not be used", skipped.len()),
                severity: "low".to_string(),
            });
        }

        Self {
            skipped,
            missing_statutory_years,
            warnings,
            duration_us,
        }
    }

    /// Returns true when the run raised no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// The identified result of a calculation.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{CalculationResult, RunDiagnostics};
///
/// let result = CalculationResult::new(42_u32, RunDiagnostics::default());
/// assert_eq!(result.result, 42);
/// assert_eq!(result.engine_version, env!("CARGO_PKG_VERSION"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult<T> {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The computed report.
    pub result: T,
    /// Diagnostics of the run.
    pub diagnostics: RunDiagnostics,
}

impl<T> CalculationResult<T> {
    /// Wraps `result` with a fresh identifier and the current time.
    pub fn new(result: T, diagnostics: RunDiagnostics) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            result,
            diagnostics,
        }
    }
}
