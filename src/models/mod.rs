//! Core data models for the payroll engine.
//!
//! This module contains the input records (tranches and statutory
//! parameters), the accrual and projection outputs, and the month helpers
//! shared by every stage.

mod accrual;
mod calculation_result;
mod period;
mod projection;
mod reconciliation;
mod statutory;
mod tranche;

pub use accrual::{
    AccrualResult, CostBreakdown, MonthlyAggregate, MonthlyDetail, SkipStage, SkippedRecord,
};
pub use calculation_result::{
    CalculationResult, MISSING_STATUTORY_YEAR, RECORDS_SKIPPED, RunDiagnostics, RunWarning,
};
pub use period::{
    first_of_month, last_day_of_month, months_between, next_month, parse_date_prefix,
    parse_period, same_month,
};
pub use projection::{ProjectRow, ProjectionOutcome, YearlyProjection};
pub use reconciliation::{PaidPayrollLine, ReconciliationLine, ReconciliationOutcome};
pub use statutory::{StatutoryTable, StatutoryYearParams};
pub use tranche::{
    ACTIVE_STATUS_PREFIX, APPRENTICE_FAMILY, ContractInfo, FinancingTranche, INTEGRAL_SALARY_BAND,
    LECTIVA_JOB_TITLE, PENSION_EXEMPT_POSITIONS, Placement, TrancheDimensions, TrancheRecord,
};
