//! Calculation logic for the payroll engine.
//!
//! This module contains the preprocessor that turns raw tranche rows into
//! typed tranches, the base-30 day mapping, the full-month statutory cost
//! ladder, the accrual engine that apportions that cost month by month, the
//! yearly aggregator, and the reconciliation of projected against paid
//! payroll.

mod accrual;
mod aggregate;
mod base30;
mod monthly_cost;
mod pipeline;
mod preprocess;
mod reconciliation;
mod rounding;

pub use accrual::accrue;
pub use aggregate::{
    DEFAULT_FUNDING_BASE, UNASSIGNED_PROJECT, UNDEFINED_DIRECTION, aggregate,
    resolve_dimension_names,
};
pub use base30::accrual_days;
pub use monthly_cost::{
    BONUS_RATE, CCF_RATE, EMPLOYEE_SHARE_RATE, HEALTH_RATE, ICBF_RATE, INTEGRAL_BASE_FACTOR,
    MAX_MONTHLY_COST, MonthlyCost, PENSION_RATE, SENA_RATE, SEVERANCE_INTEREST_RATE,
    VACATION_RATE, adjusted_salary, monthly_cost,
};
pub use pipeline::{accrue_records, calculate_yearly_projection};
pub use preprocess::{NormalizedTranches, normalize, normalize_record};
pub use reconciliation::{UNNAMED_EMPLOYEE, reconcile, reconcile_period};
pub use rounding::{
    BASE_MONTH_DAYS, apportion_component, apportion_total, ceil_to_thousand, round_half_even,
    round_half_up, round_hundred,
};
