//! Accrual result models.
//!
//! This module contains the [`MonthlyDetail`] record emitted for every
//! tranche-month, the [`MonthlyAggregate`] grouping per calendar month, the
//! [`CostBreakdown`] of statutory cost components and the
//! [`SkippedRecord`] diagnostics reported for rows that could not be used.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ContractInfo, Placement, TrancheDimensions};

/// The named cost components of one month of employment.
///
/// Used both for the full-month baseline and for the apportioned amounts of
/// a detail record.
///
/// # Example
///
/// ```
/// use payroll_engine::models::CostBreakdown;
/// use rust_decimal::Decimal;
///
/// let breakdown = CostBreakdown {
///     salary: Decimal::from(1_000_000),
///     health: Decimal::from(85_000),
///     ..CostBreakdown::default()
/// };
/// assert_eq!(breakdown.sum(), Decimal::from(1_085_000));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Salary after the yearly raise, rounded up to the thousand.
    pub salary: Decimal,
    /// Transport aid.
    pub transport_aid: Decimal,
    /// Monthly share of the yearly clothing allowance.
    pub allowance: Decimal,
    /// Service bonus ("primas").
    pub bonuses: Decimal,
    /// Vacation bonus ("prima de vacaciones").
    pub vacation_bonus: Decimal,
    /// Ordinary vacation pay ("sueldo de vacaciones").
    pub vacation_salary: Decimal,
    /// Severance ("cesantías").
    pub severance: Decimal,
    /// Interest on severance.
    pub severance_interest: Decimal,
    /// Employer health contribution.
    pub health: Decimal,
    /// Employer pension contribution.
    pub pension: Decimal,
    /// Occupational-risk insurance.
    pub arl: Decimal,
    /// Family compensation fund.
    pub ccf: Decimal,
    /// National training service.
    pub sena: Decimal,
    /// Family welfare institute.
    pub icbf: Decimal,
}

impl CostBreakdown {
    /// Returns the components in a fixed order.
    pub fn components(&self) -> [Decimal; 14] {
        [
            self.salary,
            self.transport_aid,
            self.allowance,
            self.bonuses,
            self.vacation_bonus,
            self.vacation_salary,
            self.severance,
            self.severance_interest,
            self.health,
            self.pension,
            self.arl,
            self.ccf,
            self.sena,
            self.icbf,
        ]
    }

    /// Returns the sum of every component.
    pub fn sum(&self) -> Decimal {
        self.components().iter().copied().sum()
    }

    /// Returns the sum of every component, or `None` on overflow.
    pub fn checked_sum(&self) -> Option<Decimal> {
        self.components()
            .iter()
            .try_fold(Decimal::ZERO, |acc, component| acc.checked_add(*component))
    }

    /// Applies `f` to every component.
    pub fn map(&self, f: impl Fn(Decimal) -> Decimal) -> Self {
        Self {
            salary: f(self.salary),
            transport_aid: f(self.transport_aid),
            allowance: f(self.allowance),
            bonuses: f(self.bonuses),
            vacation_bonus: f(self.vacation_bonus),
            vacation_salary: f(self.vacation_salary),
            severance: f(self.severance),
            severance_interest: f(self.severance_interest),
            health: f(self.health),
            pension: f(self.pension),
            arl: f(self.arl),
            ccf: f(self.ccf),
            sena: f(self.sena),
            icbf: f(self.icbf),
        }
    }
}

/// One tranche's apportioned cost for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDetail {
    /// Tranche identifier.
    pub tranche_id: String,
    /// Employee identity document.
    pub employee_id: String,
    /// Employee display name.
    pub employee_name: Option<String>,
    /// Tranche start date.
    pub start_date: NaiveDate,
    /// Tranche end date (after termination clamping).
    pub end_date: NaiveDate,
    /// Position identifier.
    pub position: Option<String>,
    /// Job title.
    pub job_title: Option<String>,
    /// Dimensional tags of the tranche.
    #[serde(flatten)]
    pub dimensions: TrancheDimensions,
    /// Organizational placement.
    #[serde(flatten)]
    pub placement: Placement,
    /// Contract metadata.
    #[serde(flatten)]
    pub contract: ContractInfo,
    /// First day of the accrued month.
    pub year_month: NaiveDate,
    /// Base-30 days accrued in the month (1-30).
    pub accrual_days: u32,
    /// Apportioned cost for the month.
    pub total_value: Decimal,
    /// Independently apportioned cost components.
    pub breakdown: CostBreakdown,
}

/// All details accrued for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// First day of the month.
    pub year_month: NaiveDate,
    /// Sum of the details' `total_value`.
    pub total: Decimal,
    /// Details in tranche-processing order.
    pub details: Vec<MonthlyDetail>,
}

impl MonthlyAggregate {
    /// Creates an empty aggregate for the month starting at `year_month`.
    pub fn new(year_month: NaiveDate) -> Self {
        Self {
            year_month,
            total: Decimal::ZERO,
            details: Vec::new(),
        }
    }

    /// Appends a detail and adds its value to the month's total.
    pub fn push(&mut self, detail: MonthlyDetail) {
        self.total += detail.total_value;
        self.details.push(detail);
    }

    /// Returns the number of distinct employees financed in the month.
    pub fn headcount(&self) -> usize {
        self.details
            .iter()
            .map(|d| d.employee_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// The pipeline stage that rejected a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipStage {
    /// Rejected while normalizing the raw row.
    Preprocess,
    /// Rejected while accruing the typed tranche.
    Accrual,
}

/// Diagnostic for a record left out of the computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Tranche identifier, when the row had one.
    pub tranche_id: Option<String>,
    /// Employee identifier, when the row had one.
    pub employee_id: Option<String>,
    /// Stage that rejected the record.
    pub stage: SkipStage,
    /// Why the record was rejected.
    pub reason: String,
}

/// Output of the accrual engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccrualResult {
    /// Monthly aggregates sorted by month.
    pub months: Vec<MonthlyAggregate>,
    /// Tranches the engine could not accrue.
    pub skipped: Vec<SkippedRecord>,
    /// Years accrued without statutory parameters (sorted, distinct).
    pub missing_statutory_years: Vec<i32>,
}

impl AccrualResult {
    /// Returns the aggregate for the month starting at `year_month`.
    pub fn month(&self, year_month: NaiveDate) -> Option<&MonthlyAggregate> {
        self.months.iter().find(|m| m.year_month == year_month)
    }

    /// Returns the sum of all monthly totals.
    pub fn total(&self) -> Decimal {
        self.months.iter().map(|m| m.total).sum()
    }
}
