//! Full-month statutory cost of a tranche.
//!
//! This module computes the "employed for the whole month" baseline of a
//! tranche under the Colombian statutory rules: the raised salary, transport
//! aid, clothing allowance, social benefits, social-security contributions
//! and payroll contributions. Apportioning to accrual days happens later, in
//! the accrual engine.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{CostBreakdown, FinancingTranche, StatutoryYearParams};

use super::rounding::{ceil_to_thousand, round_half_even, round_hundred};

/// Rate of the service bonus and of severance over the bonus base (8.34%).
pub const BONUS_RATE: Decimal = Decimal::from_parts(834, 0, 0, false, 4);
/// Rate of severance interest over the bonus base (1%).
pub const SEVERANCE_INTEREST_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
/// Rate of vacation pay over the adjusted salary (4.17%).
pub const VACATION_RATE: Decimal = Decimal::from_parts(417, 0, 0, false, 4);
/// Total health contribution rate (12.5%).
pub const HEALTH_RATE: Decimal = Decimal::from_parts(125, 0, 0, false, 3);
/// Total pension contribution rate (16%).
pub const PENSION_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);
/// Employee share withheld from health and pension (4% each).
pub const EMPLOYEE_SHARE_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);
/// Family compensation fund rate (4%).
pub const CCF_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);
/// Training service rate (2%).
pub const SENA_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);
/// Family welfare rate (3%).
pub const ICBF_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 2);
/// Share of an integral salary that contribution bases are computed on (70%).
pub const INTEGRAL_BASE_FACTOR: Decimal = Decimal::from_parts(7, 0, 0, false, 1);

/// Largest full-month cost a tranche may have (10^18).
///
/// Apportioned and aggregated amounts are derived from values below this
/// bound and stay well inside the [`Decimal`] range.
pub const MAX_MONTHLY_COST: Decimal =
    Decimal::from_parts(2_808_348_672, 232_830_643, 0, false, 0);

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const TWO: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// The full-month cost of a tranche for one year's statutory parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyCost {
    /// Individual cost components.
    pub breakdown: CostBreakdown,
    /// Sum of the components.
    pub total: Decimal,
}

/// Computes the full-month cost of `tranche` under `params`.
///
/// The result does not depend on how many days the tranche accrues in any
/// month; it is the baseline that gets apportioned.
///
/// # Errors
///
/// Returns `InvalidTranche` when an intermediate amount overflows or the
/// total exceeds [`MAX_MONTHLY_COST`].
///
/// # Arguments
///
/// * `tranche` - The typed tranche (salary, job title, band, family, position, risk rate)
/// * `params` - Statutory parameters of the year being accrued
///
/// # Returns
///
/// Returns a [`MonthlyCost`] with every component and their total.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::monthly_cost;
/// use payroll_engine::models::{FinancingTranche, StatutoryYearParams};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut tranche = FinancingTranche::new(
///     "F-1",
///     "1020304050",
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
///     Decimal::from(3_000_000),
/// );
/// tranche.band = Some("B02".to_string());
/// tranche.job_title = Some("Analista".to_string());
/// tranche.risk_rate = Decimal::new(522, 5);
///
/// let params = StatutoryYearParams {
///     year: 2025,
///     raise_percent: Decimal::ZERO,
///     minimum_wage: Decimal::from(1_300_000),
///     transport_subsidy: Decimal::from(162_000),
///     annual_allowance: Decimal::from(150_000),
/// };
///
/// let cost = monthly_cost(&tranche, &params).unwrap();
/// assert_eq!(cost.breakdown.transport_aid, Decimal::ZERO);
/// assert_eq!(cost.total, Decimal::from(4_681_300));
/// ```
pub fn monthly_cost(
    tranche: &FinancingTranche,
    params: &StatutoryYearParams,
) -> EngineResult<MonthlyCost> {
    let out_of_range = || EngineError::InvalidTranche {
        tranche_id: tranche.id.clone(),
        message: format!(
            "cost of base salary {} is out of range for {}",
            tranche.base_salary, params.year
        ),
    };

    let cost = price(tranche, params).ok_or_else(out_of_range)?;
    if cost.total > MAX_MONTHLY_COST {
        return Err(out_of_range());
    }
    Ok(cost)
}

/// The cost ladder. `None` on overflow.
fn price(tranche: &FinancingTranche, params: &StatutoryYearParams) -> Option<MonthlyCost> {
    let lectiva = tranche.is_lectiva();
    let integral = tranche.is_integral();
    let apprentice = tranche.is_apprentice();

    let salary = adjusted_salary(tranche.base_salary, params.raise_percent)?;

    let transport_eligible = !lectiva && salary <= TWO.checked_mul(params.minimum_wage)?;
    let (transport_aid, allowance) = if transport_eligible {
        (
            params.transport_subsidy,
            (params.annual_allowance / MONTHS_PER_YEAR).ceil(),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let bonus_base = salary.checked_add(transport_aid)?;
    let (bonuses, severance, severance_interest) = if lectiva || integral {
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    } else {
        let share = (bonus_base * BONUS_RATE).floor();
        (share, share, (bonus_base * SEVERANCE_INTEREST_RATE).floor())
    };

    let vacation = if lectiva {
        Decimal::ZERO
    } else {
        (salary * VACATION_RATE).floor()
    };

    // Integral salaries contribute on 70% of the salary.
    let contribution_base = if integral {
        salary * INTEGRAL_BASE_FACTOR
    } else {
        salary
    };

    let health = if lectiva {
        round_hundred(params.minimum_wage * HEALTH_RATE)
    } else {
        employer_share(contribution_base, HEALTH_RATE)
    };

    let pension = if lectiva || tranche.is_pension_exempt() {
        Decimal::ZERO
    } else {
        employer_share(contribution_base, PENSION_RATE)
    };

    let (ccf, sena, icbf) = if lectiva || apprentice {
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    } else {
        (
            round_hundred(contribution_base * CCF_RATE),
            round_hundred(contribution_base * SENA_RATE),
            round_hundred(contribution_base * ICBF_RATE),
        )
    };

    let risk_base = if lectiva || apprentice {
        params.minimum_wage
    } else {
        contribution_base
    };
    let arl = round_hundred(risk_base.checked_mul(tranche.risk_rate)?);

    let breakdown = CostBreakdown {
        salary,
        transport_aid,
        allowance,
        bonuses,
        vacation_bonus: vacation,
        vacation_salary: vacation,
        severance,
        severance_interest,
        health,
        pension,
        arl,
        ccf,
        sena,
        icbf,
    };

    Some(MonthlyCost {
        breakdown,
        total: round_half_even(breakdown.checked_sum()?),
    })
}

/// Applies the yearly raise to a base salary and rounds up to the thousand.
///
/// A raise of zero (or less) leaves the salary as is. A positive
/// `raise_percent` multiplies the salary by `raise_percent / 100`, so the
/// configured value is the new salary as a percentage of the old one.
/// Returns `None` when the raised salary does not fit in a [`Decimal`].
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::adjusted_salary;
/// use rust_decimal::Decimal;
///
/// assert_eq!(adjusted_salary(Decimal::from(1_000_000), Decimal::from(105)), Some(Decimal::from(1_050_000)));
/// assert_eq!(adjusted_salary(Decimal::from(1_234_567), Decimal::ZERO), Some(Decimal::from(1_235_000)));
/// ```
pub fn adjusted_salary(base_salary: Decimal, raise_percent: Decimal) -> Option<Decimal> {
    let raised = if raise_percent > Decimal::ZERO {
        base_salary.checked_mul(raise_percent)? / Decimal::ONE_HUNDRED
    } else {
        base_salary
    };
    ceil_to_thousand(raised)
}

/// Total contribution rounded to the hundred, minus the employee's 4% share.
fn employer_share(base: Decimal, total_rate: Decimal) -> Decimal {
    round_hundred(base * total_rate) - (base * EMPLOYEE_SHARE_RATE).floor()
}
