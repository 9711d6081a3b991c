//! The accrual engine.
//!
//! Walks every month a tranche overlaps, computes its base-30 accrual days,
//! prices the month with the statutory parameters of the month's year and
//! apportions the full-month cost to the accrued days. Details are grouped
//! into one [`MonthlyAggregate`] per calendar month.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AccrualResult, FinancingTranche, MonthlyAggregate, MonthlyDetail, SkipStage, SkippedRecord,
    StatutoryTable, months_between,
};

use super::base30::accrual_days;
use super::monthly_cost::{MonthlyCost, monthly_cost};
use super::rounding::{apportion_component, apportion_total};

/// Accrues a batch of tranches into monthly aggregates.
///
/// Tranches are processed in input order, so the details of each month keep
/// that order. A tranche that fails validation, or whose cost overflows the
/// supported range, contributes nothing and is reported in
/// [`AccrualResult::skipped`]. Years accrued without statutory
/// parameters are priced with zeroed parameters and listed in
/// [`AccrualResult::missing_statutory_years`].
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::accrue;
/// use payroll_engine::models::{FinancingTranche, StatutoryTable, StatutoryYearParams};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let tranche = FinancingTranche::new(
///     "F-1",
///     "1020304050",
///     NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
///     Decimal::from(3_000_000),
/// );
/// let table: StatutoryTable = [StatutoryYearParams {
///     year: 2025,
///     raise_percent: Decimal::ZERO,
///     minimum_wage: Decimal::from(1_300_000),
///     transport_subsidy: Decimal::from(162_000),
///     annual_allowance: Decimal::from(150_000),
/// }]
/// .into_iter()
/// .collect();
///
/// let result = accrue(&[tranche], &table);
/// let days: Vec<u32> = result.months.iter().map(|m| m.details[0].accrual_days).collect();
/// assert_eq!(days, vec![16, 30, 10]);
/// ```
pub fn accrue(tranches: &[FinancingTranche], table: &StatutoryTable) -> AccrualResult {
    let mut months: BTreeMap<NaiveDate, MonthlyAggregate> = BTreeMap::new();
    let mut skipped = Vec::new();
    let mut missing_years = BTreeSet::new();

    for tranche in tranches {
        match accrue_tranche(tranche, table, &mut missing_years) {
            Ok(details) => {
                for detail in details {
                    months
                        .entry(detail.year_month)
                        .or_insert_with(|| MonthlyAggregate::new(detail.year_month))
                        .push(detail);
                }
            }
            Err(err) => {
                debug!(tranche_id = %tranche.id, error = %err, "Skipping tranche");
                skipped.push(SkippedRecord {
                    tranche_id: Some(tranche.id.clone()),
                    employee_id: Some(tranche.employee_id.clone()),
                    stage: SkipStage::Accrual,
                    reason: err.to_string(),
                });
            }
        }
    }

    if !missing_years.is_empty() {
        warn!(
            years = ?missing_years,
            "Accrued months without statutory parameters; amounts use zeroed parameters"
        );
    }

    debug!(
        tranches = tranches.len(),
        months = months.len(),
        skipped = skipped.len(),
        "Accrual complete"
    );

    AccrualResult {
        months: months.into_values().collect(),
        skipped,
        missing_statutory_years: missing_years.into_iter().collect(),
    }
}

/// Produces every detail of one tranche, or nothing at all.
///
/// The full-month cost only depends on the year, so it is computed once per
/// year the tranche spans.
fn accrue_tranche(
    tranche: &FinancingTranche,
    table: &StatutoryTable,
    missing_years: &mut BTreeSet<i32>,
) -> EngineResult<Vec<MonthlyDetail>> {
    validate(tranche)?;

    let mut details = Vec::new();
    let mut priced: Option<(i32, MonthlyCost)> = None;

    for month in months_between(tranche.start_date, tranche.end_date) {
        let days = accrual_days(tranche.start_date, tranche.end_date, month);
        if days == 0 {
            continue;
        }

        let year = month.year();
        let cost = match priced {
            Some((priced_year, cost)) if priced_year == year => cost,
            _ => {
                if !table.contains_year(year) {
                    missing_years.insert(year);
                }
                let cost = monthly_cost(tranche, &table.for_year(year))?;
                priced = Some((year, cost));
                cost
            }
        };

        details.push(build_detail(tranche, month, days, &cost));
    }

    Ok(details)
}

fn validate(tranche: &FinancingTranche) -> EngineResult<()> {
    if tranche.start_date > tranche.end_date {
        return Err(EngineError::InvalidTranche {
            tranche_id: tranche.id.clone(),
            message: format!(
                "start date {} is after end date {}",
                tranche.start_date, tranche.end_date
            ),
        });
    }
    if tranche.base_salary < Decimal::ZERO {
        return Err(EngineError::InvalidTranche {
            tranche_id: tranche.id.clone(),
            message: format!("negative base salary {}", tranche.base_salary),
        });
    }
    Ok(())
}

fn build_detail(
    tranche: &FinancingTranche,
    month: NaiveDate,
    days: u32,
    cost: &MonthlyCost,
) -> MonthlyDetail {
    MonthlyDetail {
        tranche_id: tranche.id.clone(),
        employee_id: tranche.employee_id.clone(),
        employee_name: tranche.employee_name.clone(),
        start_date: tranche.start_date,
        end_date: tranche.end_date,
        position: tranche.position.clone(),
        job_title: tranche.job_title.clone(),
        dimensions: tranche.dimensions.clone(),
        placement: tranche.placement.clone(),
        contract: tranche.contract.clone(),
        year_month: month,
        accrual_days: days,
        total_value: apportion_total(cost.total, days),
        breakdown: cost.breakdown.map(|component| apportion_component(component, days)),
    }
}
