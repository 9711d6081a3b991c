//! End-to-end pipeline: normalize, accrue, aggregate.

use tracing::debug;

use crate::config::Catalogs;
use crate::models::{AccrualResult, ProjectionOutcome, StatutoryTable, TrancheRecord};

use super::accrual::accrue;
use super::aggregate::aggregate;
use super::preprocess::normalize;

/// Normalizes raw rows and accrues the usable ones.
///
/// Skip diagnostics of both stages are merged, preprocessing first.
pub fn accrue_records(records: &[TrancheRecord], table: &StatutoryTable) -> AccrualResult {
    let normalized = normalize(records);
    let mut result = accrue(&normalized.tranches, table);

    let mut skipped = normalized.skipped;
    skipped.append(&mut result.skipped);
    result.skipped = skipped;

    result
}

/// Computes the yearly projection of a batch of raw tranche rows.
///
/// Runs the preprocessor, the accrual engine and the aggregator in sequence.
/// Rows either stage rejects are reported in [`ProjectionOutcome::skipped`]
/// and do not stop the run.
///
/// # Arguments
///
/// * `records` - Raw tranche rows from the data-access layer
/// * `table` - Year-indexed statutory parameters
/// * `year` - The year to aggregate
/// * `catalogs` - Display names for project labels
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_yearly_projection;
/// use payroll_engine::config::Catalogs;
/// use payroll_engine::models::{StatutoryTable, StatutoryYearParams, TrancheRecord};
/// use rust_decimal::Decimal;
///
/// let rows: Vec<TrancheRecord> = serde_json::from_str(r#"[
///     {"id_financiacion": 1, "cedula": "100", "fecha_inicio": "2025-01-01",
///      "fecha_fin": "2025-01-31", "salario_base": 3000000, "cargo": "Analista",
///      "banda": "B02", "atep": 0.00522, "id_proyecto": "P-001"}
/// ]"#).unwrap();
///
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
/// let outcome = calculate_yearly_projection(&rows, &table, 2025, &Catalogs::default());
/// assert_eq!(outcome.projection.total, Decimal::from(4_681_300));
/// assert!(outcome.skipped.is_empty());
/// ```
pub fn calculate_yearly_projection(
    records: &[TrancheRecord],
    table: &StatutoryTable,
    year: i32,
    catalogs: &Catalogs,
) -> ProjectionOutcome {
    let accrual = accrue_records(records, table);
    let projection = aggregate(&accrual.months, year, catalogs);

    debug!(
        year,
        records = records.len(),
        skipped = accrual.skipped.len(),
        total = %projection.total,
        "Yearly projection computed"
    );

    ProjectionOutcome {
        projection,
        skipped: accrual.skipped,
        missing_statutory_years: accrual.missing_statutory_years,
    }
}
