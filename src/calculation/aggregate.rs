//! Yearly aggregation of monthly accruals.
//!
//! Folds the months of one year into the views reporting callers need: the
//! yearly total and headcount, cost and headcount per direction, headcount
//! per funding base, and a per-project matrix with a twelve-month vector.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::config::{Catalogs, Dimension};
use crate::models::{MonthlyAggregate, MonthlyDetail, ProjectRow, YearlyProjection};

/// Project code used for tranches without one.
pub const UNASSIGNED_PROJECT: &str = "SIN_PROYECTO";

/// Direction used for tranches without one.
pub const UNDEFINED_DIRECTION: &str = "Sin definir";

/// Funding base used for tranches without one.
pub const DEFAULT_FUNDING_BASE: &str = "Proyectos";

struct ProjectAccumulator {
    row: ProjectRow,
    employees: HashSet<String>,
}

/// Aggregates the months falling in `year` into a [`YearlyProjection`].
///
/// Months of other years are ignored by every grouped view but are kept in
/// [`YearlyProjection::months`]. Headcounts count distinct employee ids, so an
/// employee financed in several months or projects is counted once per group.
/// Project rows appear in the order their project is first seen.
///
/// Project names come from the detail when it carries one, then from the
/// `catalogs`, and fall back to the code. The months returned in the
/// projection have their dimension names resolved from `catalogs` too.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{accrue, aggregate};
/// use payroll_engine::config::Catalogs;
/// use payroll_engine::models::{FinancingTranche, StatutoryTable};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let tranche = FinancingTranche::new(
///     "F-1",
///     "1020304050",
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
///     Decimal::from(3_000_000),
/// );
/// let accrual = accrue(&[tranche], &StatutoryTable::new());
/// let projection = aggregate(&accrual.months, 2025, &Catalogs::default());
///
/// assert_eq!(projection.headcount, 1);
/// assert_eq!(projection.project_matrix[0].project_code, "SIN_PROYECTO");
/// assert_eq!(projection.total, accrual.total());
/// ```
pub fn aggregate(months: &[MonthlyAggregate], year: i32, catalogs: &Catalogs) -> YearlyProjection {
    let mut total = Decimal::ZERO;
    let mut employees: HashSet<&str> = HashSet::new();
    let mut cost_by_direction: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut direction_employees: BTreeMap<String, HashSet<&str>> = BTreeMap::new();
    let mut funding_base_employees: BTreeMap<String, HashSet<&str>> = BTreeMap::new();
    let mut projects: Vec<ProjectAccumulator> = Vec::new();
    let mut project_index: HashMap<String, usize> = HashMap::new();

    for month in months.iter().filter(|m| m.year_month.year() == year) {
        let month_index = month.year_month.month0() as usize;

        for detail in &month.details {
            let value = detail.total_value;
            total += value;
            employees.insert(&detail.employee_id);

            let direction = non_empty(detail.placement.direction.as_deref())
                .unwrap_or(UNDEFINED_DIRECTION);
            *cost_by_direction.entry(direction.to_string()).or_default() += value;
            direction_employees
                .entry(direction.to_string())
                .or_default()
                .insert(&detail.employee_id);

            let funding_base = non_empty(detail.placement.funding_base.as_deref())
                .unwrap_or(DEFAULT_FUNDING_BASE);
            funding_base_employees
                .entry(funding_base.to_string())
                .or_default()
                .insert(&detail.employee_id);

            let code = non_empty(detail.dimensions.project_code.as_deref())
                .unwrap_or(UNASSIGNED_PROJECT);
            let index = *project_index.entry(code.to_string()).or_insert_with(|| {
                projects.push(new_project(code, detail, catalogs));
                projects.len() - 1
            });

            let project = &mut projects[index];
            project.row.total += value;
            project.row.monthly[month_index] += value;
            project.employees.insert(detail.employee_id.clone());
        }
    }

    let mut resolved = months.to_vec();
    resolve_dimension_names(&mut resolved, catalogs);

    YearlyProjection {
        year,
        total,
        headcount: employees.len(),
        cost_by_direction,
        headcount_by_funding_base: count_sets(funding_base_employees),
        headcount_by_direction: count_sets(direction_employees),
        project_matrix: projects
            .into_iter()
            .map(|mut p| {
                p.row.headcount = p.employees.len();
                p.row
            })
            .collect(),
        months: resolved,
    }
}

/// Fills the display names of every detail's dimensions from `catalogs`.
///
/// A name the row already carries is kept. Codes absent from their catalog
/// leave the name empty.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{accrue, resolve_dimension_names};
/// use payroll_engine::config::Catalogs;
/// use payroll_engine::models::{FinancingTranche, StatutoryTable};
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
/// tranche.dimensions.component = Some("C-1".to_string());
///
/// let mut catalogs = Catalogs::default();
/// catalogs.components.insert("C-1".to_string(), "Investigación".to_string());
///
/// let mut accrual = accrue(&[tranche], &StatutoryTable::new());
/// resolve_dimension_names(&mut accrual.months, &catalogs);
///
/// let dimensions = &accrual.months[0].details[0].dimensions;
/// assert_eq!(dimensions.component_name.as_deref(), Some("Investigación"));
/// ```
pub fn resolve_dimension_names(months: &mut [MonthlyAggregate], catalogs: &Catalogs) {
    for detail in months.iter_mut().flat_map(|m| m.details.iter_mut()) {
        let d = &mut detail.dimensions;
        fill_name(&mut d.project_name, d.project_code.as_deref(), Dimension::Project, catalogs);
        fill_name(
            &mut d.funding_source_name,
            d.funding_source.as_deref(),
            Dimension::FundingSource,
            catalogs,
        );
        fill_name(&mut d.component_name, d.component.as_deref(), Dimension::Component, catalogs);
        fill_name(
            &mut d.subcomponent_name,
            d.subcomponent.as_deref(),
            Dimension::Subcomponent,
            catalogs,
        );
        fill_name(&mut d.category_name, d.category.as_deref(), Dimension::Category, catalogs);
        fill_name(
            &mut d.responsible_name,
            d.responsible.as_deref(),
            Dimension::Responsible,
            catalogs,
        );
    }
}

fn fill_name(
    name: &mut Option<String>,
    code: Option<&str>,
    dimension: Dimension,
    catalogs: &Catalogs,
) {
    if non_empty(name.as_deref()).is_some() {
        return;
    }
    if let Some(found) = non_empty(code).and_then(|c| catalogs.name(dimension, c)) {
        *name = Some(found.to_string());
    }
}

fn new_project(code: &str, detail: &MonthlyDetail, catalogs: &Catalogs) -> ProjectAccumulator {
    let name = non_empty(detail.dimensions.project_name.as_deref())
        .or_else(|| catalogs.name(Dimension::Project, code))
        .unwrap_or(code)
        .to_string();

    ProjectAccumulator {
        row: ProjectRow {
            project_code: code.to_string(),
            label: format!("{} - {}", code, name),
            project_name: name,
            total: Decimal::ZERO,
            monthly: [Decimal::ZERO; 12],
            headcount: 0,
        },
        employees: HashSet::new(),
    }
}

fn count_sets(groups: BTreeMap<String, HashSet<&str>>) -> BTreeMap<String, usize> {
    groups
        .into_iter()
        .map(|(key, members)| (key, members.len()))
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
