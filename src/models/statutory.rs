//! Year-indexed statutory parameters.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Statutory parameters in force for one calendar year.
///
/// # Example
///
/// ```
/// use payroll_engine::models::StatutoryYearParams;
///
/// let yaml = "
/// year: 2025
/// raise_percent: 0
/// minimum_wage: 1423500
/// transport_subsidy: 200000
/// annual_allowance: 150000
/// ";
/// let params: StatutoryYearParams = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(params.year, 2025);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryYearParams {
    /// Calendar year the parameters apply to.
    #[serde(alias = "anio")]
    pub year: i32,
    /// Salary multiplier in percent; zero leaves the salary unchanged.
    #[serde(default, alias = "porcentaje_aumento")]
    pub raise_percent: Decimal,
    /// Monthly legal minimum wage ("SMLV").
    #[serde(default, alias = "smlv")]
    pub minimum_wage: Decimal,
    /// Monthly transport subsidy.
    #[serde(default, alias = "transporte")]
    pub transport_subsidy: Decimal,
    /// Yearly work-clothing allowance ("dotación").
    #[serde(default, alias = "dotacion")]
    pub annual_allowance: Decimal,
}

impl StatutoryYearParams {
    /// Returns parameters with every amount set to zero.
    pub fn zeroed(year: i32) -> Self {
        Self {
            year,
            raise_percent: Decimal::ZERO,
            minimum_wage: Decimal::ZERO,
            transport_subsidy: Decimal::ZERO,
            annual_allowance: Decimal::ZERO,
        }
    }
}

/// Lookup table of statutory parameters keyed by year.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{StatutoryTable, StatutoryYearParams};
/// use rust_decimal::Decimal;
///
/// let mut params = StatutoryYearParams::zeroed(2025);
/// params.minimum_wage = Decimal::from(1_423_500);
/// let table: StatutoryTable = vec![params].into_iter().collect();
///
/// assert_eq!(table.for_year(2025).minimum_wage, Decimal::from(1_423_500));
/// assert_eq!(table.for_year(2030), StatutoryYearParams::zeroed(2030));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryTable {
    by_year: BTreeMap<i32, StatutoryYearParams>,
}

impl StatutoryTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts parameters, replacing any previous entry for the same year.
    pub fn insert(&mut self, params: StatutoryYearParams) -> Option<StatutoryYearParams> {
        self.by_year.insert(params.year, params)
    }

    /// Returns the parameters for `year`, if present.
    pub fn get(&self, year: i32) -> Option<&StatutoryYearParams> {
        self.by_year.get(&year)
    }

    /// Returns the parameters for `year`, or all zeros when the year is absent.
    pub fn for_year(&self, year: i32) -> StatutoryYearParams {
        self.get(year)
            .copied()
            .unwrap_or_else(|| StatutoryYearParams::zeroed(year))
    }

    /// Returns true when `year` has parameters.
    pub fn contains_year(&self, year: i32) -> bool {
        self.by_year.contains_key(&year)
    }

    /// Returns the configured years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    /// Returns the number of configured years.
    pub fn len(&self) -> usize {
        self.by_year.len()
    }

    /// Returns true when no year is configured.
    pub fn is_empty(&self) -> bool {
        self.by_year.is_empty()
    }
}

impl FromIterator<StatutoryYearParams> for StatutoryTable {
    fn from_iter<I: IntoIterator<Item = StatutoryYearParams>>(iter: I) -> Self {
        let mut table = Self::new();
        for params in iter {
            table.insert(params);
        }
        table
    }
}
