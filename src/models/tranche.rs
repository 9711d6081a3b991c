//! Financing tranche models.
//!
//! A tranche ties part of an employee's compensation to a project and
//! funding source for a date range. Rows arrive from the data-access layer as
//! loosely typed [`TrancheRecord`]s and are converted by the preprocessor into
//! typed [`FinancingTranche`]s before any cost is computed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Job title of teaching staff, exempt from most benefits.
pub const LECTIVA_JOB_TITLE: &str = "Lectiva";

/// Salary band of the integral-salary tier (bases computed on 70% of salary).
pub const INTEGRAL_SALARY_BAND: &str = "B01";

/// Job family of apprentices, exempt from payroll contributions.
pub const APPRENTICE_FAMILY: &str = "Aprendiz";

/// Positions that do not contribute to pension.
pub const PENSION_EXEMPT_POSITIONS: [&str; 2] = ["IHPO_119", "IHPO_6ac"];

/// Contract status prefix marking a contract as active (case-insensitive).
pub const ACTIVE_STATUS_PREFIX: &str = "ACTIVO";

/// A tranche row as delivered by the data-access layer.
///
/// Every field is optional: source rows are messy, and the preprocessor
/// decides what is usable. Dates are kept as strings and numeric fields as
/// raw JSON values until then. Text fields take numbers as their decimal
/// text and drop booleans, arrays and objects, so a mistyped cell never
/// fails the whole batch. The column names of the source tables are
/// accepted as aliases.
///
/// # Example
///
/// ```
/// use payroll_engine::models::TrancheRecord;
///
/// let json = r#"{
///     "id_financiacion": 42,
///     "cedula": "1020304050",
///     "fecha_inicio": "2025-01-01",
///     "fecha_fin": "2025-06-30T00:00:00",
///     "salario_base": "3000000",
///     "atep": 0.00522,
///     "id_proyecto": "P-001"
/// }"#;
///
/// let record: TrancheRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(record.id.as_deref(), Some("42"));
/// assert_eq!(record.project_code.as_deref(), Some("P-001"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrancheRecord {
    /// Tranche identifier.
    #[serde(alias = "id_financiacion", deserialize_with = "loose_string")]
    pub id: Option<String>,
    /// Employee identity document.
    #[serde(alias = "cedula", deserialize_with = "loose_string")]
    pub employee_id: Option<String>,
    /// Employee display name.
    #[serde(alias = "nombre", alias = "nombre_completo", deserialize_with = "loose_string")]
    pub employee_name: Option<String>,
    /// Start date (`YYYY-MM-DD`, timestamps accepted).
    #[serde(alias = "fecha_inicio", deserialize_with = "loose_string")]
    pub start_date: Option<String>,
    /// End date (`YYYY-MM-DD`, timestamps accepted).
    #[serde(alias = "fecha_fin", deserialize_with = "loose_string")]
    pub end_date: Option<String>,
    /// Monthly base salary.
    #[serde(alias = "salario_base")]
    pub base_salary: Option<serde_json::Value>,
    /// Alternate monthly amount used by snapshot rows.
    #[serde(alias = "valor_mensual")]
    pub monthly_value: Option<serde_json::Value>,
    /// Position identifier.
    #[serde(alias = "posicion_c", alias = "posicion", deserialize_with = "loose_string")]
    pub position: Option<String>,
    /// Job title ("cargo").
    #[serde(alias = "cargo", deserialize_with = "loose_string")]
    pub job_title: Option<String>,
    /// Salary band.
    #[serde(alias = "banda", deserialize_with = "loose_string")]
    pub band: Option<String>,
    /// Job family.
    #[serde(alias = "familia", deserialize_with = "loose_string")]
    pub family: Option<String>,
    /// Occupational-risk rate ("atep").
    #[serde(alias = "atep")]
    pub risk_rate: Option<serde_json::Value>,
    /// Project code.
    #[serde(alias = "id_proyecto", alias = "cod_proyecto", deserialize_with = "loose_string")]
    pub project_code: Option<String>,
    /// Project display name.
    #[serde(alias = "proyecto", deserialize_with = "loose_string")]
    pub project_name: Option<String>,
    /// Funding source code.
    #[serde(alias = "id_fuente", alias = "cod_fuente", deserialize_with = "loose_string")]
    pub funding_source: Option<String>,
    /// Component code.
    #[serde(alias = "id_componente", alias = "cod_componente", deserialize_with = "loose_string")]
    pub component: Option<String>,
    /// Subcomponent code.
    #[serde(
        alias = "id_subcomponente",
        alias = "cod_subcomponente",
        deserialize_with = "loose_string"
    )]
    pub subcomponent: Option<String>,
    /// Category code.
    #[serde(alias = "id_categoria", alias = "cod_categoria", deserialize_with = "loose_string")]
    pub category: Option<String>,
    /// Responsible code.
    #[serde(alias = "id_responsable", alias = "cod_responsable", deserialize_with = "loose_string")]
    pub responsible: Option<String>,
    /// Budget line ("rubro").
    #[serde(alias = "rubro", deserialize_with = "loose_string")]
    pub budget_line: Option<String>,
    /// Contract identifier.
    #[serde(alias = "id_contrato", deserialize_with = "loose_string")]
    pub contract_id: Option<String>,
    /// Contract status text, e.g. "Activo" or "Retirado".
    #[serde(alias = "estado", deserialize_with = "loose_string")]
    pub contract_status: Option<String>,
    /// Real termination date of the contract, if any.
    #[serde(alias = "fecha_terminacion_real", deserialize_with = "loose_string")]
    pub actual_termination_date: Option<String>,
    /// Hire date.
    #[serde(alias = "fecha_ingreso", deserialize_with = "loose_string")]
    pub hire_date: Option<String>,
    /// Organizational direction.
    #[serde(alias = "Direccion", deserialize_with = "loose_string")]
    pub direction: Option<String>,
    /// Management unit ("gerencia").
    #[serde(alias = "gerencia", alias = "Gerencia", deserialize_with = "loose_string")]
    pub management: Option<String>,
    /// Plant ("Planta").
    #[serde(alias = "Planta", deserialize_with = "loose_string")]
    pub plant: Option<String>,
    /// Funding base ("Base_Fuente").
    #[serde(alias = "Base_Fuente", deserialize_with = "loose_string")]
    pub funding_base: Option<String>,
    /// Plant type ("Tipo_planta").
    #[serde(alias = "Tipo_planta", deserialize_with = "loose_string")]
    pub plant_type: Option<String>,
}

/// Accepts a string or a number and keeps it as a string.
pub(crate) fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Free-form dimensional tags a tranche is financed under.
///
/// The `*_name` fields hold display names looked up in the configured
/// catalogs; they stay `None` until names are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrancheDimensions {
    /// Project code.
    pub project_code: Option<String>,
    /// Project display name, from the row or the catalog.
    pub project_name: Option<String>,
    /// Funding source code.
    pub funding_source: Option<String>,
    /// Funding source display name.
    pub funding_source_name: Option<String>,
    /// Component code.
    pub component: Option<String>,
    /// Component display name.
    pub component_name: Option<String>,
    /// Subcomponent code.
    pub subcomponent: Option<String>,
    /// Subcomponent display name.
    pub subcomponent_name: Option<String>,
    /// Category code.
    pub category: Option<String>,
    /// Category display name.
    pub category_name: Option<String>,
    /// Responsible code.
    pub responsible: Option<String>,
    /// Responsible display name.
    pub responsible_name: Option<String>,
    /// Budget line.
    pub budget_line: Option<String>,
}

/// Where the employee sits in the organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Organizational direction.
    pub direction: Option<String>,
    /// Management unit.
    pub management: Option<String>,
    /// Plant.
    pub plant: Option<String>,
    /// Funding base used by the coverage view.
    pub funding_base: Option<String>,
    /// Plant type.
    pub plant_type: Option<String>,
}

/// Contract metadata attached to a tranche.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    /// Contract identifier.
    pub contract_id: Option<String>,
    /// Contract status text.
    pub contract_status: Option<String>,
    /// Real termination date.
    pub actual_termination_date: Option<NaiveDate>,
    /// Hire date.
    pub hire_date: Option<NaiveDate>,
}

impl ContractInfo {
    /// Returns true when the status starts with "ACTIVO", ignoring case.
    ///
    /// A missing status counts as inactive.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::ContractInfo;
    ///
    /// let mut contract = ContractInfo::default();
    /// assert!(!contract.is_active());
    ///
    /// contract.contract_status = Some("Activo - Indefinido".to_string());
    /// assert!(contract.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        self.contract_status
            .as_deref()
            .map(|s| s.trim().to_uppercase().starts_with(ACTIVE_STATUS_PREFIX))
            .unwrap_or(false)
    }
}

/// A preprocessed, typed financing tranche.
///
/// Invariant: `start_date <= end_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingTranche {
    /// Tranche identifier.
    pub id: String,
    /// Employee identity document.
    pub employee_id: String,
    /// Employee display name.
    pub employee_name: Option<String>,
    /// First financed day (inclusive).
    pub start_date: NaiveDate,
    /// Last financed day (inclusive), already clamped to termination.
    pub end_date: NaiveDate,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Position identifier.
    pub position: Option<String>,
    /// Job title ("cargo").
    pub job_title: Option<String>,
    /// Salary band.
    pub band: Option<String>,
    /// Job family.
    pub family: Option<String>,
    /// Occupational-risk rate.
    pub risk_rate: Decimal,
    /// Dimensional tags.
    pub dimensions: TrancheDimensions,
    /// Organizational placement.
    pub placement: Placement,
    /// Contract metadata.
    pub contract: ContractInfo,
}

impl FinancingTranche {
    /// Creates a tranche with the given identity, dates and salary and no
    /// categorical attributes.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::FinancingTranche;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let tranche = FinancingTranche::new(
    ///     "F-1",
    ///     "1020304050",
    ///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
    ///     Decimal::from(3_000_000),
    /// );
    /// assert!(!tranche.is_lectiva());
    /// ```
    pub fn new(
        id: impl Into<String>,
        employee_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        base_salary: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            employee_id: employee_id.into(),
            employee_name: None,
            start_date,
            end_date,
            base_salary,
            position: None,
            job_title: None,
            band: None,
            family: None,
            risk_rate: Decimal::ZERO,
            dimensions: TrancheDimensions::default(),
            placement: Placement::default(),
            contract: ContractInfo::default(),
        }
    }

    /// Returns true for teaching staff ("Lectiva").
    pub fn is_lectiva(&self) -> bool {
        self.job_title.as_deref() == Some(LECTIVA_JOB_TITLE)
    }

    /// Returns true for the integral-salary band.
    pub fn is_integral(&self) -> bool {
        self.band.as_deref() == Some(INTEGRAL_SALARY_BAND)
    }

    /// Returns true for apprentices.
    pub fn is_apprentice(&self) -> bool {
        self.family.as_deref() == Some(APPRENTICE_FAMILY)
    }

    /// Returns true when the position is exempt from pension contributions.
    pub fn is_pension_exempt(&self) -> bool {
        self.position
            .as_deref()
            .is_some_and(|p| PENSION_EXEMPT_POSITIONS.contains(&p))
    }
}
