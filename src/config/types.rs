//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::StatutoryTable;

/// Metadata about the payroll regime being configured.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollMetadata {
    /// Short code of the configuration (e.g., "CO-BASE30").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Version or effective date of the configuration.
    pub version: String,
    /// ISO currency code of every amount.
    pub currency: String,
}

/// A financing dimension that carries display names in the catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Project codes.
    Project,
    /// Funding source codes.
    FundingSource,
    /// Component codes.
    Component,
    /// Subcomponent codes.
    Subcomponent,
    /// Category codes.
    Category,
    /// Responsible codes.
    Responsible,
}

/// Code-to-name lookup maps for the financing dimensions.
///
/// Catalogs are read-only inputs injected wherever display names are needed.
///
/// # Example
///
/// ```
/// use payroll_engine::config::{Catalogs, Dimension};
///
/// let yaml = "
/// projects:
///   P-001: Monitoreo de Bosques
/// ";
/// let catalogs: Catalogs = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(catalogs.name(Dimension::Project, "P-001"), Some("Monitoreo de Bosques"));
/// assert_eq!(catalogs.name(Dimension::Component, "C-1"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalogs {
    /// Project names by code.
    pub projects: HashMap<String, String>,
    /// Funding source names by code.
    pub funding_sources: HashMap<String, String>,
    /// Component names by code.
    pub components: HashMap<String, String>,
    /// Subcomponent names by code.
    pub subcomponents: HashMap<String, String>,
    /// Category names by code.
    pub categories: HashMap<String, String>,
    /// Responsible names by code.
    pub responsibles: HashMap<String, String>,
}

impl Catalogs {
    /// Returns the display name of `code` in `dimension`, if known.
    ///
    /// Codes are compared after trimming surrounding whitespace.
    pub fn name(&self, dimension: Dimension, code: &str) -> Option<&str> {
        let map = match dimension {
            Dimension::Project => &self.projects,
            Dimension::FundingSource => &self.funding_sources,
            Dimension::Component => &self.components,
            Dimension::Subcomponent => &self.subcomponents,
            Dimension::Category => &self.categories,
            Dimension::Responsible => &self.responsibles,
        };
        map.get(code.trim()).map(String::as_str)
    }
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    metadata: PayrollMetadata,
    statutory: StatutoryTable,
    catalogs: Catalogs,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(metadata: PayrollMetadata, statutory: StatutoryTable, catalogs: Catalogs) -> Self {
        Self {
            metadata,
            statutory,
            catalogs,
        }
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &PayrollMetadata {
        &self.metadata
    }

    /// Returns the statutory parameter table.
    pub fn statutory(&self) -> &StatutoryTable {
        &self.statutory
    }

    /// Returns the display-name catalogs.
    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup_trims_code() {
        let mut catalogs = Catalogs::default();
        catalogs
            .funding_sources
            .insert("F-10".to_string(), "Cooperación".to_string());
        assert_eq!(
            catalogs.name(Dimension::FundingSource, " F-10 "),
            Some("Cooperación")
        );
    }

    #[test]
    fn test_catalog_dimensions_are_independent() {
        let mut catalogs = Catalogs::default();
        catalogs
            .categories
            .insert("X".to_string(), "Categoría X".to_string());
        assert_eq!(catalogs.name(Dimension::Category, "X"), Some("Categoría X"));
        assert_eq!(catalogs.name(Dimension::Responsible, "X"), None);
    }

    #[test]
    fn test_catalogs_missing_sections_default_to_empty() {
        let catalogs: Catalogs = serde_yaml::from_str("components: {}").unwrap();
        assert!(catalogs.projects.is_empty());
        assert!(catalogs.components.is_empty());
    }
}
