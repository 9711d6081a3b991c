//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{StatutoryTable, StatutoryYearParams};

use super::types::{Catalogs, PayrollConfig, PayrollMetadata};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/colombia/
/// ├── payroll.yaml    # Metadata
/// ├── catalogs.yaml   # Display names per financing dimension
/// └── statutory/
///     └── 2025.yaml   # Statutory parameters for one year
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/colombia").unwrap();
/// let params = loader.statutory_for_year(2025);
/// println!("Minimum wage 2025: {}", params.minimum_wage);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    /// - The `statutory/` directory holds no year files (`ConfigNotFound`)
    /// - Two year files describe the same year (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<PayrollMetadata>(&path.join("payroll.yaml"))?;
        let catalogs = Self::load_yaml::<Catalogs>(&path.join("catalogs.yaml"))?;
        let statutory = Self::load_statutory(&path.join("statutory"))?;

        tracing::debug!(
            code = %metadata.code,
            years = statutory.len(),
            "Loaded payroll configuration"
        );

        Ok(Self {
            config: PayrollConfig::new(metadata, statutory, catalogs),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every year file from the statutory directory.
    fn load_statutory(dir: &Path) -> EngineResult<StatutoryTable> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut table = StatutoryTable::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let params = Self::load_yaml::<StatutoryYearParams>(&path)?;
                if table.insert(params).is_some() {
                    return Err(EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message: format!("duplicate statutory parameters for year {}", params.year),
                    });
                }
            }
        }

        if table.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no statutory files found)", dir_str),
            });
        }

        Ok(table)
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &PayrollMetadata {
        self.config.metadata()
    }

    /// Returns the statutory parameter table.
    pub fn statutory(&self) -> &StatutoryTable {
        self.config.statutory()
    }

    /// Returns the display-name catalogs.
    pub fn catalogs(&self) -> &Catalogs {
        self.config.catalogs()
    }

    /// Returns the statutory parameters for `year`, zeroed when not configured.
    pub fn statutory_for_year(&self, year: i32) -> StatutoryYearParams {
        self.config.statutory().for_year(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimension;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/colombia"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "CO-BASE30");
        assert_eq!(loader.metadata().currency, "COP");
    }

    #[test]
    fn test_statutory_years_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let years: Vec<i32> = loader.statutory().years().collect();
        assert_eq!(years, vec![2024, 2025, 2026]);
    }

    #[test]
    fn test_statutory_values_for_2024() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let params = loader.statutory_for_year(2024);
        assert_eq!(params.minimum_wage, Decimal::from(1_300_000));
        assert_eq!(params.transport_subsidy, Decimal::from(162_000));
        assert_eq!(params.annual_allowance, Decimal::from(150_000));
        assert_eq!(params.raise_percent, Decimal::ZERO);
    }

    #[test]
    fn test_unconfigured_year_is_zeroed() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let params = loader.statutory_for_year(1999);
        assert_eq!(params, StatutoryYearParams::zeroed(1999));
    }

    #[test]
    fn test_catalogs_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(
            loader.catalogs().name(Dimension::Project, "P-001"),
            Some("Monitoreo de Bosques Andinos")
        );
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("payroll.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
