//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load payroll configurations from
//! YAML files, including metadata, year-indexed statutory parameters and the
//! display-name catalogs of the financing dimensions.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/colombia").unwrap();
//! println!("Loaded configuration: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{Catalogs, Dimension, PayrollConfig, PayrollMetadata};
