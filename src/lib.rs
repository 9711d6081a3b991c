//! Base-30 payroll accrual engine for Colombian statutory costs
//!
//! This crate turns employee financing tranches into month-by-month payroll
//! cost projections: every month counts as 30 days, the full-month cost of a
//! tranche is priced from the statutory parameters of its year, and the
//! result is aggregated by project, direction and funding base.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
