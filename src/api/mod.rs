//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints that serve accruals, yearly
//! projections and projected-vs-paid reconciliations to reporting callers.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AccrualRequest, ProjectionRequest, ReconciliationRequest};
pub use response::{AccrualReport, ApiError, ReconciliationReport};
pub use state::AppState;
