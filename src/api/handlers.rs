//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints. Each
//! handler parses its request, resolves the statutory table, runs the
//! pipeline on the blocking pool and wraps the report in a
//! [`CalculationResult`].

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    accrue_records, calculate_yearly_projection, reconcile_period, resolve_dimension_names,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationResult, RunDiagnostics};

use super::request::{AccrualRequest, ProjectionRequest, ReconciliationRequest, resolve_statutory};
use super::response::{AccrualReport, ApiError, ApiErrorResponse, ReconciliationReport};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/accrual", post(accrual_handler))
        .route("/projection", post(projection_handler))
        .route("/reconciliation", post(reconciliation_handler))
        .with_state(state)
}

/// Handler for POST /accrual.
///
/// Returns every accrued month with its per-tranche details.
async fn accrual_handler(
    State(state): State<AppState>,
    payload: Result<Json<AccrualRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing accrual request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let table = match resolve_statutory(request.statutory, state.config()) {
        Ok(table) => table,
        Err(error) => {
            return error_response(correlation_id, ApiErrorResponse::bad_request(error));
        }
    };

    let config = state.shared();
    let tranches = request.tranches;
    let records = tranches.len();
    let start_time = Instant::now();

    let outcome = run_blocking(move || {
        let mut accrual = accrue_records(&tranches, &table);
        resolve_dimension_names(&mut accrual.months, config.catalogs());
        Ok(accrual)
    })
    .await;

    match outcome {
        Ok(accrual) => {
            let duration_us = start_time.elapsed().as_micros() as u64;
            let report = AccrualReport::from_months(accrual.months);
            info!(
                correlation_id = %correlation_id,
                records,
                months = report.months.len(),
                skipped = accrual.skipped.len(),
                total = %report.total,
                duration_us,
                "Accrual completed successfully"
            );
            json_response(CalculationResult::new(
                report,
                RunDiagnostics::new(
                    accrual.skipped,
                    accrual.missing_statutory_years,
                    duration_us,
                ),
            ))
        }
        Err(err) => error_response(correlation_id, err.into()),
    }
}

/// Handler for POST /projection.
///
/// Returns the yearly projection with the project matrix sorted by total,
/// largest first.
async fn projection_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProjectionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing projection request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let table = match resolve_statutory(request.statutory, state.config()) {
        Ok(table) => table,
        Err(error) => {
            return error_response(correlation_id, ApiErrorResponse::bad_request(error));
        }
    };

    let config = state.shared();
    let tranches = request.tranches;
    let year = request.year;
    let records = tranches.len();
    let start_time = Instant::now();

    let outcome = run_blocking(move || {
        Ok(calculate_yearly_projection(
            &tranches,
            &table,
            year,
            config.catalogs(),
        ))
    })
    .await;

    match outcome {
        Ok(mut outcome) => {
            let duration_us = start_time.elapsed().as_micros() as u64;
            outcome.projection.sort_projects_by_total();
            info!(
                correlation_id = %correlation_id,
                year,
                records,
                headcount = outcome.projection.headcount,
                skipped = outcome.skipped.len(),
                total = %outcome.projection.total,
                duration_us,
                "Projection completed successfully"
            );
            json_response(CalculationResult::new(
                outcome.projection,
                RunDiagnostics::new(
                    outcome.skipped,
                    outcome.missing_statutory_years,
                    duration_us,
                ),
            ))
        }
        Err(err) => error_response(correlation_id, err.into()),
    }
}

/// Handler for POST /reconciliation.
///
/// Compares the projection of one month against the amounts paid in it.
async fn reconciliation_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconciliationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing reconciliation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let table = match resolve_statutory(request.statutory, state.config()) {
        Ok(table) => table,
        Err(error) => {
            return error_response(correlation_id, ApiErrorResponse::bad_request(error));
        }
    };

    let ReconciliationRequest {
        period,
        tranches,
        paid,
        ..
    } = request;
    let records = tranches.len();
    let start_time = Instant::now();

    match run_blocking(move || reconcile_period(&tranches, &table, &period, &paid)).await {
        Ok(outcome) => {
            let duration_us = start_time.elapsed().as_micros() as u64;
            let report = ReconciliationReport {
                period: outcome.period,
                total_budgeted: outcome.total_budgeted(),
                total_paid: outcome.total_paid(),
                lines: outcome.lines,
            };
            info!(
                correlation_id = %correlation_id,
                period = %report.period,
                records,
                lines = report.lines.len(),
                budgeted = %report.total_budgeted,
                paid = %report.total_paid,
                duration_us,
                "Reconciliation completed successfully"
            );
            json_response(CalculationResult::new(
                report,
                RunDiagnostics::new(
                    outcome.skipped,
                    outcome.missing_statutory_years,
                    duration_us,
                ),
            ))
        }
        Err(err) => error_response(correlation_id, err.into()),
    }
}

/// Runs CPU-bound pipeline work on the blocking thread pool.
async fn run_blocking<T, F>(work: F) -> EngineResult<T>
where
    F: FnOnce() -> EngineResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| EngineError::CalculationError {
            message: format!("calculation task failed: {}", err),
        })?
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, api_error: ApiErrorResponse) -> Response {
    warn!(
        correlation_id = %correlation_id,
        code = %api_error.error.code,
        error = %api_error.error.message,
        "Request failed"
    );
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

fn json_response<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
