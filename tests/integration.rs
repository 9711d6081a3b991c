//! Integration tests for the payroll engine HTTP API.
//!
//! This test suite drives the router end to end with the configuration in
//! `config/colombia` (whose 2024 parameters are SMLV 1,300,000, transport
//! 162,000 and allowance 150,000) and covers:
//! - Full-month costs for each salary regime
//! - Partial months on the base-30 calendar
//! - Skipped records and missing statutory years
//! - Yearly projections by project, direction and funding base
//! - Projected vs paid reconciliation
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/colombia").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).unwrap(),
        other => panic!("Expected a decimal, got {}", other),
    }
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn create_tranche(id: &str, employee: &str, start: &str, end: &str, salary: u64) -> Value {
    json!({
        "id_financiacion": id,
        "cedula": employee,
        "nombre": format!("Empleado {}", employee),
        "fecha_inicio": start,
        "fecha_fin": end,
        "salario_base": salary,
        "cargo": "Analista",
        "banda": "B02",
        "atep": 0.00522,
        "id_proyecto": "P-001"
    })
}

fn with(mut tranche: Value, key: &str, value: Value) -> Value {
    tranche[key] = value;
    tranche
}

async fn accrue(tranches: Vec<Value>) -> Value {
    let (status, result) = post(
        create_router_for_test(),
        "/accrual",
        json!({ "tranches": tranches }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "unexpected response: {}", result);
    result
}

fn month_total(result: &Value, year_month: &str) -> Decimal {
    let months = result["result"]["months"].as_array().unwrap();
    let month = months
        .iter()
        .find(|m| m["year_month"] == year_month)
        .unwrap_or_else(|| panic!("month {} not found", year_month));
    decimal(&month["total"])
}

fn first_detail(result: &Value) -> &Value {
    &result["result"]["months"][0]["details"][0]
}

fn assert_total(result: &Value, expected: i64) {
    let actual = decimal(&result["result"]["total"]);
    assert_eq!(
        actual,
        Decimal::from(expected),
        "Expected total {}, got {}",
        expected,
        actual
    );
}

// =============================================================================
// SECTION 1: Full-month costs
// =============================================================================

#[tokio::test]
async fn test_full_month_analyst_three_million() {
    let result = accrue(vec![create_tranche(
        "F-1",
        "100",
        "2024-01-01",
        "2024-01-31",
        3_000_000,
    )])
    .await;

    assert_total(&result, 4_681_300);
    let detail = first_detail(&result);
    assert_eq!(detail["accrual_days"], 30);
    assert_eq!(decimal(&detail["breakdown"]["salary"]), Decimal::from(3_000_000));
    assert_eq!(decimal(&detail["breakdown"]["transport_aid"]), Decimal::ZERO);
    assert_eq!(decimal(&detail["breakdown"]["health"]), Decimal::from(255_000));
    assert_eq!(decimal(&detail["breakdown"]["pension"]), Decimal::from(360_000));
}

#[tokio::test]
async fn test_full_month_transport_eligible_salary() {
    let tranche = with(
        create_tranche("F-1", "100", "2024-01-01", "2024-01-31", 1_500_000),
        "banda",
        json!("B03"),
    );
    let result = accrue(vec![tranche]).await;

    assert_total(&result, 2_543_740);
    let detail = first_detail(&result);
    assert_eq!(decimal(&detail["breakdown"]["transport_aid"]), Decimal::from(162_000));
    assert_eq!(decimal(&detail["breakdown"]["allowance"]), Decimal::from(12_500));
}

#[tokio::test]
async fn test_full_month_integral_salary() {
    let tranche = with(
        create_tranche("F-1", "100", "2024-01-01", "2024-01-31", 10_000_000),
        "banda",
        json!("B01"),
    );
    let result = accrue(vec![tranche]).await;

    assert_total(&result, 12_935_500);
    let detail = first_detail(&result);
    assert_eq!(decimal(&detail["breakdown"]["bonuses"]), Decimal::ZERO);
    assert_eq!(decimal(&detail["breakdown"]["severance"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_full_month_lectiva() {
    let tranche = with(
        create_tranche("F-1", "100", "2024-01-01", "2024-01-31", 2_000_000),
        "cargo",
        json!("Lectiva"),
    );
    let result = accrue(vec![tranche]).await;

    assert_total(&result, 2_169_300);
    let detail = first_detail(&result);
    assert_eq!(decimal(&detail["breakdown"]["pension"]), Decimal::ZERO);
    assert_eq!(decimal(&detail["breakdown"]["ccf"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_full_month_apprentice() {
    let tranche = with(
        create_tranche("F-1", "100", "2024-01-01", "2024-01-31", 1_300_000),
        "familia",
        json!("Aprendiz"),
    );
    let result = accrue(vec![tranche]).await;

    assert_total(&result, 2_114_700);
    let detail = first_detail(&result);
    assert_eq!(decimal(&detail["breakdown"]["sena"]), Decimal::ZERO);
    assert_eq!(decimal(&detail["breakdown"]["icbf"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_full_month_pension_exempt_position() {
    let tranche = with(
        create_tranche("F-1", "100", "2024-01-01", "2024-01-31", 3_000_000),
        "posicion",
        json!("IHPO_119"),
    );
    let result = accrue(vec![tranche]).await;

    assert_total(&result, 4_321_300);
}

// =============================================================================
// SECTION 2: Base-30 calendar
// =============================================================================

#[tokio::test]
async fn test_last_six_days_of_january() {
    let result = accrue(vec![create_tranche(
        "F-1",
        "100",
        "2024-01-25",
        "2024-01-31",
        3_000_000,
    )])
    .await;

    assert_total(&result, 936_260);
    assert_eq!(first_detail(&result)["accrual_days"], 6);
}

#[tokio::test]
async fn test_seven_days_rounds_total_half_even() {
    let result = accrue(vec![create_tranche(
        "F-1",
        "100",
        "2024-01-24",
        "2024-01-31",
        3_000_000,
    )])
    .await;

    assert_total(&result, 1_092_303);
}

#[tokio::test]
async fn test_partial_month_apportions_components() {
    let tranche = with(
        create_tranche("F-1", "100", "2024-01-25", "2024-01-31", 1_500_000),
        "banda",
        json!("B03"),
    );
    let result = accrue(vec![tranche]).await;

    assert_total(&result, 508_748);
    let detail = first_detail(&result);
    assert_eq!(decimal(&detail["breakdown"]["salary"]), Decimal::from(300_000));
    assert_eq!(decimal(&detail["breakdown"]["transport_aid"]), Decimal::from(32_400));
}

#[tokio::test]
async fn test_leap_february_counts_as_full_month() {
    let result = accrue(vec![create_tranche(
        "F-1",
        "100",
        "2024-01-01",
        "2024-02-29",
        3_000_000,
    )])
    .await;

    assert_eq!(month_total(&result, "2024-02-01"), Decimal::from(4_681_300));
    assert_total(&result, 9_362_600);
}

#[tokio::test]
async fn test_day_thirty_one_start_earns_one_day() {
    let result = accrue(vec![create_tranche(
        "F-1",
        "100",
        "2024-01-31",
        "2024-02-29",
        3_000_000,
    )])
    .await;

    let months = result["result"]["months"].as_array().unwrap();
    assert_eq!(months[0]["details"][0]["accrual_days"], 1);
    assert_eq!(months[1]["details"][0]["accrual_days"], 30);
}

#[tokio::test]
async fn test_inactive_contract_stops_at_termination_date() {
    let tranche = with(
        with(
            create_tranche("F-1", "100", "2024-01-01", "2024-12-31", 3_000_000),
            "estado",
            json!("RETIRADO"),
        ),
        "fecha_terminacion_real",
        json!("2024-03-15"),
    );
    let result = accrue(vec![tranche]).await;

    let months = result["result"]["months"].as_array().unwrap();
    assert_eq!(months.len(), 3);
    assert_eq!(month_total(&result, "2024-03-01"), Decimal::from(2_340_650));
}

#[tokio::test]
async fn test_active_contract_ignores_termination_date() {
    let tranche = with(
        with(
            create_tranche("F-1", "100", "2024-01-01", "2024-06-30", 3_000_000),
            "estado",
            json!("ACTIVO"),
        ),
        "fecha_terminacion_real",
        json!("2024-03-15"),
    );
    let result = accrue(vec![tranche]).await;

    assert_eq!(result["result"]["months"].as_array().unwrap().len(), 6);
}

// =============================================================================
// SECTION 3: Diagnostics
// =============================================================================

#[tokio::test]
async fn test_bad_rows_are_skipped_not_fatal() {
    let bad_salary = with(
        create_tranche("F-2", "200", "2024-01-01", "2024-01-31", 0),
        "salario_base",
        json!("abc"),
    );
    let mut no_start = create_tranche("F-3", "300", "2024-01-01", "2024-01-31", 3_000_000);
    no_start.as_object_mut().unwrap().remove("fecha_inicio");

    let result = accrue(vec![
        create_tranche("F-1", "100", "2024-01-01", "2024-01-31", 3_000_000),
        bad_salary,
        no_start,
    ])
    .await;

    assert_total(&result, 4_681_300);
    let skipped = result["diagnostics"]["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0]["tranche_id"], "F-2");
    assert_eq!(skipped[0]["stage"], "preprocess");
    assert_eq!(skipped[1]["tranche_id"], "F-3");

    let warnings = result["diagnostics"]["warnings"].as_array().unwrap();
    assert!(warnings.iter().any(|w| w["code"] == "RECORDS_SKIPPED"));
}

#[tokio::test]
async fn test_mistyped_cells_skip_only_their_row() {
    let numeric_start = with(
        create_tranche("F-2", "200", "2024-01-01", "2024-01-31", 3_000_000),
        "fecha_inicio",
        json!(20240101),
    );
    let numeric_band = with(
        create_tranche("F-3", "300", "2024-01-01", "2024-01-31", 3_000_000),
        "banda",
        json!(1),
    );

    let result = accrue(vec![
        create_tranche("F-1", "100", "2024-01-01", "2024-01-31", 3_000_000),
        numeric_start,
        numeric_band,
    ])
    .await;

    assert_total(&result, 9_362_600);
    let skipped = result["diagnostics"]["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["tranche_id"], "F-2");
    assert_eq!(skipped[0]["stage"], "preprocess");
}

#[tokio::test]
async fn test_out_of_range_salary_is_skipped_at_accrual() {
    let huge = with(
        create_tranche("F-2", "200", "2024-01-01", "2024-03-31", 0),
        "salario_base",
        json!("70000000000000000000000000000"),
    );

    let result = accrue(vec![
        create_tranche("F-1", "100", "2024-01-01", "2024-01-31", 3_000_000),
        huge,
    ])
    .await;

    assert_total(&result, 4_681_300);
    let skipped = result["diagnostics"]["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["tranche_id"], "F-2");
    assert_eq!(skipped[0]["stage"], "accrual");
}

#[tokio::test]
async fn test_monthly_value_replaces_zero_salary() {
    let tranche = with(
        create_tranche("F-1", "100", "2024-01-01", "2024-01-31", 0),
        "valor_mensual",
        json!("3000000"),
    );
    let result = accrue(vec![tranche]).await;

    assert_total(&result, 4_681_300);
}

#[tokio::test]
async fn test_missing_statutory_year_is_reported() {
    let result = accrue(vec![create_tranche(
        "F-1",
        "100",
        "2027-01-01",
        "2027-01-31",
        3_000_000,
    )])
    .await;

    assert_eq!(result["diagnostics"]["missing_statutory_years"], json!([2027]));
    let warnings = result["diagnostics"]["warnings"].as_array().unwrap();
    assert_eq!(warnings[0]["code"], "MISSING_STATUTORY_YEAR");
    assert_eq!(
        decimal(&first_detail(&result)["breakdown"]["transport_aid"]),
        Decimal::ZERO
    );
}

#[tokio::test]
async fn test_request_statutory_overrides_configuration() {
    let body = json!({
        "tranches": [create_tranche("F-1", "100", "2025-01-01", "2025-01-31", 3_000_000)],
        "statutory": [{
            "anio": 2025,
            "porcentaje_aumento": 0,
            "smlv": 1300000,
            "transporte": 162000,
            "dotacion": 150000
        }]
    });
    let (status, result) = post(create_router_for_test(), "/accrual", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_total(&result, 4_681_300);
}

#[tokio::test]
async fn test_result_contains_envelope_fields() {
    let result = accrue(vec![create_tranche(
        "F-1",
        "100",
        "2024-01-01",
        "2024-01-31",
        3_000_000,
    )])
    .await;

    assert!(result["calculation_id"].is_string());
    assert!(result["timestamp"].is_string());
    assert_eq!(result["engine_version"], env!("CARGO_PKG_VERSION"));
    assert!(result["diagnostics"]["duration_us"].is_u64());

    let detail = first_detail(&result);
    assert_eq!(detail["tranche_id"], "F-1");
    assert_eq!(detail["employee_id"], "100");
    assert_eq!(detail["employee_name"], "Empleado 100");
    assert_eq!(detail["year_month"], "2024-01-01");
}

#[tokio::test]
async fn test_details_carry_catalog_names() {
    let tranche = create_tranche("F-1", "100", "2024-01-01", "2024-01-31", 3_000_000);
    let tranche = with(tranche, "id_fuente", json!("F-10"));
    let tranche = with(tranche, "id_componente", json!("C-1"));
    let tranche = with(tranche, "id_subcomponente", json!("SC-99"));
    let result = accrue(vec![tranche]).await;

    let detail = first_detail(&result);
    assert_eq!(detail["project_name"], "Monitoreo de Bosques Andinos");
    assert_eq!(detail["funding_source_name"], "Cooperación Internacional");
    assert_eq!(detail["component_name"], "Investigación");
    assert_eq!(detail["subcomponent"], "SC-99");
    assert!(detail["subcomponent_name"].is_null());
}

#[tokio::test]
async fn test_accrual_reports_headcount_per_month() {
    let result = accrue(vec![
        create_tranche("F-1", "100", "2024-01-01", "2024-02-29", 3_000_000),
        create_tranche("F-2", "100", "2024-01-01", "2024-01-31", 1_500_000),
        create_tranche("F-3", "200", "2024-02-10", "2024-02-20", 3_000_000),
    ])
    .await;

    let headcount = &result["result"]["headcount_by_month"];
    assert_eq!(headcount["2024-01-01"], 1);
    assert_eq!(headcount["2024-02-01"], 2);
}

// =============================================================================
// SECTION 4: Yearly projection
// =============================================================================

#[tokio::test]
async fn test_projection_groups_projects_directions_and_bases() {
    let analyst = with(
        create_tranche("F-1", "100", "2024-01-01", "2024-12-31", 3_000_000),
        "Direccion",
        json!("Ciencias"),
    );
    let assistant = with(
        with(
            create_tranche("F-2", "200", "2024-07-01", "2024-12-31", 1_500_000),
            "banda",
            json!("B03"),
        ),
        "id_proyecto",
        json!("P-002"),
    );
    let unassigned = with(
        create_tranche("F-3", "100", "2024-01-01", "2024-01-31", 3_000_000),
        "id_proyecto",
        Value::Null,
    );

    let body = json!({ "year": 2024, "tranches": [assistant, analyst, unassigned] });
    let (status, result) = post(create_router_for_test(), "/projection", body).await;
    assert_eq!(status, StatusCode::OK);

    let projection = &result["result"];
    assert_eq!(projection["year"], 2024);
    assert_eq!(projection["headcount"], 2);
    assert_eq!(
        decimal(&projection["total"]),
        Decimal::from(4_681_300 * 12 + 2_543_740 * 6 + 4_681_300)
    );

    let matrix = projection["project_matrix"].as_array().unwrap();
    assert_eq!(matrix.len(), 3);
    assert_eq!(matrix[0]["label"], "P-001 - Monitoreo de Bosques Andinos");
    assert_eq!(matrix[1]["label"], "P-002 - Inventario Nacional de Biodiversidad");
    assert_eq!(matrix[2]["label"], "SIN_PROYECTO - SIN_PROYECTO");
    assert_eq!(decimal(&matrix[1]["monthly"][0]), Decimal::ZERO);
    assert_eq!(decimal(&matrix[1]["monthly"][6]), Decimal::from(2_543_740));

    assert_eq!(projection["headcount_by_direction"]["Ciencias"], 1);
    assert_eq!(projection["headcount_by_direction"]["Sin definir"], 2);
    assert_eq!(projection["headcount_by_funding_base"]["Proyectos"], 2);
    assert_eq!(
        decimal(&projection["cost_by_direction"]["Ciencias"]),
        Decimal::from(4_681_300 * 12)
    );
}

#[tokio::test]
async fn test_projection_ignores_other_years() {
    let body = json!({
        "year": 2025,
        "tranches": [create_tranche("F-1", "100", "2024-11-01", "2024-12-31", 3_000_000)]
    });
    let (status, result) = post(create_router_for_test(), "/projection", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&result["result"]["total"]), Decimal::ZERO);
    assert_eq!(result["result"]["headcount"], 0);
    assert!(result["result"]["project_matrix"].as_array().unwrap().is_empty());
}

// =============================================================================
// SECTION 5: Reconciliation
// =============================================================================

#[tokio::test]
async fn test_reconciliation_matches_paid_lines_by_key() {
    let body = json!({
        "period": "2024-03",
        "tranches": [create_tranche("F-1", "100", "2024-01-01", "2024-12-31", 3_000_000)],
        "paid": [
            { "cedula": "100", "id_proyecto": "P-001", "real_pagado": 4000000 },
            { "cedula": "900", "nombre": "Contratista", "id_proyecto": "P-002", "real_pagado": "250000" }
        ]
    });
    let (status, result) = post(create_router_for_test(), "/reconciliation", body).await;
    assert_eq!(status, StatusCode::OK);

    let report = &result["result"];
    assert_eq!(report["period"], "2024-03-01");
    assert_eq!(decimal(&report["total_budgeted"]), Decimal::from(4_681_300));
    assert_eq!(decimal(&report["total_paid"]), Decimal::from(4_250_000));

    let lines = report["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["employee_name"], "Empleado 100");
    assert_eq!(decimal(&lines[0]["gap"]), Decimal::from(-681_300));
    assert_eq!(decimal(&lines[0]["compliance"]), Decimal::new(8545, 2));

    assert_eq!(lines[1]["employee_name"], "Contratista");
    assert_eq!(decimal(&lines[1]["budgeted"]), Decimal::ZERO);
    assert_eq!(decimal(&lines[1]["compliance"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_reconciliation_of_month_without_projection() {
    let body = json!({
        "period": "2023-12",
        "tranches": [create_tranche("F-1", "100", "2024-01-01", "2024-12-31", 3_000_000)]
    });
    let (status, result) = post(create_router_for_test(), "/reconciliation", body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(result["result"]["lines"].as_array().unwrap().is_empty());
}

// =============================================================================
// SECTION 6: Error cases
// =============================================================================

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/projection")
                .header("Content-Type", "application/json")
                .body(Body::from("{\"year\": 2024,"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_tranches_returns_validation_error() {
    let (status, error) = post(create_router_for_test(), "/accrual", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("tranches"));
}

#[tokio::test]
async fn test_invalid_period_returns_400() {
    let body = json!({ "period": "marzo", "tranches": [] });
    let (status, error) = post(create_router_for_test(), "/reconciliation", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PERIOD");
}

#[tokio::test]
async fn test_missing_content_type_returns_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/accrual")
                .body(Body::from(json!({ "tranches": [] }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
