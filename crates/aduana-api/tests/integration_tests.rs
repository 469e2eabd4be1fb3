//! # Integration Tests for aduana-api
//!
//! Exercises the full router: operation lifecycle with the compliance
//! pre-check, document and declaration flows, permits, crossing,
//! rule configuration, authentication middleware, health probes, and
//! the OpenAPI spec endpoint.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use aduana_api::state::{ApiConfig, AppState};

/// Helper: build the test app with auth disabled and no database.
fn test_app() -> axum::Router {
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        auth_token: None,
        metrics_enabled: false,
    };
    aduana_api::app(AppState::new(config, None, None))
}

/// Helper: build the test app with auth enabled.
fn test_app_with_auth(token: &str) -> axum::Router {
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        auth_token: Some(token.to_string()),
        metrics_enabled: false,
    };
    aduana_api::app(AppState::new(config, None, None))
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Helper: create an AIR / CATEGORY_2 operation from Argentina and
/// return its id.
async fn create_operation(app: &axum::Router, reference: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/operations",
            json!({
                "reference": reference,
                "transport_mode": "AIR",
                "category": "CATEGORY_2",
                "origin_country": "AR",
                "actor": "ops@broker.example"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

/// Helper: register one active document of each mandatory type.
async fn register_mandatory_documents(app: &axum::Router, id: &str) {
    for (doc_type, file) in [
        ("BL", "bl.pdf"),
        ("COMMERCIAL_INVOICE", "invoice.pdf"),
        ("PACKING_LIST", "packing.pdf"),
    ] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/operations/{id}/documents"),
                json!({
                    "document_type": doc_type,
                    "file_name": file,
                    "actor": "docs@broker.example"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

// ─── Health Probes ───────────────────────────────────────────────────

#[tokio::test]
async fn test_liveness_probe() {
    let app = test_app();
    let response = app.oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe_without_database() {
    let app = test_app();
    let response = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// ─── Operations ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_operation_starts_in_draft() {
    let app = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/operations",
            json!({
                "reference": "IMP-2026-00042",
                "transport_mode": "MARITIME",
                "category": "CATEGORY_1",
                "origin_country": "CN",
                "actor": "ops@broker.example"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["reference"], "IMP-2026-00042");
    assert_eq!(body["status"], "DRAFT");
    assert_eq!(body["transport_mode"], "MARITIME");
}

#[tokio::test]
async fn test_duplicate_reference_conflicts() {
    let app = test_app();
    create_operation(&app, "IMP-2026-00001").await;
    let response = app
        .oneshot(post_json(
            "/v1/operations",
            json!({
                "reference": "IMP-2026-00001",
                "transport_mode": "AIR",
                "category": "CATEGORY_2",
                "origin_country": "AR",
                "actor": "ops@broker.example"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_create_operation_rejects_bad_country_code() {
    let app = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/operations",
            json!({
                "reference": "IMP-2026-00002",
                "transport_mode": "AIR",
                "category": "CATEGORY_2",
                "origin_country": "ARG",
                "actor": "ops@broker.example"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/operations")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_operation_is_404() {
    let app = test_app();
    let response = app
        .oneshot(get("/v1/operations/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_operations_returns_created_ones() {
    let app = test_app();
    create_operation(&app, "IMP-A").await;
    create_operation(&app, "IMP-B").await;
    let response = app.oneshot(get("/v1/operations")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_allowed_transitions_from_draft() {
    let app = test_app();
    let id = create_operation(&app, "IMP-T").await;
    let response = app
        .oneshot(get(&format!("/v1/operations/{id}/transitions")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!(["DOCUMENTATION_COMPLETE", "CANCELLED"]));
}

#[tokio::test]
async fn test_transition_without_documents_fails_compliance() {
    let app = test_app();
    let id = create_operation(&app, "IMP-NODOCS").await;
    let response = app
        .oneshot(post_json(
            &format!("/v1/operations/{id}/transitions"),
            json!({ "new_status": "DOCUMENTATION_COMPLETE", "actor": "ops@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "COMPLIANCE_FAILED");
    let details = body["error"]["details"].as_array().unwrap();
    assert!(details
        .iter()
        .any(|e| e["rule_code"] == "DOC_COMPLETENESS"));
}

#[tokio::test]
async fn test_transition_with_documents_succeeds() {
    let app = test_app();
    let id = create_operation(&app, "IMP-DOCS").await;
    register_mandatory_documents(&app, &id).await;
    let response = app
        .oneshot(post_json(
            &format!("/v1/operations/{id}/transitions"),
            json!({ "new_status": "DOCUMENTATION_COMPLETE", "actor": "ops@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "DOCUMENTATION_COMPLETE");
}

#[tokio::test]
async fn test_illegal_transition_conflicts() {
    let app = test_app();
    let id = create_operation(&app, "IMP-SKIP").await;
    let response = app
        .oneshot(post_json(
            &format!("/v1/operations/{id}/transitions"),
            json!({ "new_status": "IN_REVIEW", "actor": "ops@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancel_records_history() {
    let app = test_app();
    let id = create_operation(&app, "IMP-CANCEL").await;
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/operations/{id}/transitions"),
            json!({
                "new_status": "CANCELLED",
                "actor": "ops@broker.example",
                "comment": "client withdrew"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/v1/operations/{id}/history")))
        .await
        .unwrap();
    let history = body_json(response).await;
    let records = history.as_array().unwrap();
    // Creation row plus the cancellation.
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["new_status"], "CANCELLED");
    assert_eq!(records[1]["comment"], "client withdrew");
}

#[tokio::test]
async fn test_compliance_dry_run_commits_nothing() {
    let app = test_app();
    let id = create_operation(&app, "IMP-DRYRUN").await;
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/operations/{id}/compliance-check"),
            json!({ "target_status": "DOCUMENTATION_COMPLETE" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["passed"], false);

    // The operation stays in DRAFT.
    let response = app
        .oneshot(get(&format!("/v1/operations/{id}")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["status"], "DRAFT");
}

#[tokio::test]
async fn test_delete_draft_operation() {
    let app = test_app();
    let id = create_operation(&app, "IMP-DEL").await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/operations/{id}?actor=ops@broker.example"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/v1/operations/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ─── Documents ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_document_review_flow() {
    let app = test_app();
    let id = create_operation(&app, "IMP-DOCFLOW").await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/operations/{id}/documents"),
            json!({
                "document_type": "BL",
                "file_name": "bl-draft.pdf",
                "actor": "docs@broker.example"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let doc = body_json(response).await;
    assert_eq!(doc["status"], "PENDING");
    let doc_id = doc["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/operations/{id}/documents/{doc_id}/status"),
            json!({ "status": "VALIDATED", "actor": "review@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "VALIDATED");

    let response = app
        .oneshot(get(&format!("/v1/operations/{id}/documents")))
        .await
        .unwrap();
    let docs = body_json(response).await;
    assert_eq!(docs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_deactivated_document_no_longer_satisfies_completeness() {
    let app = test_app();
    let id = create_operation(&app, "IMP-DEACT").await;
    register_mandatory_documents(&app, &id).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/operations/{id}/documents")))
        .await
        .unwrap();
    let docs = body_json(response).await;
    let bl_id = docs
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["document_type"] == "BL")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!(
                    "/v1/operations/{id}/documents/{bl_id}?actor=docs@broker.example"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            &format!("/v1/operations/{id}/transitions"),
            json!({ "new_status": "DOCUMENTATION_COMPLETE", "actor": "ops@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ─── Declarations ────────────────────────────────────────────────────

#[tokio::test]
async fn test_register_declaration_and_recompute_preliquidation() {
    let app = test_app();
    let id = create_operation(&app, "IMP-DECL").await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/operations/{id}/declarations"),
            json!({
                "declaration_type": "PRELIMINARY",
                "fob_value": "1000.00",
                "freight_value": "100.00",
                "insurance_value": "10.00",
                "lines": [
                    {
                        "line_number": 1,
                        "tariff_code": "8471.30.00",
                        "description": "laptops",
                        "quantity": "10",
                        "unit_value": "100.00",
                        "total_value": "1000.00",
                        "tax_rate": "0.19",
                        "tax_amount": "190.00"
                    }
                ],
                "actor": "analyst@broker.example"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let decl = body_json(response).await;
    assert_eq!(decl["declaration_type"], "PRELIMINARY");
    let decl_id = decl["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/operations/{id}/declarations/{decl_id}/preliquidation"),
            json!({ "actor": "analyst@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let totals = body_json(response).await;
    assert_eq!(totals["fob"], "1000.00");
    assert_eq!(totals["cif"], "1110.00");
    assert_eq!(totals["taxable_base"], "1110.00");
    let taxes: rust_decimal::Decimal = totals["total_taxes"].as_str().unwrap().parse().unwrap();
    assert_eq!(taxes, rust_decimal::Decimal::new(190, 0));

    let response = app
        .oneshot(get(&format!("/v1/operations/{id}/declarations")))
        .await
        .unwrap();
    let records = body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["lines"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_declaration_type_conflicts() {
    let app = test_app();
    let id = create_operation(&app, "IMP-DUPDECL").await;
    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/operations/{id}/declarations"),
                json!({
                    "declaration_type": "PRELIMINARY",
                    "actor": "analyst@broker.example"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn test_declaration_approval_trail() {
    let app = test_app();
    let id = create_operation(&app, "IMP-APPROVE").await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/operations/{id}/declarations"),
            json!({ "declaration_type": "FINAL", "actor": "analyst@broker.example" }),
        ))
        .await
        .unwrap();
    let decl_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/operations/{id}/declarations/{decl_id}/approve-technical"),
            json!({ "actor": "senior@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let decl = body_json(response).await;
    assert_eq!(decl["technical_approved_by"], "senior@broker.example");

    // A second technical approval conflicts.
    let response = app
        .oneshot(post_json(
            &format!("/v1/operations/{id}/declarations/{decl_id}/approve-technical"),
            json!({ "actor": "senior@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ─── Permits ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_permit_lifecycle() {
    let app = test_app();
    let id = create_operation(&app, "IMP-PERMIT").await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/operations/{id}/permits"),
            json!({ "permit_type": "SANITARY", "actor": "ops@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let permit = body_json(response).await;
    assert_eq!(permit["status"], "IN_PROCESS");
    let permit_id = permit["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/operations/{id}/permits/{permit_id}/status"),
            json!({
                "status": "APPROVED",
                "reference": "SAN-991",
                "actor": "ops@broker.example"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let permit = body_json(response).await;
    assert_eq!(permit["status"], "APPROVED");
    assert_eq!(permit["reference"], "SAN-991");

    let response = app
        .oneshot(get(&format!("/v1/operations/{id}/permits")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

// ─── Crossing ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_crossing_requires_both_declarations() {
    let app = test_app();
    let id = create_operation(&app, "IMP-XNONE").await;
    let response = app
        .oneshot(post_json(
            &format!("/v1/operations/{id}/crossing/execute"),
            json!({ "actor": "analyst@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_crossing_result_missing_is_404() {
    let app = test_app();
    let id = create_operation(&app, "IMP-XGET").await;
    let response = app
        .oneshot(get(&format!("/v1/operations/{id}/crossing")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_crossing_detects_value_discrepancy() {
    let app = test_app();
    let id = create_operation(&app, "IMP-XDIFF").await;

    for (decl_type, fob) in [("PRELIMINARY", "1000.00"), ("FINAL", "1200.00")] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/operations/{id}/declarations"),
                json!({
                    "declaration_type": decl_type,
                    "fob_value": fob,
                    "actor": "analyst@broker.example"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/operations/{id}/crossing/execute"),
            json!({ "actor": "analyst@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await;
    assert_eq!(result["status"], "DISCREPANCY");
    assert!(result["discrepancies"]
        .as_array()
        .unwrap()
        .iter()
        .any(|d| d["field"] == "FOB_VALUE"));

    let response = app
        .oneshot(post_json(
            &format!("/v1/operations/{id}/crossing/resolve"),
            json!({
                "actor": "senior@broker.example",
                "comment": "final figures confirmed with the carrier"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "RESOLVED");
}

// ─── Compliance Rule Configuration ───────────────────────────────────

#[tokio::test]
async fn test_list_rules_has_full_catalogue() {
    let app = test_app();
    let response = app.oneshot(get("/v1/compliance/rules")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rules = body_json(response).await;
    let rules = rules.as_array().unwrap();
    assert!(rules.len() >= 15, "expected at least 15 rules, got {}", rules.len());
    let doc_rule = rules
        .iter()
        .find(|r| r["code"] == "DOC_COMPLETENESS")
        .expect("DOC_COMPLETENESS in the catalogue");
    assert_eq!(doc_rule["enabled"], true);
}

#[tokio::test]
async fn test_disabling_a_rule_skips_its_check() {
    let app = test_app();
    let id = create_operation(&app, "IMP-RULEOFF").await;

    let response = app
        .clone()
        .oneshot(put_json(
            "/v1/compliance/rules/DOC_COMPLETENESS",
            json!({ "enabled": false }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["enabled"], false);

    // With completeness disabled (and an AIR operation, so no on-board
    // BL requirement), the transition passes with no documents at all.
    let response = app
        .oneshot(post_json(
            &format!("/v1/operations/{id}/transitions"),
            json!({ "new_status": "DOCUMENTATION_COMPLETE", "actor": "ops@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_updating_unknown_rule_is_404() {
    let app = test_app();
    let response = app
        .oneshot(put_json(
            "/v1/compliance/rules/NO_SUCH_RULE",
            json!({ "enabled": false }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_restricted_country_rule_uses_configured_set() {
    let app = test_app();
    let id = create_operation(&app, "IMP-RESTRICT").await;
    register_mandatory_documents(&app, &id).await;

    // Put Argentina on the restricted list.
    let response = app
        .clone()
        .oneshot(put_json(
            "/v1/compliance/rules/RESTRICTED_COUNTRY",
            json!({ "enabled": true, "params": { "restricted_countries": "AR, CU" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            &format!("/v1/operations/{id}/transitions"),
            json!({ "new_status": "DOCUMENTATION_COMPLETE", "actor": "ops@broker.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    let details = body["error"]["details"].as_array().unwrap();
    assert!(details
        .iter()
        .any(|e| e["rule_code"] == "RESTRICTED_COUNTRY"));
}

// ─── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_bearer_token_is_rejected() {
    let app = test_app_with_auth("sekrit");
    let response = app.oneshot(get("/v1/operations")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_bearer_token_is_rejected() {
    let app = test_app_with_auth("sekrit");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/operations")
                .header("authorization", "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_correct_bearer_token_is_accepted() {
    let app = test_app_with_auth("sekrit");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/operations")
                .header("authorization", "Bearer sekrit")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_probes_bypass_auth() {
    let app = test_app_with_auth("sekrit");
    let response = app.oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ─── OpenAPI ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let app = test_app();
    let response = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["paths"]["/v1/operations"].is_object());
}
