//! Integration tests for tenant isolation and tenant settings.
//!
//! Every resource created by one tenant must be invisible to another, even
//! when the other tenant knows its ID.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use the default.

mod common;

use axum::http::StatusCode;
use common::{
    cleanup_tenant, create_audit, create_document, create_member, delete, get, patch, post, put,
    register_tenant, setup,
};
use serde_json::json;

#[tokio::test]
async fn test_audits_are_invisible_across_tenants() {
    let (app, pool) = setup().await;
    let owner = register_tenant(&app).await;
    let intruder = register_tenant(&app).await;

    let audit_id = create_audit(
        &app,
        &owner.access_token,
        json!({
            "title": "Confidential audit",
            "auditType": "internal",
            "isoStandard": "ISO 9001",
            "populateFromStandard": true
        }),
    )
    .await;
    let uri = format!("/api/v1/audits/{}", audit_id);

    let (status, _) = get(&app, &uri, &intruder.access_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = put(&app, &uri, &intruder.access_token, json!({ "title": "Hijacked" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(
        &app,
        &format!("{}/status", uri),
        &intruder.access_token,
        json!({ "status": "in_progress" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, &format!("{}/checklists", uri), &intruder.access_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&app, &format!("{}/checklists", uri), &owner.access_token).await;
    let item_id = body["data"][0]["id"].as_str().unwrap();
    let (status, _) = patch(
        &app,
        &format!("{}/checklists/{}", uri, item_id),
        &intruder.access_token,
        json!({ "status": "compliant" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete(&app, &uri, &intruder.access_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&app, "/api/v1/audits", &intruder.access_token).await;
    assert_eq!(body["pagination"]["total"], 0);

    let (status, body) = get(&app, &uri, &owner.access_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Confidential audit");

    cleanup_tenant(&pool, &owner).await;
    cleanup_tenant(&pool, &intruder).await;
}

#[tokio::test]
async fn test_foreign_audit_cannot_anchor_nc() {
    let (app, pool) = setup().await;
    let owner = register_tenant(&app).await;
    let intruder = register_tenant(&app).await;

    let audit_id = create_audit(
        &app,
        &owner.access_token,
        json!({ "title": "Owner audit", "auditType": "internal" }),
    )
    .await;

    let (status, _) = post(
        &app,
        "/api/v1/ncs",
        &intruder.access_token,
        json!({ "title": "Cross link", "source": "audit", "severity": "low", "auditId": audit_id }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    cleanup_tenant(&pool, &owner).await;
    cleanup_tenant(&pool, &intruder).await;
}

#[tokio::test]
async fn test_documents_are_invisible_across_tenants() {
    let (app, pool) = setup().await;
    let owner = register_tenant(&app).await;
    let intruder = register_tenant(&app).await;

    let document_id = create_document(&app, &owner.access_token, "Secret recipe").await;
    let uri = format!("/api/v1/documents/{}", document_id);

    for path in ["", "/versions", "/comments", "/permissions"] {
        let (status, _) = get(&app, &format!("{}{}", uri, path), &intruder.access_token).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {}{}", uri, path);
    }

    let (status, _) = post(
        &app,
        &format!("{}/comments", uri),
        &intruder.access_token,
        json!({ "content": "Hello from outside" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = put(
        &app,
        &format!("{}/permissions", uri),
        &intruder.access_token,
        json!({ "userId": intruder.admin_id, "permission": "approve" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete(&app, &uri, &intruder.access_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup_tenant(&pool, &owner).await;
    cleanup_tenant(&pool, &intruder).await;
}

#[tokio::test]
async fn test_kpis_risks_and_users_are_isolated() {
    let (app, pool) = setup().await;
    let owner = register_tenant(&app).await;
    let intruder = register_tenant(&app).await;
    let member = create_member(&app, &owner, "auditor").await;

    let (_, body) = post(
        &app,
        "/api/v1/kpis",
        &owner.access_token,
        json!({ "name": "Yield", "direction": "higher_is_better", "frequency": "monthly" }),
    )
    .await;
    let kpi_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = post(
        &app,
        "/api/v1/risks",
        &owner.access_token,
        json!({ "description": "Flood", "probability": 2, "impact": 5 }),
    )
    .await;
    let risk_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = get(&app, &format!("/api/v1/kpis/{}", kpi_id), &intruder.access_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = post(
        &app,
        &format!("/api/v1/kpis/{}/measurements", kpi_id),
        &intruder.access_token,
        json!({ "date": "2026-01-01", "value": 1.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, &format!("/api/v1/risks/{}", risk_id), &intruder.access_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete(&app, &format!("/api/v1/risks/{}", risk_id), &intruder.access_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(
        &app,
        &format!("/api/v1/users/{}", member.user_id),
        &intruder.access_token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = put(
        &app,
        &format!("/api/v1/users/{}", member.user_id),
        &intruder.access_token,
        json!({ "isActive": false }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&app, "/api/v1/users", &intruder.access_token).await;
    assert_eq!(body["pagination"]["total"], 1);

    cleanup_tenant(&pool, &owner).await;
    cleanup_tenant(&pool, &intruder).await;
}

#[tokio::test]
async fn test_tenant_settings() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;
    let auditor = create_member(&app, &tenant, "auditor").await;

    let (status, body) = get(&app, "/api/v1/tenant", &auditor.access_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], tenant.tenant_id.as_str());
    assert_eq!(body["data"]["plan"], "free");

    let (status, _) = put(&app, "/api/v1/tenant", &auditor.access_token, json!({ "name": "Renamed" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = put(
        &app,
        "/api/v1/tenant",
        &tenant.access_token,
        json!({ "name": "  Acme Quality Ltd  ", "plan": "professional" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Acme Quality Ltd");
    assert_eq!(body["data"]["plan"], "professional");
    assert_eq!(body["data"]["subdomain"], tenant.subdomain.as_str());

    cleanup_tenant(&pool, &tenant).await;
}
