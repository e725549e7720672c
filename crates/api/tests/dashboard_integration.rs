//! Integration tests for dashboard metrics and the review reminder job.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use the default.

mod common;

use audit_manager_api::jobs::{DocumentReviewReminderJob, Job};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    cleanup_tenant, create_audit, create_document, create_member, get, patch, post, put,
    register_tenant, setup,
};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_dashboard_of_new_tenant_is_empty() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;

    let (status, body) = get(&app, "/api/v1/dashboard", &tenant.access_token).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["audits"]["total"], 0);
    assert_eq!(data["nonConformities"]["total"], 0);
    assert_eq!(data["documents"]["total"], 0);
    assert_eq!(data["risks"]["total"], 0);
    assert_eq!(data["kpis"], 0);

    cleanup_tenant(&pool, &tenant).await;
}

#[tokio::test]
async fn test_dashboard_counts_tenant_data() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;
    let other = register_tenant(&app).await;
    let reader = create_member(&app, &tenant, "user").await;
    let token = &tenant.access_token;

    let in_progress = create_audit(&app, token, json!({ "title": "Running", "auditType": "internal" })).await;
    post(
        &app,
        &format!("/api/v1/audits/{}/status", in_progress),
        token,
        json!({ "status": "in_progress" }),
    )
    .await;
    create_audit(&app, token, json!({ "title": "Planned", "auditType": "external" })).await;

    for severity in ["low", "critical", "critical"] {
        post(
            &app,
            "/api/v1/ncs",
            token,
            json!({ "title": "Finding", "source": "audit", "severity": severity }),
        )
        .await;
    }
    let (_, body) = get(&app, "/api/v1/ncs?severity=low", token).await;
    let low_id = body["data"][0]["id"].as_str().unwrap().to_string();
    put(&app, &format!("/api/v1/ncs/{}", low_id), token, json!({ "status": "closed" })).await;

    let overdue = create_document(&app, token, "Overdue procedure").await;
    put(
        &app,
        &format!("/api/v1/documents/{}", overdue),
        token,
        json!({ "nextReviewDate": (Utc::now().date_naive() - Duration::days(3)).to_string() }),
    )
    .await;
    let submitted = create_document(&app, token, "Submitted manual").await;
    post(
        &app,
        &format!("/api/v1/documents/{}/status", submitted),
        token,
        json!({ "status": "under_review" }),
    )
    .await;

    post(&app, "/api/v1/risks", token, json!({ "description": "Fire", "probability": 2, "impact": 5 })).await;
    post(&app, "/api/v1/risks", token, json!({ "description": "Typo", "probability": 1, "impact": 1 })).await;
    post(
        &app,
        "/api/v1/kpis",
        token,
        json!({ "name": "Yield", "direction": "higher_is_better", "frequency": "monthly" }),
    )
    .await;

    // Data of another tenant must not leak into the counts.
    create_audit(&app, &other.access_token, json!({ "title": "Elsewhere", "auditType": "internal" })).await;

    let (status, body) = get(&app, "/api/v1/dashboard", &reader.access_token).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];

    assert_eq!(data["audits"]["total"], 2);
    assert_eq!(data["audits"]["inProgress"], 1);
    assert_eq!(data["audits"]["scheduled"], 1);

    assert_eq!(data["nonConformities"]["total"], 3);
    assert_eq!(data["nonConformities"]["open"], 2);
    assert_eq!(data["nonConformities"]["bySeverity"]["critical"], 2);
    assert_eq!(data["nonConformities"]["bySeverity"]["low"], 1);

    assert_eq!(data["documents"]["total"], 2);
    assert_eq!(data["documents"]["draft"], 1);
    assert_eq!(data["documents"]["underReview"], 1);
    assert_eq!(data["documents"]["overdueReviews"], 1);

    assert_eq!(data["risks"]["total"], 2);
    assert_eq!(data["risks"]["highOrCritical"], 1);
    assert_eq!(data["kpis"], 1);

    cleanup_tenant(&pool, &tenant).await;
    cleanup_tenant(&pool, &other).await;
}

#[tokio::test]
async fn test_review_reminders_are_recorded_once() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;
    let token = &tenant.access_token;

    let overdue = create_document(&app, token, "Late review").await;
    put(
        &app,
        &format!("/api/v1/documents/{}", overdue),
        token,
        json!({ "nextReviewDate": (Utc::now().date_naive() - Duration::days(1)).to_string() }),
    )
    .await;
    let upcoming = create_document(&app, token, "Soon review").await;
    put(
        &app,
        &format!("/api/v1/documents/{}", upcoming),
        token,
        json!({ "nextReviewDate": (Utc::now().date_naive() + Duration::days(5)).to_string() }),
    )
    .await;
    // Twelve months out, beyond the lookahead.
    let later = create_document(&app, token, "Far review").await;

    let job = DocumentReviewReminderJob::new(pool.clone(), 14);
    job.execute().await.unwrap();
    job.execute().await.unwrap();

    let windows = |document_id: String| {
        let pool = pool.clone();
        async move {
            sqlx::query_scalar::<_, String>(
                "SELECT reminder_window FROM document_review_reminders WHERE document_id = $1",
            )
            .bind(Uuid::parse_str(&document_id).unwrap())
            .fetch_all(&pool)
            .await
            .unwrap()
        }
    };

    assert_eq!(windows(overdue).await, vec!["overdue".to_string()]);
    assert_eq!(windows(upcoming).await, vec!["upcoming".to_string()]);
    assert!(windows(later).await.is_empty());

    cleanup_tenant(&pool, &tenant).await;
}

#[tokio::test]
async fn test_non_compliant_verdict_does_not_create_nc() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;
    let token = &tenant.access_token;

    let audit_id = create_audit(
        &app,
        token,
        json!({
            "title": "Verdicts",
            "auditType": "internal",
            "isoStandard": "ISO 9001",
            "populateFromStandard": true
        }),
    )
    .await;
    let (_, body) = get(&app, &format!("/api/v1/audits/{}/checklists", audit_id), token).await;
    let item = body["data"][0].clone();

    let (status, _) = patch(
        &app,
        &format!("/api/v1/audits/{}/checklists/{}", audit_id, item["id"].as_str().unwrap()),
        token,
        json!({ "status": "non_compliant" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/api/v1/dashboard", token).await;
    assert_eq!(body["data"]["nonConformities"]["total"], 0);

    let (status, _) = post(
        &app,
        "/api/v1/ncs",
        token,
        json!({
            "title": item["question"],
            "description": item["section"],
            "source": "audit",
            "severity": "medium",
            "auditId": audit_id
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = get(&app, "/api/v1/dashboard", token).await;
    assert_eq!(body["data"]["nonConformities"]["total"], 1);
    assert_eq!(body["data"]["nonConformities"]["open"], 1);

    cleanup_tenant(&pool, &tenant).await;
}
