//! Integration tests for documents: lifecycle, versions, permissions and comments.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use the default.

mod common;

use axum::http::StatusCode;
use common::{
    cleanup_tenant, create_document, create_member, delete, get, post, put, register_tenant,
    setup,
};
use serde_json::json;

#[tokio::test]
async fn test_create_document_starts_in_draft_with_review_date() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;

    let document_id = create_document(&app, &tenant.access_token, "Quality Manual").await;

    let (status, body) = get(
        &app,
        &format!("/api/v1/documents/{}", document_id),
        &tenant.access_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "draft");
    assert_eq!(body["data"]["currentVersion"], "1.0");
    assert_eq!(body["data"]["confidentiality"], "internal");
    assert_eq!(body["data"]["uploadedBy"], tenant.admin_id.as_str());

    let expected = chrono::Utc::now()
        .date_naive()
        .checked_add_months(chrono::Months::new(12))
        .unwrap()
        .to_string();
    assert_eq!(body["data"]["nextReviewDate"], expected.as_str());

    let (_, body) = get(
        &app,
        &format!("/api/v1/documents/{}/versions", document_id),
        &tenant.access_token,
    )
    .await;
    let versions = body["data"].as_array().unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0]["version"], "1.0");

    cleanup_tenant(&pool, &tenant).await;
}

#[tokio::test]
async fn test_document_approval_flow() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;
    let author = create_member(&app, &tenant, "consultant").await;

    let document_id = create_document(&app, &author.access_token, "Procedure P-01").await;
    let status_uri = format!("/api/v1/documents/{}/status", document_id);

    let (status, body) = post(
        &app,
        &status_uri,
        &author.access_token,
        json!({ "status": "under_review" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "under_review");

    // Write access is not enough to approve.
    let (status, _) = post(&app, &status_uri, &author.access_token, json!({ "status": "approved" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = post(&app, &status_uri, &tenant.access_token, json!({ "status": "approved" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["approvedBy"], tenant.admin_id.as_str());
    assert!(!body["data"]["approvedAt"].is_null());

    let (status, _) = post(&app, &status_uri, &tenant.access_token, json!({ "status": "draft" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = post(&app, &status_uri, &author.access_token, json!({ "status": "obsolete" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "obsolete");

    let (status, _) = post(&app, &status_uri, &tenant.access_token, json!({ "status": "draft" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    cleanup_tenant(&pool, &tenant).await;
}

#[tokio::test]
async fn test_add_version_becomes_current() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;
    let document_id = create_document(&app, &tenant.access_token, "Work instruction").await;

    let (status, body) = post(
        &app,
        &format!("/api/v1/documents/{}/versions", document_id),
        &tenant.access_token,
        json!({ "version": "1.1", "changes": "Clarified step 4", "storageKey": "docs/wi-1.1.pdf" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["version"], "1.1");
    assert_eq!(body["data"]["createdBy"], tenant.admin_id.as_str());

    let (_, body) = get(
        &app,
        &format!("/api/v1/documents/{}", document_id),
        &tenant.access_token,
    )
    .await;
    assert_eq!(body["data"]["currentVersion"], "1.1");

    let (_, body) = get(
        &app,
        &format!("/api/v1/documents/{}/versions", document_id),
        &tenant.access_token,
    )
    .await;
    let versions: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["version"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(versions, vec!["1.0", "1.1"]);

    cleanup_tenant(&pool, &tenant).await;
}

#[tokio::test]
async fn test_explicit_grant_overrides_role_default() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;
    let auditor = create_member(&app, &tenant, "auditor").await;
    let reader = create_member(&app, &tenant, "user").await;

    let document_id = create_document(&app, &tenant.access_token, "Restricted procedure").await;
    let doc_uri = format!("/api/v1/documents/{}", document_id);
    let permissions_uri = format!("{}/permissions", doc_uri);

    // Role default: auditors write, plain users only read.
    let (status, _) = put(&app, &doc_uri, &auditor.access_token, json!({ "area": "Production" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = put(&app, &doc_uri, &reader.access_token, json!({ "area": "Sales" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Downgrade the auditor, upgrade the reader.
    let (status, body) = put(
        &app,
        &permissions_uri,
        &tenant.access_token,
        json!({ "userId": auditor.user_id, "permission": "read" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["permission"], "read");
    put(
        &app,
        &permissions_uri,
        &tenant.access_token,
        json!({ "userId": reader.user_id, "permission": "write" }),
    )
    .await;

    let (status, _) = put(&app, &doc_uri, &auditor.access_token, json!({ "area": "Logistics" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = put(&app, &doc_uri, &reader.access_token, json!({ "area": "Sales" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["area"], "Sales");

    // Re-granting updates the existing row.
    put(
        &app,
        &permissions_uri,
        &tenant.access_token,
        json!({ "userId": reader.user_id, "permission": "approve" }),
    )
    .await;
    let (_, body) = get(&app, &permissions_uri, &tenant.access_token).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = delete(
        &app,
        &format!("{}/{}", permissions_uri, auditor.user_id),
        &tenant.access_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = put(&app, &doc_uri, &auditor.access_token, json!({ "area": "Logistics" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = delete(
        &app,
        &format!("{}/{}", permissions_uri, auditor.user_id),
        &tenant.access_token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup_tenant(&pool, &tenant).await;
}

#[tokio::test]
async fn test_only_admins_manage_permissions() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;
    let auditor = create_member(&app, &tenant, "auditor").await;
    let other = register_tenant(&app).await;

    let document_id = create_document(&app, &tenant.access_token, "Policy").await;
    let permissions_uri = format!("/api/v1/documents/{}/permissions", document_id);

    let (status, _) = put(
        &app,
        &permissions_uri,
        &auditor.access_token,
        json!({ "userId": auditor.user_id, "permission": "approve" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = put(
        &app,
        &permissions_uri,
        &tenant.access_token,
        json!({ "userId": other.admin_id, "permission": "read" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    cleanup_tenant(&pool, &tenant).await;
    cleanup_tenant(&pool, &other).await;
}

#[tokio::test]
async fn test_comments_and_single_level_replies() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;
    let reader = create_member(&app, &tenant, "user").await;

    let document_id = create_document(&app, &tenant.access_token, "Form F-12").await;
    let comments_uri = format!("/api/v1/documents/{}/comments", document_id);

    let (status, body) = post(
        &app,
        &comments_uri,
        &reader.access_token,
        json!({ "content": "Section 3 references an old form" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let top_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["userId"], reader.user_id.as_str());

    let (status, body) = post(
        &app,
        &comments_uri,
        &tenant.access_token,
        json!({ "content": "Fixed in 1.1", "parentId": top_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let reply_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["parentId"], top_id.as_str());

    // Replies cannot be nested.
    let (status, _) = post(
        &app,
        &comments_uri,
        &reader.access_token,
        json!({ "content": "Thanks", "parentId": reply_id }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(&app, &comments_uri, &reader.access_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // A reader cannot delete someone else's comment; the approver can.
    let (status, _) = delete(&app, &format!("{}/{}", comments_uri, reply_id), &reader.access_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = delete(&app, &format!("{}/{}", comments_uri, reply_id), &tenant.access_token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = delete(&app, &format!("{}/{}", comments_uri, top_id), &reader.access_token).await;
    assert_eq!(status, StatusCode::OK);

    cleanup_tenant(&pool, &tenant).await;
}

#[tokio::test]
async fn test_list_and_delete_documents() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;
    let reader = create_member(&app, &tenant, "user").await;

    let first = create_document(&app, &tenant.access_token, "Calibration procedure").await;
    create_document(&app, &tenant.access_token, "Supplier evaluation").await;

    let (status, body) = get(&app, "/api/v1/documents", &reader.access_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 2);

    let (_, body) = get(&app, "/api/v1/documents?search=calibration", &tenant.access_token).await;
    assert_eq!(body["pagination"]["total"], 1);

    let (_, body) = get(&app, "/api/v1/documents?status=approved", &tenant.access_token).await;
    assert_eq!(body["pagination"]["total"], 0);

    let (status, _) = delete(&app, &format!("/api/v1/documents/{}", first), &reader.access_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = delete(&app, &format!("/api/v1/documents/{}", first), &tenant.access_token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &format!("/api/v1/documents/{}", first), &tenant.access_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup_tenant(&pool, &tenant).await;
}
