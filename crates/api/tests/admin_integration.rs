//! Integration tests for platform administration.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use the default.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    cleanup_tenant, cleanup_user, create_super_admin, delete, get, put, register_tenant, request,
    send, setup, TEST_PASSWORD,
};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_tenant_admin_cannot_use_admin_routes() {
    let (app, pool) = setup().await;
    let tenant = register_tenant(&app).await;

    let (status, _) = get(&app, "/api/v1/admin/tenants", &tenant.access_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get(&app, "/api/v1/admin/config", &tenant.access_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = delete(
        &app,
        &format!("/api/v1/admin/tenants/{}", tenant.tenant_id),
        &tenant.access_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    cleanup_tenant(&pool, &tenant).await;
}

#[tokio::test]
async fn test_super_admin_lists_and_searches_tenants() {
    let (app, pool) = setup().await;
    let admin = create_super_admin(&app, &pool).await;
    let tenant = register_tenant(&app).await;

    let (status, body) = get(
        &app,
        &format!("/api/v1/admin/tenants?search={}", tenant.subdomain),
        &admin.access_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["id"], tenant.tenant_id.as_str());

    let (_, body) = get(&app, "/api/v1/admin/tenants?limit=1", &admin.access_token).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert!(body["pagination"]["total"].as_i64().unwrap() >= 2);

    cleanup_tenant(&pool, &tenant).await;
    cleanup_user(&pool, &admin).await;
}

#[tokio::test]
async fn test_suspending_tenant_blocks_login() {
    let (app, pool) = setup().await;
    let admin = create_super_admin(&app, &pool).await;
    let tenant = register_tenant(&app).await;
    let status_uri = format!("/api/v1/admin/tenants/{}/status", tenant.tenant_id);

    let (status, body) = put(&app, &status_uri, &admin.access_token, json!({ "status": "suspended" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "suspended");

    let login = json!({ "email": tenant.admin_email, "password": TEST_PASSWORD });
    let (status, _) = send(
        &app,
        request(Method::POST, "/api/v1/auth/login", None, Some(login.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({ "refreshToken": tenant.refresh_token })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    put(&app, &status_uri, &admin.access_token, json!({ "status": "active" })).await;
    let (status, _) = send(
        &app,
        request(Method::POST, "/api/v1/auth/login", None, Some(login)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    cleanup_tenant(&pool, &tenant).await;
    cleanup_user(&pool, &admin).await;
}

#[tokio::test]
async fn test_delete_tenant_cascades() {
    let (app, pool) = setup().await;
    let admin = create_super_admin(&app, &pool).await;
    let tenant = register_tenant(&app).await;
    common::create_audit(
        &app,
        &tenant.access_token,
        json!({ "title": "Doomed audit", "auditType": "internal" }),
    )
    .await;

    let (status, _) = delete(
        &app,
        &format!("/api/v1/admin/tenants/{}", tenant.tenant_id),
        &admin.access_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let tenant_id = Uuid::parse_str(&tenant.tenant_id).unwrap();
    let audits: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audits WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(audits, 0);
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 0);

    let (status, _) = delete(
        &app,
        &format!("/api/v1/admin/tenants/{}", tenant.tenant_id),
        &admin.access_token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup_user(&pool, &admin).await;
}

#[tokio::test]
async fn test_system_tenant_cannot_be_deleted() {
    let (app, pool) = setup().await;
    let admin = create_super_admin(&app, &pool).await;

    let system_id: Uuid = sqlx::query_scalar("SELECT id FROM tenants WHERE subdomain = 'system'")
        .fetch_one(&pool)
        .await
        .unwrap();

    let (status, body) = delete(
        &app,
        &format!("/api/v1/admin/tenants/{}", system_id),
        &admin.access_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "The system tenant cannot be deleted");

    cleanup_user(&pool, &admin).await;
}

#[tokio::test]
async fn test_system_tenant_status_cannot_be_changed() {
    let (app, pool) = setup().await;
    let admin = create_super_admin(&app, &pool).await;

    let system_id: Uuid = sqlx::query_scalar("SELECT id FROM tenants WHERE subdomain = 'system'")
        .fetch_one(&pool)
        .await
        .unwrap();

    let (status, body) = put(
        &app,
        &format!("/api/v1/admin/tenants/{}/status", system_id),
        &admin.access_token,
        json!({ "status": "suspended" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "The system tenant status cannot be changed");

    let stored: String =
        sqlx::query_scalar("SELECT status::text FROM tenants WHERE id = $1")
            .bind(system_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_ne!(stored, "suspended");

    // Super admins can still sign in.
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": admin.email, "password": TEST_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    cleanup_user(&pool, &admin).await;
}

#[tokio::test]
async fn test_system_config_masks_secrets() {
    let (app, pool) = setup().await;
    let admin = create_super_admin(&app, &pool).await;
    let suffix = Uuid::new_v4().simple().to_string();
    let secret_key = format!("smtp.password.{}", suffix);
    let plain_key = format!("smtp.host.{}", suffix);

    let (status, body) = put(
        &app,
        &format!("/api/v1/admin/config/{}", secret_key),
        &admin.access_token,
        json!({ "value": "hunter2", "description": "SMTP password", "isSecret": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], "********");
    assert_eq!(body["data"]["isSecret"], true);

    put(
        &app,
        &format!("/api/v1/admin/config/{}", plain_key),
        &admin.access_token,
        json!({ "value": "mail.example.com" }),
    )
    .await;

    let (status, body) = get(&app, "/api/v1/admin/config", &admin.access_token).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    let find = |key: &str| {
        entries
            .iter()
            .find(|e| e["key"] == key)
            .cloned()
            .unwrap()
    };
    assert_eq!(find(&secret_key)["value"], "********");
    assert_eq!(find(&plain_key)["value"], "mail.example.com");

    let stored: String = sqlx::query_scalar("SELECT value FROM system_config WHERE key = $1")
        .bind(&secret_key)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, "hunter2");

    for key in [&secret_key, &plain_key] {
        let (status, _) = delete(
            &app,
            &format!("/api/v1/admin/config/{}", key),
            &admin.access_token,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = delete(
        &app,
        &format!("/api/v1/admin/config/{}", plain_key),
        &admin.access_token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup_user(&pool, &admin).await;
}

#[tokio::test]
async fn test_invalid_config_key_is_rejected() {
    let (app, pool) = setup().await;
    let admin = create_super_admin(&app, &pool).await;

    let (status, _) = put(
        &app,
        "/api/v1/admin/config/bad%20key",
        &admin.access_token,
        json!({ "value": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    cleanup_user(&pool, &admin).await;
}
