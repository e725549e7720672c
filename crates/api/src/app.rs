use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    admin, audits, auth, dashboard, documents, health, kpis, non_conformities, risks, tenant,
    users,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    /// Parses the signing keys once; fails on malformed PEM.
    pub fn new(config: Config, pool: PgPool) -> Result<Self, JwtError> {
        let jwt = JwtConfig::new(
            &config.jwt.private_key,
            &config.jwt.public_key,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;

        let rate_limiter = (config.security.rate_limit_per_minute > 0).then(|| {
            Arc::new(RateLimiterState::new(config.security.rate_limit_per_minute))
        });

        Ok(Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            rate_limiter,
        })
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    Ok(router(AppState::new(config, pool)?))
}

/// Builds the router around an existing state.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Middleware order: auth runs first, then rate limiting (keyed by the caller)
    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        // Audits
        .route("/api/v1/audits", get(audits::list_audits).post(audits::create_audit))
        .route("/api/v1/audits/standards", get(audits::list_standards))
        .route(
            "/api/v1/audits/:audit_id",
            get(audits::get_audit)
                .put(audits::update_audit)
                .delete(audits::delete_audit),
        )
        .route("/api/v1/audits/:audit_id/status", post(audits::change_status))
        .route("/api/v1/audits/:audit_id/checklists", get(audits::list_checklist))
        .route(
            "/api/v1/audits/:audit_id/checklists/:item_id",
            patch(audits::update_checklist_item),
        )
        .route(
            "/api/v1/audits/:audit_id/checklists/:item_id/evidence",
            post(audits::add_evidence),
        )
        // Non-conformities
        .route(
            "/api/v1/ncs",
            get(non_conformities::list_non_conformities)
                .post(non_conformities::create_non_conformity),
        )
        .route(
            "/api/v1/ncs/:nc_id",
            get(non_conformities::get_non_conformity)
                .put(non_conformities::update_non_conformity)
                .delete(non_conformities::delete_non_conformity),
        )
        .route(
            "/api/v1/ncs/:nc_id/actions",
            post(non_conformities::add_corrective_action),
        )
        // Documents
        .route(
            "/api/v1/documents",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/api/v1/documents/:document_id",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
        .route(
            "/api/v1/documents/:document_id/status",
            post(documents::change_status),
        )
        .route(
            "/api/v1/documents/:document_id/versions",
            get(documents::list_versions).post(documents::add_version),
        )
        .route(
            "/api/v1/documents/:document_id/permissions",
            get(documents::list_permissions).put(documents::grant_permission),
        )
        .route(
            "/api/v1/documents/:document_id/permissions/:user_id",
            delete(documents::revoke_permission),
        )
        .route(
            "/api/v1/documents/:document_id/comments",
            get(documents::list_comments).post(documents::add_comment),
        )
        .route(
            "/api/v1/documents/:document_id/comments/:comment_id",
            delete(documents::delete_comment),
        )
        // KPIs
        .route("/api/v1/kpis", get(kpis::list_kpis).post(kpis::create_kpi))
        .route(
            "/api/v1/kpis/:kpi_id",
            get(kpis::get_kpi).put(kpis::update_kpi).delete(kpis::delete_kpi),
        )
        .route(
            "/api/v1/kpis/:kpi_id/measurements",
            post(kpis::add_measurement),
        )
        // Risks
        .route("/api/v1/risks", get(risks::list_risks).post(risks::create_risk))
        .route(
            "/api/v1/risks/:risk_id",
            get(risks::get_risk)
                .put(risks::update_risk)
                .delete(risks::delete_risk),
        )
        // Users
        .route("/api/v1/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/v1/users/:user_id",
            get(users::get_user).put(users::update_user),
        )
        // Tenant
        .route(
            "/api/v1/tenant",
            get(tenant::get_tenant).put(tenant::update_tenant),
        )
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        // Platform administration
        .route("/api/v1/admin/tenants", get(admin::list_tenants))
        .route("/api/v1/admin/tenants/:tenant_id", delete(admin::delete_tenant))
        .route(
            "/api/v1/admin/tenants/:tenant_id/status",
            put(admin::update_tenant_status),
        )
        .route("/api/v1/admin/config", get(admin::list_config))
        .route(
            "/api/v1/admin/config/:key",
            put(admin::upsert_config).delete(admin::delete_config),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
