use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

use audit_manager_api::{
    app::{router, AppState},
    config::Config,
    jobs::{DocumentReviewReminderJob, JobScheduler, PoolMetricsJob, RateLimitPruneJob},
    middleware,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics().context("Failed to install metrics recorder")?;

    info!("Starting ISO Audit Manager API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let addr = config.socket_addr().context("Invalid server address")?;
    let reminders = config.reminders.clone();
    let state = AppState::new(config, pool.clone()).context("Invalid JWT key configuration")?;

    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    if let Some(limiter) = state.rate_limiter.clone() {
        scheduler.register(RateLimitPruneJob::new(limiter));
    }
    if reminders.enabled {
        scheduler.register(DocumentReviewReminderJob::new(
            pool.clone(),
            reminders.lookahead_days,
        ));
    }
    scheduler.start();

    let app = router(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
