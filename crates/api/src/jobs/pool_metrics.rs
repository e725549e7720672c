//! Periodic connection pool gauges.

use persistence::metrics::PoolStats;
use sqlx::PgPool;
use tracing::warn;

use super::scheduler::{Job, JobFrequency};

/// Publishes pool gauges and warns while the pool is exhausted.
pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(15)
    }

    async fn execute(&self) -> Result<(), String> {
        let stats = PoolStats::of(&self.pool);
        stats.record();
        if stats.saturated() {
            warn!(
                size = stats.size,
                max = stats.max,
                "Database pool exhausted; requests are waiting for connections"
            );
        }
        Ok(())
    }
}
