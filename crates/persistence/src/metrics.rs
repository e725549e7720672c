//! Database metrics: query latency histograms and pool gauges.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Snapshot of the connection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max: u32,
}

impl PoolStats {
    pub fn of(pool: &PgPool) -> Self {
        Self {
            size: pool.size(),
            idle: u32::try_from(pool.num_idle()).unwrap_or(u32::MAX),
            max: pool.options().get_max_connections(),
        }
    }

    pub fn active(&self) -> u32 {
        self.size.saturating_sub(self.idle)
    }

    /// Every allowed connection is open and checked out.
    pub fn saturated(&self) -> bool {
        self.max > 0 && self.size >= self.max && self.idle == 0
    }

    pub fn record(&self) {
        gauge!("db_pool_connections", "state" => "active").set(f64::from(self.active()));
        gauge!("db_pool_connections", "state" => "idle").set(f64::from(self.idle));
        gauge!("db_pool_connections_max").set(f64::from(self.max));
    }
}

/// Times one repository operation and records it under its name.
///
/// ```ignore
/// let timer = QueryTimer::new("find_audit");
/// let row = sqlx::query_as::<_, AuditEntity>(...).fetch_optional(pool).await?;
/// timer.record();
/// ```
///
/// Operations that fail before `record` is called are not recorded.
pub struct QueryTimer {
    operation: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        histogram!("db_query_duration_seconds", "operation" => self.operation)
            .record(self.start.elapsed().as_secs_f64());
    }
}
