//! Eviction of idle rate limiter buckets.

use std::sync::Arc;
use tracing::debug;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::RateLimiterState;

/// Drops per-caller buckets that have refilled so the keyed store stays bounded.
pub struct RateLimitPruneJob {
    limiter: Arc<RateLimiterState>,
}

impl RateLimitPruneJob {
    pub fn new(limiter: Arc<RateLimiterState>) -> Self {
        Self { limiter }
    }
}

#[async_trait::async_trait]
impl Job for RateLimitPruneJob {
    fn name(&self) -> &'static str {
        "rate_limit_prune"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(5)
    }

    async fn execute(&self) -> Result<(), String> {
        let pruned = self.limiter.prune();
        metrics::gauge!("rate_limit_tracked_callers").set(self.limiter.tracked_callers() as f64);
        debug!(
            pruned,
            remaining = self.limiter.tracked_callers(),
            "Rate limiter buckets pruned"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_execute_keeps_active_callers() {
        tokio_test::block_on(async {
            let limiter = Arc::new(RateLimiterState::new(1));
            limiter.check(Uuid::new_v4(), Uuid::new_v4()).unwrap();
            let job = RateLimitPruneJob::new(limiter.clone());

            assert_eq!(job.frequency(), JobFrequency::Minutes(5));
            tokio_test::assert_ok!(job.execute().await);
            assert_eq!(limiter.tracked_callers(), 1);
        });
    }
}
