//! Dashboard metrics repository for database operations.

use domain::models::dashboard::{
    AuditMetrics, DashboardMetrics, DocumentMetrics, NonConformityMetrics, RiskMetrics,
    SeverityBreakdown,
};
use domain::models::risk::HIGH_RISK_SCORE;
use sqlx::Row;

use crate::metrics::QueryTimer;
use crate::scope::TenantScope;

/// Repository for the tenant's dashboard aggregates.
#[derive(Clone)]
pub struct DashboardRepository {
    scope: TenantScope,
}

impl DashboardRepository {
    pub(crate) fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    /// Get complete dashboard metrics for the tenant.
    pub async fn get_metrics(&self) -> Result<DashboardMetrics, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_metrics");
        let (audits, non_conformities, documents, risks, kpis) = tokio::try_join!(
            self.get_audit_metrics(),
            self.get_non_conformity_metrics(),
            self.get_document_metrics(),
            self.get_risk_metrics(),
            self.get_kpi_count(),
        )?;
        timer.record();

        Ok(DashboardMetrics {
            audits,
            non_conformities,
            documents,
            risks,
            kpis,
        })
    }

    async fn get_audit_metrics(&self) -> Result<AuditMetrics, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE status = 'scheduled') as scheduled,
                COUNT(*) FILTER (WHERE status = 'in_progress') as in_progress,
                COUNT(*) FILTER (WHERE status = 'paused') as paused,
                COUNT(*) FILTER (WHERE status = 'completed') as completed,
                COUNT(*) FILTER (WHERE status = 'cancelled') as cancelled
            FROM audits
            WHERE tenant_id = $1
            "#,
        )
        .bind(self.scope.tenant_id())
        .fetch_one(self.scope.pool())
        .await?;

        Ok(AuditMetrics {
            total: row.get::<i64, _>("total"),
            scheduled: row.get::<i64, _>("scheduled"),
            in_progress: row.get::<i64, _>("in_progress"),
            paused: row.get::<i64, _>("paused"),
            completed: row.get::<i64, _>("completed"),
            cancelled: row.get::<i64, _>("cancelled"),
        })
    }

    async fn get_non_conformity_metrics(&self) -> Result<NonConformityMetrics, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE status <> 'closed') as open,
                COUNT(*) FILTER (WHERE severity = 'low') as low,
                COUNT(*) FILTER (WHERE severity = 'medium') as medium,
                COUNT(*) FILTER (WHERE severity = 'high') as high,
                COUNT(*) FILTER (WHERE severity = 'critical') as critical
            FROM non_conformities
            WHERE tenant_id = $1
            "#,
        )
        .bind(self.scope.tenant_id())
        .fetch_one(self.scope.pool())
        .await?;

        Ok(NonConformityMetrics {
            total: row.get::<i64, _>("total"),
            open: row.get::<i64, _>("open"),
            by_severity: SeverityBreakdown {
                low: row.get::<i64, _>("low"),
                medium: row.get::<i64, _>("medium"),
                high: row.get::<i64, _>("high"),
                critical: row.get::<i64, _>("critical"),
            },
        })
    }

    async fn get_document_metrics(&self) -> Result<DocumentMetrics, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE status = 'draft') as draft,
                COUNT(*) FILTER (WHERE status = 'under_review') as under_review,
                COUNT(*) FILTER (WHERE status = 'approved') as approved,
                COUNT(*) FILTER (WHERE status = 'obsolete') as obsolete,
                COUNT(*) FILTER (
                    WHERE status <> 'obsolete' AND next_review_date < CURRENT_DATE
                ) as overdue_reviews
            FROM documents
            WHERE tenant_id = $1
            "#,
        )
        .bind(self.scope.tenant_id())
        .fetch_one(self.scope.pool())
        .await?;

        Ok(DocumentMetrics {
            total: row.get::<i64, _>("total"),
            draft: row.get::<i64, _>("draft"),
            under_review: row.get::<i64, _>("under_review"),
            approved: row.get::<i64, _>("approved"),
            obsolete: row.get::<i64, _>("obsolete"),
            overdue_reviews: row.get::<i64, _>("overdue_reviews"),
        })
    }

    async fn get_risk_metrics(&self) -> Result<RiskMetrics, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE probability * impact >= $2) as high_or_critical
            FROM risks
            WHERE tenant_id = $1
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(HIGH_RISK_SCORE)
        .fetch_one(self.scope.pool())
        .await?;

        Ok(RiskMetrics {
            total: row.get::<i64, _>("total"),
            high_or_critical: row.get::<i64, _>("high_or_critical"),
        })
    }

    async fn get_kpi_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM kpis WHERE tenant_id = $1")
            .bind(self.scope.tenant_id())
            .fetch_one(self.scope.pool())
            .await
    }
}
