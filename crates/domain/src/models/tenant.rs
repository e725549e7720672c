//! Tenant (organization) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Subdomain of the platform operator's own tenant. It hosts super admins
/// and can never be deleted.
pub const SYSTEM_SUBDOMAIN: &str = "system";

/// Length of the trial granted at self-service registration.
pub const TRIAL_DAYS: i64 = 14;

/// Subscription plan tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantPlan {
    Free,
    Basic,
    Professional,
    Enterprise,
}

impl TenantPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantPlan::Free => "free",
            TenantPlan::Basic => "basic",
            TenantPlan::Professional => "professional",
            TenantPlan::Enterprise => "enterprise",
        }
    }
}

impl FromStr for TenantPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(TenantPlan::Free),
            "basic" => Ok(TenantPlan::Basic),
            "professional" => Ok(TenantPlan::Professional),
            "enterprise" => Ok(TenantPlan::Enterprise),
            _ => Err(format!("Unknown plan: {}", s)),
        }
    }
}

impl std::fmt::Display for TenantPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenant lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Trial,
    Active,
    Suspended,
    Cancelled,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Trial => "trial",
            TenantStatus::Active => "active",
            TenantStatus::Suspended => "suspended",
            TenantStatus::Cancelled => "cancelled",
        }
    }

    /// Whether users of the tenant may sign in.
    pub fn allows_login(&self) -> bool {
        matches!(self, TenantStatus::Trial | TenantStatus::Active)
    }
}

impl std::fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenant domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub subdomain: String,
    pub plan: TenantPlan,
    pub status: TenantStatus,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub subscription_ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    pub fn is_system(&self) -> bool {
        self.subdomain == SYSTEM_SUBDOMAIN
    }
}

/// Data needed to create a tenant.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub subdomain: String,
    pub plan: TenantPlan,
    pub status: TenantStatus,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

/// Request to update the caller's own tenant.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be 2-255 characters"))]
    pub name: Option<String>,
    pub plan: Option<TenantPlan>,
}

/// Request to change a tenant's status (platform admins).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantStatusRequest {
    pub status: TenantStatus,
}

/// Query parameters for listing tenants.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListTenantsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<TenantStatus>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(subdomain: &str) -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            name: "Acme".into(),
            subdomain: subdomain.into(),
            plan: TenantPlan::Free,
            status: TenantStatus::Trial,
            trial_ends_at: None,
            subscription_ends_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_system_tenant_detection() {
        assert!(tenant("system").is_system());
        assert!(!tenant("acme").is_system());
    }

    #[test]
    fn test_plan_round_trips_through_strings() {
        assert_eq!(TenantPlan::from_str("Professional").unwrap(), TenantPlan::Professional);
        assert_eq!(TenantPlan::Enterprise.to_string(), "enterprise");
        assert!(TenantPlan::from_str("gold").is_err());
    }

    #[test]
    fn test_status_login_gate() {
        assert!(TenantStatus::Trial.allows_login());
        assert!(TenantStatus::Active.allows_login());
        assert!(!TenantStatus::Suspended.allows_login());
        assert!(!TenantStatus::Cancelled.allows_login());
    }

    #[test]
    fn test_tenant_serializes_camel_case() {
        let json = serde_json::to_value(tenant("acme")).unwrap();
        assert_eq!(json["subdomain"], "acme");
        assert_eq!(json["plan"], "free");
        assert!(json.get("trialEndsAt").is_some());
    }
}
