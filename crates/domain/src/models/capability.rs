//! Role capability table.
//!
//! Every authorization decision in the API is a lookup of a [`Capability`]
//! in the set granted to the caller's [`Role`].

use serde::Serialize;
use std::collections::HashSet;

use super::user::Role;

/// Closed set of actions a role may be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageTenants,
    ManageSystemConfig,
    ManageTenantSettings,
    ManageUsers,
    ViewUsers,
    ReadAudits,
    ReadNonConformities,
    ReadDocuments,
    ReadKpis,
    ReadRisks,
    ViewDashboard,
    WriteAudits,
    ExecuteChecklists,
    WriteNonConformities,
    WriteDocuments,
    ApproveDocuments,
    ManageDocumentPermissions,
    WriteKpis,
    WriteRisks,
}

const READ_ALL: &[Capability] = &[
    Capability::ReadAudits,
    Capability::ReadNonConformities,
    Capability::ReadDocuments,
    Capability::ReadKpis,
    Capability::ReadRisks,
    Capability::ViewDashboard,
];

const CONTRIBUTE: &[Capability] = &[
    Capability::ViewUsers,
    Capability::WriteNonConformities,
    Capability::WriteDocuments,
    Capability::WriteKpis,
    Capability::WriteRisks,
];

const AUDIT_WORK: &[Capability] = &[Capability::WriteAudits, Capability::ExecuteChecklists];

const TENANT_ADMIN: &[Capability] = &[
    Capability::ManageTenantSettings,
    Capability::ManageUsers,
    Capability::ApproveDocuments,
    Capability::ManageDocumentPermissions,
];

const PLATFORM: &[Capability] = &[Capability::ManageTenants, Capability::ManageSystemConfig];

impl Role {
    /// The capabilities granted to this role.
    pub fn capabilities(&self) -> CapabilitySet {
        let groups: &[&[Capability]] = match self {
            Role::SuperAdmin => &[READ_ALL, CONTRIBUTE, AUDIT_WORK, TENANT_ADMIN, PLATFORM],
            Role::TenantAdmin => &[READ_ALL, CONTRIBUTE, AUDIT_WORK, TENANT_ADMIN],
            Role::Auditor => &[READ_ALL, CONTRIBUTE, AUDIT_WORK],
            Role::Consultant => &[READ_ALL, CONTRIBUTE],
            Role::User => &[READ_ALL],
        };
        CapabilitySet(groups.iter().flat_map(|g| g.iter().copied()).collect())
    }

    /// Whether a caller with this role may assign `target` to someone.
    pub fn can_assign(&self, target: Role) -> bool {
        match target {
            Role::SuperAdmin => *self == Role::SuperAdmin,
            _ => self.capabilities().contains(Capability::ManageUsers),
        }
    }
}

/// Set of capabilities, computed once per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(HashSet<Capability>);

impl CapabilitySet {
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
