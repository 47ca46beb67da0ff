//! The authenticated actor making a request.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role axis. `User < TenantAdmin` on the ordered axis; `SuperAdmin`
/// is a separate platform axis that only satisfies checks explicitly
/// declared to accept it (tenant administration), never tenant-scoped
/// role floors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    TenantAdmin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::TenantAdmin => "tenant_admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "tenant_admin" => Some(Role::TenantAdmin),
            "super_admin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated principal, as produced by the external
/// authentication collaborator. Trusted completely by this layer;
/// immutable for the lifetime of one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    /// Absent only for `SuperAdmin`.
    pub tenant_id: Option<Uuid>,
}

impl Principal {
    pub fn new(user_id: Uuid, role: Role, tenant_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            role,
            tenant_id,
        }
    }
}

/// Transport-supplied request metadata carried into the audit trail.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
}
