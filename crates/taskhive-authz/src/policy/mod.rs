//! Per-resource authorization policies.
//!
//! One module per resource type. Each `authorize` combines tenant
//! context resolution and the role gate into a single allow/deny
//! decision, returning the narrowed [`TenantFilter`] to apply to the
//! store call. Guards that depend on the fetched target entity
//! (assignee ownership, self-deletion, last admin) are separate
//! functions evaluated by the orchestrator after the fetch.

pub mod project;
pub mod task;
pub mod tenant;
pub mod user;

use uuid::Uuid;

/// The narrowed query filter produced by an allow decision.
///
/// Holding one proves an operation passed tenant resolution; its id
/// is the equality constraint every subsequent store call uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantFilter(Uuid);

impl TenantFilter {
    pub(crate) fn new(tenant_id: Uuid) -> Self {
        Self(tenant_id)
    }

    pub fn tenant_id(&self) -> Uuid {
        self.0
    }
}
