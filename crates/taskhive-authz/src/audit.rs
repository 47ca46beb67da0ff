//! Best-effort audit recording.
//!
//! An append failure must never fail, roll back, or block the primary
//! operation it documents: the failure goes to the `audit` tracing
//! target and is swallowed. Completeness of the trail is traded for
//! availability of the primary operation (see DESIGN.md).

use taskhive_core::models::audit::{AuditAction, CreateAuditLogEntry};
use taskhive_core::models::principal::{Principal, RequestMeta};
use taskhive_core::repository::AuditLogRepository;
use uuid::Uuid;

/// Fire-and-forget wrapper over an [`AuditLogRepository`].
#[derive(Clone)]
pub struct AuditSink<R: AuditLogRepository> {
    repo: R,
}

impl<R: AuditLogRepository> AuditSink<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Append one decision record.
    ///
    /// Called strictly after a confirmed store result; a cancelled
    /// operation never reaches this point, so no entry is written for
    /// an operation whose outcome is unknown. The return type is `()`:
    /// the audit outcome is decoupled from the primary result.
    pub async fn record(
        &self,
        tenant_id: Option<Uuid>,
        principal: &Principal,
        action: AuditAction,
        entity_type: &str,
        entity_id: Uuid,
        meta: &RequestMeta,
    ) {
        let input = CreateAuditLogEntry {
            tenant_id,
            actor_user_id: principal.user_id,
            action,
            entity_type: entity_type.to_string(),
            entity_id,
            ip_address: meta.ip_address.clone(),
        };

        if let Err(err) = self.repo.append(input).await {
            tracing::warn!(
                target: "audit",
                action = action.as_str(),
                entity_type = entity_type,
                error = %err,
                "audit append failed; primary operation unaffected"
            );
        }
    }
}
