//! Audit log domain model.
//!
//! Entries are append-only: nothing in the application updates or
//! deletes a record once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed set of audited operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditAction {
    CreateTask,
    UpdateTask,
    UpdateTaskStatus,
    DeleteTask,
    CreateUser,
    UpdateUser,
    DeleteUser,
    UpdateTenant,
    CreateProject,
    DeleteProject,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::CreateTask => "CREATE_TASK",
            AuditAction::UpdateTask => "UPDATE_TASK",
            AuditAction::UpdateTaskStatus => "UPDATE_TASK_STATUS",
            AuditAction::DeleteTask => "DELETE_TASK",
            AuditAction::CreateUser => "CREATE_USER",
            AuditAction::UpdateUser => "UPDATE_USER",
            AuditAction::DeleteUser => "DELETE_USER",
            AuditAction::UpdateTenant => "UPDATE_TENANT",
            AuditAction::CreateProject => "CREATE_PROJECT",
            AuditAction::DeleteProject => "DELETE_PROJECT",
        }
    }

    pub fn parse(s: &str) -> Option<AuditAction> {
        match s {
            "CREATE_TASK" => Some(AuditAction::CreateTask),
            "UPDATE_TASK" => Some(AuditAction::UpdateTask),
            "UPDATE_TASK_STATUS" => Some(AuditAction::UpdateTaskStatus),
            "DELETE_TASK" => Some(AuditAction::DeleteTask),
            "CREATE_USER" => Some(AuditAction::CreateUser),
            "UPDATE_USER" => Some(AuditAction::UpdateUser),
            "DELETE_USER" => Some(AuditAction::DeleteUser),
            "UPDATE_TENANT" => Some(AuditAction::UpdateTenant),
            "CREATE_PROJECT" => Some(AuditAction::CreateProject),
            "DELETE_PROJECT" => Some(AuditAction::DeleteProject),
            _ => None,
        }
    }
}

/// One immutable decision record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    /// `None` for tenant-less platform-admin actions.
    pub tenant_id: Option<Uuid>,
    pub actor_user_id: Uuid,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub ip_address: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAuditLogEntry {
    pub tenant_id: Option<Uuid>,
    pub actor_user_id: Uuid,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub ip_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_round_trip() {
        let actions = [
            AuditAction::CreateTask,
            AuditAction::UpdateTask,
            AuditAction::UpdateTaskStatus,
            AuditAction::DeleteTask,
            AuditAction::CreateUser,
            AuditAction::UpdateUser,
            AuditAction::DeleteUser,
            AuditAction::UpdateTenant,
            AuditAction::CreateProject,
            AuditAction::DeleteProject,
        ];
        for action in actions {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
    }
}
