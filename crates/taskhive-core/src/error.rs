//! Error types for the TaskHive system.
//!
//! Every error maps to exactly one [`StatusClass`], so callers can
//! distinguish "fix your input" (400/409) from "you may never do this"
//! (403) from "not here" (404) without inspecting message text.

use thiserror::Error;

use crate::models::principal::Role;

#[derive(Debug, Error)]
pub enum TaskHiveError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Tenant context missing")]
    MissingTenantContext,

    #[error("Insufficient role: requires at least {required}")]
    InsufficientRole { required: Role },

    #[error("You can only update your assigned tasks")]
    NotAssignee,

    #[error("You cannot delete your own account")]
    CannotDeleteSelf,

    #[error("Tenant must have at least one admin")]
    TenantRequiresAdmin,

    #[error("Email already exists in this tenant")]
    DuplicateEmail { email: String },

    #[error("Invalid plan: {plan}")]
    InvalidPlan { plan: String },

    #[error("Referenced {entity} not found in tenant")]
    InvalidReference { entity: &'static str },

    #[error("Assigned user not found in tenant")]
    AssigneeNotInTenant,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// HTTP-agnostic status classification of an error or success outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Ok,
    Created,
    InvalidInput,
    Conflict,
    Forbidden,
    NotFound,
    Internal,
}

impl StatusClass {
    pub fn code(self) -> u16 {
        match self {
            StatusClass::Ok => 200,
            StatusClass::Created => 201,
            StatusClass::InvalidInput => 400,
            StatusClass::Conflict => 409,
            StatusClass::Forbidden => 403,
            StatusClass::NotFound => 404,
            StatusClass::Internal => 500,
        }
    }
}

impl TaskHiveError {
    /// Classify this error for the response envelope.
    ///
    /// The invariant guards (self-deletion, last-admin) classify as
    /// input errors: the caller can correct them by choosing a
    /// different target.
    pub fn class(&self) -> StatusClass {
        match self {
            TaskHiveError::NotFound { .. } => StatusClass::NotFound,
            TaskHiveError::MissingTenantContext
            | TaskHiveError::InsufficientRole { .. }
            | TaskHiveError::NotAssignee => StatusClass::Forbidden,
            TaskHiveError::DuplicateEmail { .. } => StatusClass::Conflict,
            TaskHiveError::CannotDeleteSelf
            | TaskHiveError::TenantRequiresAdmin
            | TaskHiveError::InvalidPlan { .. }
            | TaskHiveError::InvalidReference { .. }
            | TaskHiveError::AssigneeNotInTenant
            | TaskHiveError::Validation { .. } => StatusClass::InvalidInput,
            TaskHiveError::Database(_) | TaskHiveError::Internal(_) => StatusClass::Internal,
        }
    }
}

pub type TaskHiveResult<T> = Result<T, TaskHiveError>;
