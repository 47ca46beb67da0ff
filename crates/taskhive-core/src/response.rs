//! Transport-agnostic response envelope.
//!
//! Every operation yields `{ success, data?, message?, errors? }` with
//! an associated [`StatusClass`]. Infrastructure faults are surfaced as
//! an opaque "Server error"; full detail goes to the log, never to the
//! caller.

use serde::Serialize;

use crate::error::{StatusClass, TaskHiveError};

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> (StatusClass, Self) {
        (
            StatusClass::Ok,
            Self {
                success: true,
                data: Some(data),
                message: None,
                errors: None,
            },
        )
    }

    pub fn created(data: T) -> (StatusClass, Self) {
        (
            StatusClass::Created,
            Self {
                success: true,
                data: Some(data),
                message: None,
                errors: None,
            },
        )
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> (StatusClass, Self) {
        (
            StatusClass::Ok,
            Self {
                success: true,
                data: Some(data),
                message: Some(message.into()),
                errors: None,
            },
        )
    }

    pub fn from_error(err: &TaskHiveError) -> (StatusClass, Self) {
        let class = err.class();
        let message = match class {
            // Opaque to the caller; detail is logged server-side.
            StatusClass::Internal => "Server error".to_string(),
            _ => err.to_string(),
        };
        (
            class,
            Self {
                success: false,
                data: None,
                message: Some(message),
                errors: None,
            },
        )
    }
}
