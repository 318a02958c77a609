//! Error records shared across services.
//!
//! The library only defines the shape. Constructing, propagating and
//! logging these is up to the service that raises them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::constants::{http_status, ApiResultCode};

/// Kind-specific payload of an [`AppError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ErrorKind {
    /// Base application error; status chosen by the caller
    Application,
    Validation {
        field: String,
        /// Per-field error lists
        #[serde(default, skip_serializing_if = "Option::is_none")]
        errors: Option<BTreeMap<String, Vec<String>>>,
    },
    #[serde(rename_all = "camelCase")]
    Execution {
        timeout: bool,
        memory_limit: bool,
        security_violation: bool,
    },
    Auth,
    NotFound,
}

/// Error record: shared fields plus a kind discriminant.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct AppError {
    pub message: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub kind: ErrorKind,
}

impl AppError {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
            code: None,
            kind: ErrorKind::Application,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message, http_status::INTERNAL_SERVER_ERROR)
            .with_code(ApiResultCode::InternalError.as_str())
    }

    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: http_status::BAD_REQUEST,
            code: Some(ApiResultCode::ValidationError.as_str().to_string()),
            kind: ErrorKind::Validation {
                field: field.into(),
                errors: None,
            },
        }
    }

    /// Generic execution failure: none of the cause flags set.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::execution_with(message, false, false, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::execution_with(message, true, false, false)
    }

    pub fn memory_limit(message: impl Into<String>) -> Self {
        Self::execution_with(message, false, true, false)
    }

    pub fn security_violation(message: impl Into<String>) -> Self {
        Self::execution_with(message, false, false, true)
    }

    /// Execution failure with explicit cause flags. The code follows the
    /// first set flag in order: timeout, memory limit, security violation.
    pub fn execution_with(
        message: impl Into<String>,
        timeout: bool,
        memory_limit: bool,
        security_violation: bool,
    ) -> Self {
        let code = if timeout {
            ApiResultCode::ExecutionTimeout
        } else if memory_limit {
            ApiResultCode::MemoryLimitExceeded
        } else if security_violation {
            ApiResultCode::SecurityViolation
        } else {
            ApiResultCode::ExecutionError
        };

        Self {
            message: message.into(),
            status_code: http_status::INTERNAL_SERVER_ERROR,
            code: Some(code.as_str().to_string()),
            kind: ErrorKind::Execution {
                timeout,
                memory_limit,
                security_violation,
            },
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: http_status::UNAUTHORIZED,
            code: Some(ApiResultCode::AuthenticationError.as_str().to_string()),
            kind: ErrorKind::Auth,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: http_status::NOT_FOUND,
            code: Some(ApiResultCode::NotFound.as_str().to_string()),
            kind: ErrorKind::NotFound,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    /// Append a per-field message. No-op unless this is a validation error.
    pub fn with_field_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        if let ErrorKind::Validation { errors, .. } = &mut self.kind {
            errors
                .get_or_insert_with(BTreeMap::new)
                .entry(field.into())
                .or_default()
                .push(message.into());
        }
        self
    }

    /// Offending field of a validation error.
    pub fn field(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Malformed payload: {}", err), http_status::BAD_REQUEST)
            .with_code(ApiResultCode::ValidationError.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_statuses() {
        assert_eq!(AppError::auth("Authentication required").status_code, 401);
        assert_eq!(AppError::not_found("Exercise not found").status_code, 404);
        assert_eq!(AppError::validation("bad", "title").status_code, 400);
        assert_eq!(AppError::execution("crashed").status_code, 500);
        assert_eq!(AppError::new("conflict", 409).status_code, 409);
    }

    #[test]
    fn test_execution_codes_follow_flags() {
        assert_eq!(AppError::timeout("t").code.as_deref(), Some("EXECUTION_TIMEOUT"));
        assert_eq!(AppError::memory_limit("m").code.as_deref(), Some("MEMORY_LIMIT_EXCEEDED"));
        assert_eq!(AppError::security_violation("s").code.as_deref(), Some("SECURITY_VIOLATION"));
        assert_eq!(AppError::execution("e").code.as_deref(), Some("EXECUTION_ERROR"));

        let both = AppError::execution_with("both", true, true, false);
        assert_eq!(both.code.as_deref(), Some("EXECUTION_TIMEOUT"));
        assert_eq!(
            both.kind,
            ErrorKind::Execution {
                timeout: true,
                memory_limit: true,
                security_violation: false
            }
        );
    }

    #[test]
    fn test_field_errors_accumulate() {
        let err = AppError::validation("Invalid exercise", "title")
            .with_field_error("title", "must not be empty")
            .with_field_error("title", "too long")
            .with_field_error("order", "must be positive");

        assert_eq!(err.field(), Some("title"));
        match &err.kind {
            ErrorKind::Validation { errors: Some(errors), .. } => {
                assert_eq!(errors["title"].len(), 2);
                assert_eq!(errors["order"], vec!["must be positive".to_string()]);
            }
            other => panic!("unexpected kind: {:?}", other),
        }

        // Ignored on other kinds
        let not_found = AppError::not_found("gone").with_field_error("id", "unknown");
        assert_eq!(not_found.kind, ErrorKind::NotFound);
        assert_eq!(not_found.field(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(AppError::validation("Invalid", "code")).unwrap();
        assert_eq!(
            value,
            json!({
                "message": "Invalid",
                "statusCode": 400,
                "code": "VALIDATION_ERROR",
                "kind": "validation",
                "field": "code"
            })
        );

        let value = serde_json::to_value(AppError::memory_limit("OOM")).unwrap();
        assert_eq!(value["kind"], "execution");
        assert_eq!(value["memoryLimit"], true);
        assert_eq!(value["securityViolation"], false);

        let value = serde_json::to_value(AppError::not_found("gone")).unwrap();
        assert_eq!(value["kind"], "notFound");
    }

    #[test]
    fn test_deserialize_from_peer_service() {
        let payload = json!({
            "message": "Execution timed out",
            "statusCode": 500,
            "code": "EXECUTION_TIMEOUT",
            "kind": "execution",
            "timeout": true,
            "memoryLimit": false,
            "securityViolation": false
        });

        let err: AppError = serde_json::from_value(payload).unwrap();
        assert_eq!(err, AppError::timeout("Execution timed out"));
    }

    #[test]
    fn test_display_and_classification() {
        let err = AppError::auth("Authentication required");
        assert_eq!(err.to_string(), "Authentication required");
        assert!(err.is_client_error());
        assert!(!AppError::internal("boom").is_client_error());
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::from(parse_err);

        assert_eq!(err.status_code, 400);
        assert!(err.message.starts_with("Malformed payload"));
    }
}
