//! Cross-service vocabulary.
//!
//! Every value here is agreed on by the frontend, backend, executor and
//! content service. Changing one is a breaking change for all of them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::ExecutionLimits;

pub const DIFFICULTY_LEVELS: [&str; 3] = ["beginner", "intermediate", "advanced"];

pub const THEMES: [&str; 3] = ["light", "dark", "system"];

pub const CONCEPT_CATEGORIES: [&str; 16] = [
    "basics",
    "variables",
    "control-flow",
    "functions",
    "data-structures",
    "ownership",
    "borrowing",
    "lifetimes",
    "error-handling",
    "traits",
    "generics",
    "closures",
    "iterators",
    "concurrency",
    "modules",
    "testing",
];

/// HTTP status codes used in envelopes and error records
pub mod http_status {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const NO_CONTENT: u16 = 204;
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;
    pub const UNPROCESSABLE_ENTITY: u16 = 422;
    pub const TOO_MANY_REQUESTS: u16 = 429;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
    pub const SERVICE_UNAVAILABLE: u16 = 503;
    pub const GATEWAY_TIMEOUT: u16 = 504;

    pub const ALL: [(&str, u16); 13] = [
        ("OK", OK),
        ("CREATED", CREATED),
        ("NO_CONTENT", NO_CONTENT),
        ("BAD_REQUEST", BAD_REQUEST),
        ("UNAUTHORIZED", UNAUTHORIZED),
        ("FORBIDDEN", FORBIDDEN),
        ("NOT_FOUND", NOT_FOUND),
        ("CONFLICT", CONFLICT),
        ("UNPROCESSABLE_ENTITY", UNPROCESSABLE_ENTITY),
        ("TOO_MANY_REQUESTS", TOO_MANY_REQUESTS),
        ("INTERNAL_SERVER_ERROR", INTERNAL_SERVER_ERROR),
        ("SERVICE_UNAVAILABLE", SERVICE_UNAVAILABLE),
        ("GATEWAY_TIMEOUT", GATEWAY_TIMEOUT),
    ];
}

/// Default executor limits. Services may tighten these at runtime through
/// [`ExecutionLimits`].
pub mod execution_limits {
    /// Default per-run timeout
    pub const TIMEOUT_MS: u64 = 5_000;
    /// Upper bound a request may ask for
    pub const MAX_TIMEOUT_MS: u64 = 30_000;
    pub const MAX_MEMORY_MB: u32 = 128;
    /// Bytes of source
    pub const MAX_CODE_LENGTH: usize = 50_000;
    /// Bytes of captured stdout/stderr
    pub const MAX_OUTPUT_LENGTH: usize = 10_000;
    pub const MAX_CONCURRENT_EXECUTIONS: u32 = 10;
}

/// Machine-readable result code carried in envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiResultCode {
    Success,
    ValidationError,
    AuthenticationError,
    AuthorizationError,
    NotFound,
    ExecutionError,
    ExecutionTimeout,
    MemoryLimitExceeded,
    SecurityViolation,
    RateLimited,
    InternalError,
}

impl ApiResultCode {
    pub const ALL: [ApiResultCode; 11] = [
        ApiResultCode::Success,
        ApiResultCode::ValidationError,
        ApiResultCode::AuthenticationError,
        ApiResultCode::AuthorizationError,
        ApiResultCode::NotFound,
        ApiResultCode::ExecutionError,
        ApiResultCode::ExecutionTimeout,
        ApiResultCode::MemoryLimitExceeded,
        ApiResultCode::SecurityViolation,
        ApiResultCode::RateLimited,
        ApiResultCode::InternalError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiResultCode::Success => "SUCCESS",
            ApiResultCode::ValidationError => "VALIDATION_ERROR",
            ApiResultCode::AuthenticationError => "AUTHENTICATION_ERROR",
            ApiResultCode::AuthorizationError => "AUTHORIZATION_ERROR",
            ApiResultCode::NotFound => "NOT_FOUND",
            ApiResultCode::ExecutionError => "EXECUTION_ERROR",
            ApiResultCode::ExecutionTimeout => "EXECUTION_TIMEOUT",
            ApiResultCode::MemoryLimitExceeded => "MEMORY_LIMIT_EXCEEDED",
            ApiResultCode::SecurityViolation => "SECURITY_VIOLATION",
            ApiResultCode::RateLimited => "RATE_LIMITED",
            ApiResultCode::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for ApiResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All constant groups as one serializable document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ConstantBundle {
    pub difficulty_levels: Vec<&'static str>,
    pub themes: Vec<&'static str>,
    pub concept_categories: Vec<&'static str>,
    pub http_status: BTreeMap<&'static str, u16>,
    pub api_codes: Vec<ApiResultCode>,
    pub execution_limits: ExecutionLimits,
}

impl ConstantBundle {
    pub fn new() -> Self {
        Self {
            difficulty_levels: DIFFICULTY_LEVELS.to_vec(),
            themes: THEMES.to_vec(),
            concept_categories: CONCEPT_CATEGORIES.to_vec(),
            http_status: http_status::ALL.into_iter().collect(),
            api_codes: ApiResultCode::ALL.to_vec(),
            execution_limits: ExecutionLimits::default(),
        }
    }
}

impl Default for ConstantBundle {
    fn default() -> Self {
        Self::new()
    }
}
