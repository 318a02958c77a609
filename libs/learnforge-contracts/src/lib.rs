//! Shared contracts for the learnforge services.
//!
//! Record shapes, cross-service constants, error records and the shallow
//! shape validators the frontend, backend, code executor and content
//! service use to agree on what travels between them.

pub mod config;
pub mod constants;
pub mod error;
pub mod guards;
pub mod types;

mod guards_tests;

/// Everything a service usually needs, in one import.
pub mod prelude {
    pub use crate::config::{ConfigError, ExecutionLimits};
    pub use crate::constants::{
        execution_limits, http_status, ApiResultCode, ConstantBundle, CONCEPT_CATEGORIES,
        DIFFICULTY_LEVELS, THEMES,
    };
    pub use crate::error::{AppError, ErrorKind};
    pub use crate::guards::{
        is_api_response, is_code_execution_result, is_exercise, is_test_result,
        ApiResponseView, CodeExecutionResultView, ExerciseView, Schema, ShapeGuard,
        TestResultView,
    };
    pub use crate::types::{
        ApiResponse, CodeExecutionRequest, CodeExecutionResult, ConceptCategory, Difficulty,
        Exercise, ExerciseSummary, ExecutionEnvironment, PaginatedResponse, ProgressSummary,
        TestCaseResult, TestResult, Theme, UserPreferences, UserProgress,
    };
}
