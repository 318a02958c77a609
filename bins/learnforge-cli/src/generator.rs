// JSON Schema generation for the shared record shapes
// Downstream services in other languages generate their types from these.

use learnforge_contracts::config::ExecutionLimits;
use learnforge_contracts::error::AppError;
use learnforge_contracts::types::{
    ApiResponse, CodeExecutionRequest, CodeExecutionResult, Exercise, ExerciseSummary,
    ExecutionEnvironment, PaginatedResponse, ProgressSummary, TestCaseResult, TestResult,
    UserPreferences, UserProgress,
};
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

/// Exported record names, in output order
pub const RECORDS: [&str; 14] = [
    "exercise",
    "exercise-summary",
    "test-case-result",
    "test-result",
    "execution-environment",
    "code-execution-request",
    "code-execution-result",
    "user-progress",
    "progress-summary",
    "user-preferences",
    "api-response",
    "paginated-response",
    "app-error",
    "execution-limits",
];

/// Schema document for one record. Generic envelopes use an untyped payload.
pub fn schema_for_record(name: &str) -> Option<RootSchema> {
    let schema = match name {
        "exercise" => schema_for!(Exercise),
        "exercise-summary" => schema_for!(ExerciseSummary),
        "test-case-result" => schema_for!(TestCaseResult),
        "test-result" => schema_for!(TestResult),
        "execution-environment" => schema_for!(ExecutionEnvironment),
        "code-execution-request" => schema_for!(CodeExecutionRequest),
        "code-execution-result" => schema_for!(CodeExecutionResult),
        "user-progress" => schema_for!(UserProgress),
        "progress-summary" => schema_for!(ProgressSummary),
        "user-preferences" => schema_for!(UserPreferences),
        "api-response" => schema_for!(ApiResponse<Value>),
        "paginated-response" => schema_for!(PaginatedResponse<Value>),
        "app-error" => schema_for!(AppError),
        "execution-limits" => schema_for!(ExecutionLimits),
        _ => return None,
    };
    Some(schema)
}

/// Selected records with their documents; `None` selects all of them.
pub fn documents(name: Option<&str>) -> Option<Vec<(&'static str, RootSchema)>> {
    match name {
        Some(name) => {
            let record = RECORDS.iter().copied().find(|r| *r == name)?;
            Some(vec![(record, schema_for_record(record)?)])
        }
        None => Some(
            RECORDS
                .iter()
                .filter_map(|r| schema_for_record(r).map(|s| (*r, s)))
                .collect(),
        ),
    }
}
