use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ExecutionLimits;
use crate::constants::ApiResultCode;
use crate::error::AppError;

/// Exercise difficulty. Wire form is the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == value)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editor/UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    System,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concept an exercise teaches. Wire form is kebab-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ConceptCategory {
    Basics,
    Variables,
    ControlFlow,
    Functions,
    DataStructures,
    Ownership,
    Borrowing,
    Lifetimes,
    ErrorHandling,
    Traits,
    Generics,
    Closures,
    Iterators,
    Concurrency,
    Modules,
    Testing,
}

impl ConceptCategory {
    pub const ALL: [ConceptCategory; 16] = [
        ConceptCategory::Basics,
        ConceptCategory::Variables,
        ConceptCategory::ControlFlow,
        ConceptCategory::Functions,
        ConceptCategory::DataStructures,
        ConceptCategory::Ownership,
        ConceptCategory::Borrowing,
        ConceptCategory::Lifetimes,
        ConceptCategory::ErrorHandling,
        ConceptCategory::Traits,
        ConceptCategory::Generics,
        ConceptCategory::Closures,
        ConceptCategory::Iterators,
        ConceptCategory::Concurrency,
        ConceptCategory::Modules,
        ConceptCategory::Testing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConceptCategory::Basics => "basics",
            ConceptCategory::Variables => "variables",
            ConceptCategory::ControlFlow => "control-flow",
            ConceptCategory::Functions => "functions",
            ConceptCategory::DataStructures => "data-structures",
            ConceptCategory::Ownership => "ownership",
            ConceptCategory::Borrowing => "borrowing",
            ConceptCategory::Lifetimes => "lifetimes",
            ConceptCategory::ErrorHandling => "error-handling",
            ConceptCategory::Traits => "traits",
            ConceptCategory::Generics => "generics",
            ConceptCategory::Closures => "closures",
            ConceptCategory::Iterators => "iterators",
            ConceptCategory::Concurrency => "concurrency",
            ConceptCategory::Modules => "modules",
            ConceptCategory::Testing => "testing",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for ConceptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Exercises
// ---------------------------------------------------------------------------

/// An exercise as served by the content service.
///
/// Only `id`, `title` and `starterCode` are looked at by
/// [`crate::guards::is_exercise`]; everything else is trusted once
/// deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub topics: Vec<String>,
    pub order: u32,
    pub starter_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<ConceptCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// List-view projection of an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSummary {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub topics: Vec<String>,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl From<&Exercise> for ExerciseSummary {
    fn from(exercise: &Exercise) -> Self {
        Self {
            id: exercise.id.clone(),
            title: exercise.title.clone(),
            difficulty: exercise.difficulty,
            topics: exercise.topics.clone(),
            order: exercise.order,
            completed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Test results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub name: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub passed: bool,
    pub output: String,
    pub test_cases: Vec<TestCaseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed_tests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestResult {
    /// Aggregate individual case results.
    ///
    /// The run passes only when there is at least one case and every case
    /// passed. Counts are always filled in.
    pub fn from_cases(test_cases: Vec<TestCaseResult>, output: impl Into<String>) -> Self {
        let total = test_cases.len() as u32;
        let passed_count = test_cases.iter().filter(|tc| tc.passed).count() as u32;

        Self {
            passed: total > 0 && passed_count == total,
            output: output.into(),
            test_cases,
            total_tests: Some(total),
            passed_tests: Some(passed_count),
            error: None,
        }
    }

    /// Names of the cases that did not pass, in order.
    pub fn failed_cases(&self) -> impl Iterator<Item = &str> {
        self.test_cases
            .iter()
            .filter(|tc| !tc.passed)
            .map(|tc| tc.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Code execution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionEnvironment {
    pub runtime: String,
    pub version: String,
    /// Bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_used: Option<u64>,
    /// Bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<u64>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// Body of a run request sent from the backend to the code executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeExecutionRequest {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<String>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_tests: Option<bool>,
}

impl CodeExecutionRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            exercise_id: None,
            timeout: None,
            run_tests: None,
        }
    }

    /// Check the request against the executor's limits.
    ///
    /// Sizes are measured in bytes of the UTF-8 source.
    pub fn validate(&self, limits: &ExecutionLimits) -> Result<(), AppError> {
        if self.code.trim().is_empty() {
            return Err(AppError::validation("Code must not be empty", "code"));
        }
        if self.code.len() > limits.max_code_length {
            return Err(AppError::validation(
                format!(
                    "Code exceeds maximum size of {} bytes",
                    limits.max_code_length
                ),
                "code",
            ));
        }
        if let Some(timeout) = self.timeout {
            if timeout == 0 || timeout > limits.max_timeout_ms {
                return Err(AppError::validation(
                    format!(
                        "Timeout must be between 1 and {} ms",
                        limits.max_timeout_ms
                    ),
                    "timeout",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeExecutionResult {
    pub success: bool,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Milliseconds
    pub execution_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_result: Option<TestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<ExecutionEnvironment>,
}

impl CodeExecutionResult {
    /// A failed run carrying the error's message.
    pub fn failed(error: &AppError, output: impl Into<String>, execution_time: f64) -> Self {
        Self {
            success: false,
            output: output.into(),
            error: Some(error.message.clone()),
            execution_time,
            test_result: None,
            environment: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Progress and preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    pub exercise_id: String,
    pub completed: bool,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_attempt_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_submitted_code: Option<String>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_execution_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub user_id: String,
    pub total_exercises: u32,
    pub completed_exercises: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub concepts_mastered: Vec<ConceptCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl ProgressSummary {
    /// Whole-number completion percentage, 0 when there are no exercises.
    pub fn completion_percent(&self) -> u32 {
        if self.total_exercises == 0 {
            return 0;
        }
        let done = self.completed_exercises.min(self.total_exercises);
        done * 100 / self.total_exercises
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub theme: Theme,
    pub font_size: u32,
    pub auto_save: bool,
    pub show_hints: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: 14,
            auto_save: true,
            show_hints: true,
        }
    }
}

// ---------------------------------------------------------------------------
// API envelope
// ---------------------------------------------------------------------------

/// The wrapper every cross-service response travels in.
///
/// `data` is opaque to [`crate::guards::is_api_response`], which only
/// confirms `success` is a boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ApiResultCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            code: Some(ApiResultCode::Success),
            timestamp: None,
        }
    }

    /// Error envelope. Codes outside the shared vocabulary are dropped.
    pub fn from_error(error: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.message.clone()),
            message: None,
            code: error.code.as_deref().and_then(ApiResultCode::parse),
            timestamp: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn timestamped(self) -> Self {
        self.with_timestamp(Utc::now())
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(error: AppError) -> Self {
        Self::from_error(&error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Build a page; `has_more` is derived from the totals. Pages are
    /// 1-based; a page of 0 is treated as page 1.
    pub fn new(items: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        let page = page.max(1);
        let seen = u64::from(page) * u64::from(page_size);
        Self {
            items,
            total,
            page,
            page_size,
            has_more: seen < total,
        }
    }
}
