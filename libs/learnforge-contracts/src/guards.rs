//! Shape Validator
//!
//! **Core Responsibility:**
//! Decide whether an untyped JSON value structurally matches one of the
//! four guarded record shapes.
//!
//! **Checked fields (and nothing else):**
//! - Exercise: `id` string, `title` string, `starterCode` present
//! - TestResult: `passed` bool, `output` present, `testCases` array
//! - APIResponse: `success` bool
//! - CodeExecutionResult: `success` bool, `output` present, `executionTime` present
//!
//! **Properties:**
//! - Shallow: never looks inside `testCases`, `data`, `testResult`, `environment`
//! - Open: unknown extra fields are accepted
//! - Total: every input maps to true/false, nothing panics
//! - Stateless: no shared state, safe from any thread
//!
//! "Present" means the key exists; any JSON value, `null` included, counts.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::{ApiResponse, CodeExecutionResult, Exercise, TestResult};

const ID: &str = "id";
const TITLE: &str = "title";
const STARTER_CODE: &str = "starterCode";
const PASSED: &str = "passed";
const OUTPUT: &str = "output";
const TEST_CASES: &str = "testCases";
const SUCCESS: &str = "success";
const EXECUTION_TIME: &str = "executionTime";

pub fn is_exercise(value: &Value) -> bool {
    ExerciseView::from_value(value).is_some()
}

pub fn is_test_result(value: &Value) -> bool {
    TestResultView::from_value(value).is_some()
}

/// Envelope check only; the payload type is never inspected.
pub fn is_api_response(value: &Value) -> bool {
    ApiResponseView::from_value(value).is_some()
}

pub fn is_code_execution_result(value: &Value) -> bool {
    CodeExecutionResultView::from_value(value).is_some()
}

// ---------------------------------------------------------------------------
// Narrowed views
// ---------------------------------------------------------------------------

/// Borrowed view of a value that passed [`is_exercise`].
#[derive(Debug, Clone, Copy)]
pub struct ExerciseView<'a> {
    id: &'a str,
    title: &'a str,
    starter_code: &'a Value,
    fields: &'a Map<String, Value>,
}

impl<'a> ExerciseView<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Self {
            id: fields.get(ID)?.as_str()?,
            title: fields.get(TITLE)?.as_str()?,
            starter_code: fields.get(STARTER_CODE)?,
            fields,
        })
    }

    pub fn id(&self) -> &'a str {
        self.id
    }

    pub fn title(&self) -> &'a str {
        self.title
    }

    /// Present but of unchecked type
    pub fn starter_code(&self) -> &'a Value {
        self.starter_code
    }

    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field)
    }
}

/// Borrowed view of a value that passed [`is_test_result`].
#[derive(Debug, Clone, Copy)]
pub struct TestResultView<'a> {
    passed: bool,
    output: &'a Value,
    test_cases: &'a [Value],
    fields: &'a Map<String, Value>,
}

impl<'a> TestResultView<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Self {
            passed: fields.get(PASSED)?.as_bool()?,
            output: fields.get(OUTPUT)?,
            test_cases: fields.get(TEST_CASES)?.as_array()?.as_slice(),
            fields,
        })
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn output(&self) -> &'a Value {
        self.output
    }

    /// Elements are not validated.
    pub fn test_cases(&self) -> &'a [Value] {
        self.test_cases
    }

    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field)
    }
}

/// Borrowed view of a value that passed [`is_api_response`].
#[derive(Debug, Clone, Copy)]
pub struct ApiResponseView<'a> {
    success: bool,
    fields: &'a Map<String, Value>,
}

impl<'a> ApiResponseView<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Self {
            success: fields.get(SUCCESS)?.as_bool()?,
            fields,
        })
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Raw payload, if any. Its type is the caller's business.
    pub fn data(&self) -> Option<&'a Value> {
        self.fields.get("data")
    }

    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field)
    }
}

/// Borrowed view of a value that passed [`is_code_execution_result`].
#[derive(Debug, Clone, Copy)]
pub struct CodeExecutionResultView<'a> {
    success: bool,
    output: &'a Value,
    execution_time: &'a Value,
    fields: &'a Map<String, Value>,
}

impl<'a> CodeExecutionResultView<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Self {
            success: fields.get(SUCCESS)?.as_bool()?,
            output: fields.get(OUTPUT)?,
            execution_time: fields.get(EXECUTION_TIME)?,
            fields,
        })
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> &'a Value {
        self.output
    }

    pub fn execution_time(&self) -> &'a Value {
        self.execution_time
    }

    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field)
    }
}

// ---------------------------------------------------------------------------
// Schema dispatch
// ---------------------------------------------------------------------------

/// The guarded record kinds. Serializes as its kebab-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Schema {
    Exercise,
    TestResult,
    ApiResponse,
    CodeExecutionResult,
}

impl Schema {
    pub const ALL: [Schema; 4] = [
        Schema::Exercise,
        Schema::TestResult,
        Schema::ApiResponse,
        Schema::CodeExecutionResult,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Schema::Exercise => "exercise",
            Schema::TestResult => "test-result",
            Schema::ApiResponse => "api-response",
            Schema::CodeExecutionResult => "code-execution-result",
        }
    }

    pub fn check(&self, value: &Value) -> bool {
        match self {
            Schema::Exercise => is_exercise(value),
            Schema::TestResult => is_test_result(value),
            Schema::ApiResponse => is_api_response(value),
            Schema::CodeExecutionResult => is_code_execution_result(value),
        }
    }

    /// An absent value never matches.
    pub fn check_opt(&self, value: Option<&Value>) -> bool {
        value.is_some_and(|v| self.check(v))
    }

    /// Every schema the value satisfies, in [`Schema::ALL`] order.
    pub fn matching(value: &Value) -> Vec<Schema> {
        Self::ALL.into_iter().filter(|s| s.check(value)).collect()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown schema '{0}' (expected one of: exercise, test-result, api-response, code-execution-result)")]
pub struct UnknownSchema(pub String);

impl FromStr for Schema {
    type Err = UnknownSchema;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|schema| schema.name() == s)
            .ok_or_else(|| UnknownSchema(s.to_string()))
    }
}

/// Static access to a record type's guard.
pub trait ShapeGuard {
    const SCHEMA: Schema;

    fn matches(value: &Value) -> bool {
        Self::SCHEMA.check(value)
    }
}

impl ShapeGuard for Exercise {
    const SCHEMA: Schema = Schema::Exercise;
}

impl ShapeGuard for TestResult {
    const SCHEMA: Schema = Schema::TestResult;
}

impl<T> ShapeGuard for ApiResponse<T> {
    const SCHEMA: Schema = Schema::ApiResponse;
}

impl ShapeGuard for CodeExecutionResult {
    const SCHEMA: Schema = Schema::CodeExecutionResult;
}
