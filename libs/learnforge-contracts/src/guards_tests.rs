/// Behavioural tests for the shape validators
///
/// These pin down the shallow boundary peers rely on:
/// 1. Non-objects never match
/// 2. Minimal objects with exactly the required fields match
/// 3. One wrong checked type fails the check
/// 4. Unknown extra fields are tolerated
/// 5. Unchecked fields may carry any type
/// 6. Repeated calls agree

#[cfg(test)]
mod shape_validator_tests {
    use crate::guards::{
        is_api_response, is_code_execution_result, is_exercise, is_test_result, Schema,
    };
    use serde_json::{json, Value};

    type Guard = fn(&Value) -> bool;

    const GUARDS: [(&str, Guard); 4] = [
        ("exercise", is_exercise),
        ("test-result", is_test_result),
        ("api-response", is_api_response),
        ("code-execution-result", is_code_execution_result),
    ];

    fn minimal(schema: Schema) -> Value {
        match schema {
            Schema::Exercise => json!({ "id": "e1", "title": "First", "starterCode": "" }),
            Schema::TestResult => json!({ "passed": true, "output": "", "testCases": [] }),
            Schema::ApiResponse => json!({ "success": true }),
            Schema::CodeExecutionResult => {
                json!({ "success": true, "output": "", "executionTime": 0 })
            }
        }
    }

    #[test]
    fn test_non_objects_never_match() {
        let inputs = [
            Value::Null,
            json!(0),
            json!(-1.5),
            json!(true),
            json!(""),
            json!("success"),
            json!([]),
            json!([{ "success": true }]),
            json!(["id", "title", "starterCode"]),
        ];

        for input in &inputs {
            for (name, guard) in GUARDS {
                assert!(!guard(input), "{} accepted {}", name, input);
            }
        }
    }

    #[test]
    fn test_empty_object_never_matches() {
        let empty = json!({});
        for (name, guard) in GUARDS {
            assert!(!guard(&empty), "{} accepted an empty object", name);
        }
    }

    #[test]
    fn test_minimal_objects_match() {
        for schema in Schema::ALL {
            assert!(schema.check(&minimal(schema)), "{} rejected its minimal shape", schema);
        }
    }

    #[test]
    fn test_each_required_field_is_required() {
        for schema in Schema::ALL {
            let full = minimal(schema);
            let keys: Vec<String> = full.as_object().unwrap().keys().cloned().collect();

            for key in keys {
                let mut partial = full.clone();
                partial.as_object_mut().unwrap().remove(&key);
                assert!(!schema.check(&partial), "{} matched without '{}'", schema, key);
            }
        }
    }

    #[test]
    fn test_wrong_checked_type_fails() {
        let cases = [
            (Schema::Exercise, json!({ "id": 1, "title": "t", "starterCode": "" })),
            (Schema::Exercise, json!({ "id": "e", "title": null, "starterCode": "" })),
            (Schema::TestResult, json!({ "passed": "yes", "output": "", "testCases": [] })),
            (Schema::TestResult, json!({ "passed": true, "output": "", "testCases": {} })),
            (Schema::TestResult, json!({ "passed": true, "output": "", "testCases": "[]" })),
            (Schema::ApiResponse, json!({ "success": "true" })),
            (Schema::ApiResponse, json!({ "success": 1 })),
            (
                Schema::CodeExecutionResult,
                json!({ "success": null, "output": "", "executionTime": 0 }),
            ),
        ];

        for (schema, value) in &cases {
            assert!(!schema.check(value), "{} accepted {}", schema, value);
        }
    }

    #[test]
    fn test_presence_only_fields_accept_any_type() {
        assert!(is_exercise(&json!({ "id": "e", "title": "t", "starterCode": null })));
        assert!(is_exercise(&json!({ "id": "e", "title": "t", "starterCode": 7 })));
        assert!(is_test_result(&json!({ "passed": false, "output": null, "testCases": [] })));
        assert!(is_code_execution_result(
            &json!({ "success": false, "output": [], "executionTime": "n/a" })
        ));
    }

    #[test]
    fn test_unchecked_fields_ignored() {
        // difficulty/topics/order are declared but not checked
        assert!(is_exercise(&json!({
            "id": "e",
            "title": "t",
            "starterCode": "",
            "difficulty": "impossible",
            "topics": "not-a-list",
            "order": "first"
        })));

        // Nested structures are not validated
        assert!(is_test_result(&json!({
            "passed": true,
            "output": "",
            "testCases": [{ "passed": "maybe" }, 3]
        })));
        assert!(is_api_response(&json!({ "success": false, "data": "whatever", "error": 500 })));
        assert!(is_code_execution_result(&json!({
            "success": true,
            "output": "",
            "executionTime": 1,
            "testResult": "broken",
            "environment": 0
        })));
    }

    #[test]
    fn test_extra_fields_tolerated() {
        for schema in Schema::ALL {
            let mut value = minimal(schema);
            let fields = value.as_object_mut().unwrap();
            fields.insert("unexpected".to_string(), json!({ "deep": [1, 2, 3] }));
            fields.insert("traceId".to_string(), json!("abc"));

            assert!(schema.check(&value), "{} rejected extra fields", schema);
        }
    }

    #[test]
    fn test_repeated_calls_agree() {
        let inputs = [
            Value::Null,
            json!({ "success": true }),
            json!({ "passed": true, "output": "" }),
            minimal(Schema::Exercise),
        ];

        for input in &inputs {
            for (_, guard) in GUARDS {
                assert_eq!(guard(input), guard(input));
            }
        }
    }

    #[test]
    fn test_reference_examples() {
        assert!(is_test_result(&json!({ "passed": true, "output": "", "testCases": [] })));
        assert!(!is_test_result(&json!({ "passed": true, "output": "" })));
        assert!(!is_api_response(&json!({ "success": "true" })));
        assert!(!is_exercise(&Value::Null));
    }

    #[test]
    fn test_callable_across_threads() {
        let value = minimal(Schema::TestResult);
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| is_test_result(&value)))
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap());
            }
        });
    }
}
