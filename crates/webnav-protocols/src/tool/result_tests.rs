use super::*;

#[test]
fn test_tool_result_success() {
    let result = ToolResult::success("OK");
    assert!(result.success);
    assert_eq!(result.content, "OK");
    assert!(result.error.is_none());
    assert!(result.structured_output.is_none());
}

#[test]
fn test_tool_result_success_json() {
    let output = serde_json::json!({"text": "hello", "truncated": false});
    let result = ToolResult::success_json("hello", output);
    assert!(result.success);
    assert_eq!(result.structured_output.as_ref().unwrap()["truncated"], false);
}

#[test]
fn test_tool_result_error() {
    let result = ToolResult::error("Something went wrong");
    assert!(!result.success);
    assert!(result.content.is_empty());
    assert_eq!(result.error, Some("Something went wrong".to_string()));
}

#[test]
fn test_tool_result_failure_json_mirrors_report_into_content() {
    let report = serde_json::json!({"success": false, "error": "Element not found: #nope"});
    let result = ToolResult::failure_json("Element not found: #nope", report.clone());
    assert!(!result.success);
    assert_eq!(result.structured_output, Some(report.clone()));
    let parsed: serde_json::Value = serde_json::from_str(&result.content).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_tool_result_with_metadata() {
    let result = ToolResult::success("OK").with_metadata("elapsed_ms", serde_json::json!(12));
    assert_eq!(result.metadata.get("elapsed_ms").unwrap(), &serde_json::json!(12));
}
