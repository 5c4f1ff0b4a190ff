use super::*;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_zero_script_timeout() {
    let mut config = Config::default();
    config.browser.script_timeout_ms = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "browser.script_timeout_ms"));
}

#[test]
fn test_validate_zero_navigation_timeout() {
    let mut config = Config::default();
    config.browser.navigation_timeout_ms = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "browser.navigation_timeout_ms"));
}

#[test]
fn test_validate_grace_not_shorter_than_deadline() {
    let mut config = Config::default();
    config.browser.load_grace_ms = 15_000;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "browser.load_grace_ms"));
}

#[test]
fn test_validate_non_http_initial_page() {
    let mut config = Config::default();
    config.browser.initial_browser_page = "file:///etc/passwd".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "browser.initial_browser_page"));
}

#[test]
fn test_validate_empty_initial_page_is_allowed() {
    let mut config = Config::default();
    config.browser.initial_browser_page = String::new();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
}

#[test]
fn test_validate_zero_chunk_size() {
    let mut config = Config::default();
    config.context.chunk_size = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "context.chunk_size"));
}

#[test]
fn test_validate_both_retention_policies_warns() {
    let mut config = Config::default();
    config.context.remove_old_pages = true;
    config.context.page_summary = true;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "context.page_summary"));
}

#[test]
fn test_validate_unknown_log_level() {
    let mut config = Config::default();
    config.logging.level = "chatty".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "logging.level"));
}

#[test]
fn test_validate_multiple_errors() {
    let mut config = Config::default();
    config.browser.script_timeout_ms = 0;
    config.browser.debug_port = 0;
    config.context.chunk_size = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.len() >= 3);
}

#[test]
fn test_validation_result_add_warning() {
    let mut result = ValidationResult::default();
    result.add_warning(ValidationWarning::new("test", "warning"));
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_into_result_keeps_warnings_when_valid() {
    let mut config = Config::default();
    config.context.remove_old_pages = true;
    config.context.page_summary = true;

    let warnings = ConfigValidator::validate(&config).unwrap().into_result().unwrap();
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_into_result_reports_first_error() {
    let mut config = Config::default();
    config.browser.script_timeout_ms = 0;
    config.context.chunk_size = 0;

    let err = ConfigValidator::validate(&config).unwrap().into_result().unwrap_err();
    match err {
        ConfigError::InvalidValue { field, message } => {
            assert_eq!(field, "browser.script_timeout_ms");
            assert!(message.ends_with("(and 1 more)"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
