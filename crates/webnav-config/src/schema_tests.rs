use super::*;

#[test]
fn test_browser_defaults() {
    let browser = BrowserConfig::default();
    assert_eq!(browser.initial_browser_page, "https://duckduckgo.com");
    assert!(!browser.headless);
    assert_eq!(browser.debug_port, 9222);
    assert!(browser.profile_dir.is_none());
    assert_eq!(browser.script_timeout_ms, 10_000);
    assert_eq!(browser.navigation_timeout_ms, 15_000);
    assert_eq!(browser.load_grace_ms, 500);
}

#[test]
fn test_context_defaults() {
    let context = ContextConfig::default();
    assert!(!context.page_summary);
    assert!(!context.remove_old_pages);
    assert!(!context.retrieve_information);
    assert_eq!(context.chunk_size, 512);
}

#[test]
fn test_logging_defaults() {
    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.directory.ends_with("logs"));
}

#[test]
fn test_partial_section_keeps_field_defaults() {
    let config: Config = toml::from_str(
        r#"
        [browser]
        headless = true
    "#,
    )
    .unwrap();
    assert!(config.browser.headless);
    assert_eq!(config.browser.script_timeout_ms, 10_000);
    assert_eq!(config.context.chunk_size, 512);
}

#[test]
fn test_config_serialization_roundtrip() {
    let mut config = Config::default();
    config.context.remove_old_pages = true;
    config.browser.initial_browser_page = String::new();

    let text = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert!(parsed.context.remove_old_pages);
    assert!(parsed.browser.initial_browser_page.is_empty());
}
