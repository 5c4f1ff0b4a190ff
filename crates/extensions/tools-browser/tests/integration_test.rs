//! End-to-end tests for the web navigator.
//!
//! The scripted-engine tests run everywhere. The Chrome test needs a local
//! Chrome install:
//! cargo test -p webnav-tools-browser --test integration_test -- --ignored --nocapture

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use parking_lot::Mutex;
use serde_json::json;
use webnav_config::ContextConfig;
use webnav_protocols::{HistoryEntry, PAGE_RESULT_MARKER, ToolContext};
use webnav_tools_browser::cdp::cdp_engine_factory;
use webnav_tools_browser::context::REMOVED_PAGE_PLACEHOLDER;
use webnav_tools_browser::scripts::PageScript;
use webnav_tools_browser::{
    BrowserManager, BrowserManagerConfig, Engine, EngineError, EngineFactory, LoadSignal,
    ToolCatalog, ToolInvocation, VisitedPages, register_browser_tools,
};

const EXAMPLE_HTML: &str = r#"<html><head><title>Example Domain</title>
<style>body { color: red; }</style></head>
<body><div><h1>Example Domain</h1>
<p>This domain is for use in illustrative examples in documents.</p>
<p><a href="https://www.iana.org/domains/example">More information...</a></p>
</div><script>console.log("x")</script></body></html>"#;

/// Serves fixed pages by URL and answers page scripts from a table.
struct ScriptedEngine {
    pages: HashMap<String, String>,
    answers: Arc<Mutex<HashMap<String, String>>>,
    current: Option<String>,
    signal: LoadSignal,
}

#[async_trait(?Send)]
impl Engine for ScriptedEngine {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        if !self.pages.contains_key(url) {
            return Err(EngineError::Navigation(format!("{url}: net::ERR_NAME_NOT_RESOLVED")));
        }
        self.current = Some(url.to_string());
        self.signal.loading();
        let signal = self.signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(15)).await;
            signal.idle();
        });
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<String, EngineError> {
        if script == PageScript::OuterHtml.render() {
            let html = self
                .current
                .as_ref()
                .and_then(|url| self.pages.get(url))
                .cloned()
                .unwrap_or_default();
            return Ok(json!(html).to_string());
        }
        Ok(self
            .answers
            .lock()
            .get(script)
            .cloned()
            .unwrap_or_else(|| "{}".to_string()))
    }
}

fn scripted_factory(answers: Arc<Mutex<HashMap<String, String>>>) -> EngineFactory {
    let pages = HashMap::from([("https://example.com/".to_string(), EXAMPLE_HTML.to_string())]);
    Arc::new(move |signal: LoadSignal| {
        let engine: Box<dyn Engine> = Box::new(ScriptedEngine {
            pages: pages.clone(),
            answers: answers.clone(),
            current: None,
            signal,
        });
        let ready: LocalBoxFuture<'static, Result<Box<dyn Engine>, EngineError>> =
            async move { Ok(engine) }.boxed_local();
        ready
    })
}

fn config() -> BrowserManagerConfig {
    BrowserManagerConfig {
        initial_page: None,
        script_timeout: Duration::from_secs(2),
        navigation_timeout: Duration::from_secs(2),
        load_grace: Duration::from_millis(20),
        ..BrowserManagerConfig::default()
    }
}

async fn call(catalog: &ToolCatalog, tool: &str, args: serde_json::Value) -> webnav_protocols::ToolResult {
    catalog
        .invoke(ToolInvocation::new(tool, args), ToolContext::new("it"))
        .await
}

#[tokio::test]
async fn test_visit_then_query_example_domain() {
    let answers = Arc::new(Mutex::new(HashMap::new()));
    answers.lock().insert(
        PageScript::Headings.render(),
        json!([{"level": 1, "text": "Example Domain"}]).to_string(),
    );
    answers.lock().insert(
        PageScript::Click {
            selector: "#nonexistent".into(),
        }
        .render(),
        json!({"notFound": true}).to_string(),
    );

    let visited = VisitedPages::new();
    let manager = Arc::new(BrowserManager::with_visited(
        config(),
        scripted_factory(answers),
        visited.clone(),
    ));
    let catalog = ToolCatalog::new();
    register_browser_tools(&catalog, manager.clone()).unwrap();

    let page = call(&catalog, "navigate", json!({"url": "https://example.com"})).await;
    assert!(page.success, "{:?}", page.error);
    assert!(page.content.contains("Example Domain"));
    assert!(page.content.contains("[More information...](https://www.iana.org/domains/example)"));
    assert!(!page.content.contains("console.log"));
    assert!(!page.content.contains("color: red"));
    assert_eq!(
        manager.current_url().await.map(|u| u.to_string()).as_deref(),
        Some("https://example.com/")
    );

    let headings = call(&catalog, "getPageHeadings", json!({})).await;
    assert_eq!(
        headings.structured_output.unwrap(),
        json!({"headings": [{"level": 1, "text": "Example Domain"}]})
    );

    let click = call(&catalog, "click", json!({"selector": "#nonexistent"})).await;
    assert_eq!(
        click.structured_output.unwrap(),
        json!({"success": false, "error": "Element not found: #nonexistent"})
    );

    assert_eq!(visited.len(), 1);
    manager.close_session().await;
    assert!(!manager.has_session().await);
}

#[tokio::test]
async fn test_unreachable_host_is_reported() {
    let manager = Arc::new(BrowserManager::new(
        config(),
        scripted_factory(Arc::new(Mutex::new(HashMap::new()))),
    ));
    let catalog = ToolCatalog::new();
    register_browser_tools(&catalog, manager.clone()).unwrap();

    let result = call(&catalog, "navigate", json!({"url": "https://unreachable.invalid"})).await;

    // The navigation is best-effort; the blank page is still read.
    assert!(result.success);
    assert_eq!(
        manager.current_url().await.map(|u| u.to_string()).as_deref(),
        Some("https://unreachable.invalid/")
    );
}

#[tokio::test]
async fn test_navigated_page_is_removed_from_history() {
    let visited = VisitedPages::new();
    let manager = Arc::new(BrowserManager::with_visited(
        config(),
        scripted_factory(Arc::new(Mutex::new(HashMap::new()))),
        visited.clone(),
    ));
    let catalog = ToolCatalog::new();
    register_browser_tools(&catalog, manager).unwrap();

    let page = call(&catalog, "navigate", json!({"url": "https://example.com/"})).await;
    let mut history = vec![
        HistoryEntry::user("What is example.com?"),
        HistoryEntry::from_tool_result(&page),
    ];
    assert!(history[1].is_page_fetch_result);
    assert!(history[1].text.contains("Example Domain"));
    assert!(!history[1].text.contains(PAGE_RESULT_MARKER));

    let context = ContextConfig {
        remove_old_pages: true,
        ..ContextConfig::default()
    };
    let mut context_manager = webnav_tools_browser::PageContextManager::new(&context, visited);
    let extra = context_manager.preprocess(&mut history).await;

    assert!(extra.is_empty());
    assert_eq!(history[1].text, REMOVED_PAGE_PLACEHOLDER);
    assert!(!history[1].is_page_fetch_result);
}

#[tokio::test]
#[ignore = "requires a local Chrome install"]
async fn test_chrome_example_domain() {
    let config = BrowserManagerConfig {
        debug_port: 9333,
        profile_dir: Some(std::env::temp_dir().join("webnav-test-profile")),
        headless: true,
        initial_page: None,
        navigation_timeout: Duration::from_secs(20),
        ..BrowserManagerConfig::default()
    };
    let manager = Arc::new(BrowserManager::new(config.clone(), cdp_engine_factory(config)));
    let catalog = ToolCatalog::new();
    register_browser_tools(&catalog, manager.clone()).unwrap();

    let page = call(&catalog, "navigate", json!({"url": "https://example.com"})).await;
    assert!(page.success, "{:?}", page.error);
    assert!(page.content.contains("Example Domain"));

    let info = call(&catalog, "getPageInfo", json!({})).await;
    assert_eq!(info.structured_output.unwrap()["title"], "Example Domain");

    let click = call(&catalog, "click", json!({"selector": "#nonexistent"})).await;
    assert_eq!(
        click.structured_output.unwrap()["error"],
        "Element not found: #nonexistent"
    );

    manager.close_session().await;
}
