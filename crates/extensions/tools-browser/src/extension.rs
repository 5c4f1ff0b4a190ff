//! Web navigator extension.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use webnav_config::{BrowserConfig, ContextConfig};
use webnav_protocols::extension::{AdditionalPrompt, ExtensionSetting, Provides};
use webnav_protocols::{
    Extension, ExtensionContext, ExtensionError, ExtensionManifest, PAGE_RESULT_MARKER, Version,
};

use crate::cdp::cdp_engine_factory;
use crate::context::{PageContextManager, VisitedPages};
use crate::engine::EngineFactory;
use crate::manager::{BrowserManager, BrowserManagerConfig};
use crate::tools::register_browser_tools;

pub const EXTENSION_ID: &str = "webnavigator";

/// Codeblock language that opens the browser.
pub const OPEN_BROWSER_LANG: &str = "web";

/// Codeblock language whose body is a link to open and read.
pub const OPEN_LINK_LANG: &str = "website";

const RELIABLE_PROMPT: &str = "\
You are a skilled expert web scraper.
You are able find a lot of hidden information, hidden but reliable.
You can't deliver unreliable information.
Don't use knowledge not in the page to answer the question.

You are given the content of a webpage.
Stick your research field to the links you find in the page.
You are able to navigate all the pertinent links in the page.
If a link to explore further is available, show it.

If you can't find the answer in the current page, visit another one.
";

/// Web navigator extension.
///
/// Hosts the page-interaction tools and answers the `web` / `website`
/// codeblocks. The browser engine is started lazily on first use.
pub struct WebNavigatorExtension {
    manifest: ExtensionManifest,
    config: BrowserManagerConfig,
    factory: Option<EngineFactory>,
    visited: VisitedPages,
    manager: Option<Arc<BrowserManager>>,
    opening: Mutex<Option<JoinHandle<()>>>,
}

impl WebNavigatorExtension {
    pub fn new() -> Self {
        Self::with_config(BrowserManagerConfig::default())
    }

    pub fn from_browser_config(config: &BrowserConfig) -> Self {
        Self::with_config(BrowserManagerConfig::from(config))
    }

    pub fn with_config(config: BrowserManagerConfig) -> Self {
        let mut manifest = ExtensionManifest::new(EXTENSION_ID, "Web Navigator", Version::new(0, 1, 0))
            .with_description("Drive a web browser: navigate, interact with pages and read their content");
        manifest.provides = Provides {
            tools: tool_ids(),
            codeblock_langs: vec![OPEN_BROWSER_LANG.to_string(), OPEN_LINK_LANG.to_string()],
        };
        manifest.settings = vec![ExtensionSetting {
            key: "headless".to_string(),
            title: "Headless Mode".to_string(),
            description: "Run in headless mode - don't show browser window".to_string(),
            default: serde_json::Value::Bool(config.headless),
        }];

        Self {
            manifest,
            config,
            factory: None,
            visited: VisitedPages::new(),
            manager: None,
            opening: Mutex::new(None),
        }
    }

    /// Use a custom engine instead of Chrome over CDP.
    pub fn with_engine_factory(mut self, factory: EngineFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Enable headless mode.
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Get the browser manager. `None` until initialized.
    pub fn manager(&self) -> Option<Arc<BrowserManager>> {
        self.manager.clone()
    }

    pub fn visited(&self) -> &VisitedPages {
        &self.visited
    }

    /// A context manager over this extension's visited pages.
    pub fn context_manager(&self, config: &ContextConfig) -> PageContextManager {
        PageContextManager::new(config, self.visited.clone())
    }

    async fn open_link(&self, link: &str) -> String {
        let Some(manager) = &self.manager else {
            return "Web navigator is not initialized".to_string();
        };
        match manager.visit(link).await {
            Ok(page) => format!("{}{}", PAGE_RESULT_MARKER, page.content),
            Err(e) => {
                warn!("Failed to open {}: {}", link, e);
                format!("Failed to open {}: {}", link, e)
            }
        }
    }

    /// Start the browser session in the background.
    fn open_browser(&self) {
        let Some(manager) = self.manager.clone() else {
            return;
        };
        let mut opening = self.opening.lock();
        if opening.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }
        *opening = Some(tokio::spawn(async move {
            if let Err(e) = manager.ensure_session().await {
                warn!("Failed to open browser: {}", e);
            }
        }));
    }

    /// Wait for a background browser start, if one is in flight.
    pub async fn browser_opened(&self) {
        let task = self.opening.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Browser start task ended abnormally: {}", e);
            }
        }
    }
}

impl Default for WebNavigatorExtension {
    fn default() -> Self {
        Self::new()
    }
}

fn tool_ids() -> Vec<String> {
    [
        "navigate",
        "click",
        "fillInput",
        "submitForm",
        "scrollPage",
        "getPageText",
        "getPageLinks",
        "getPageHeadings",
        "getPageOutline",
        "getInteractiveElements",
        "getMainContent",
        "searchPageText",
        "getTables",
        "getImages",
        "getPageInfo",
        "executeCustomScript",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn prompt(key: &str, title: &str, description: &str, text: &str) -> AdditionalPrompt {
    AdditionalPrompt {
        key: key.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        editable: true,
        default: true,
        text: text.to_string(),
    }
}

#[async_trait]
impl Extension for WebNavigatorExtension {
    fn manifest(&self) -> &ExtensionManifest {
        &self.manifest
    }

    async fn initialize(&mut self, ctx: ExtensionContext) -> Result<(), ExtensionError> {
        if let Some(headless) = ctx.get_config::<bool>("headless") {
            self.config.headless = headless;
        }

        // The engine is not started here; the first tool call starts it.
        let factory = self
            .factory
            .clone()
            .unwrap_or_else(|| cdp_engine_factory(self.config.clone()));
        let manager = Arc::new(BrowserManager::with_visited(
            self.config.clone(),
            factory,
            self.visited.clone(),
        ));

        register_browser_tools(ctx.tool_registry.as_ref(), manager.clone())?;
        self.manager = Some(manager);

        info!(
            "Web navigator initialized with {} tools (headless: {})",
            self.manifest.provides.tools.len(),
            self.config.headless
        );
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ExtensionError> {
        self.browser_opened().await;
        if let Some(manager) = &self.manager {
            manager.close_session().await;
        }
        Ok(())
    }

    fn additional_prompts(&self) -> Vec<AdditionalPrompt> {
        vec![
            prompt(
                "open_browser",
                "Open Web Browser",
                "Open web browser",
                "Use \n```web\nopen\n```\n to open a web browser",
            ),
            prompt(
                "open_link",
                "Open Link",
                "Open a link from the given page",
                "Use \n```website\nlink\n```\n to open a website at the given link. \
                 When opening a website, don't write anything else.",
            ),
            prompt(
                "information_reliability_prompt",
                "Enforce the LLM to provide reliable information",
                "Enforce the LLM to provide reliable information, supposed to be used with web navigator.",
                RELIABLE_PROMPT,
            ),
        ]
    }

    fn codeblock_langs(&self) -> Vec<String> {
        self.manifest.provides.codeblock_langs.clone()
    }

    async fn answer_codeblock(&self, code: &str, lang: &str) -> Option<String> {
        match lang {
            OPEN_LINK_LANG => Some(self.open_link(code.trim()).await),
            OPEN_BROWSER_LANG => {
                self.open_browser();
                None
            }
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "extension_tests.rs"]
mod tests;
