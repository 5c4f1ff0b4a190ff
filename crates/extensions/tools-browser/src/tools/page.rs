//! Page structure tools: links, headings, outline, interactive elements, info.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use webnav_protocols::{Tool, ToolContext, ToolDefinition, ToolError, ToolResult};

use crate::manager::BrowserManager;
use crate::scripts::PageScript;

use super::shaping::{self, RawInteractive, RawLink};
use super::{default_max_links, definition, parse_params, report};

// ============================================================================
// Get Page Links Tool
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPageLinksParams {
    #[serde(default = "default_max_links")]
    pub max_links: usize,
}

/// Navigational links on the page, de-duplicated.
pub struct GetPageLinksTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl GetPageLinksTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "getPageLinks",
                "Get Page Links",
                "List the navigational links on the page",
                json!({
                    "maxLinks": {"type": "integer", "description": "Maximum links to return", "default": 30}
                }),
                &[],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for GetPageLinksTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: GetPageLinksParams = parse_params(params)?;
        let outcome = self
            .manager
            .query::<Vec<RawLink>>(&PageScript::Links)
            .await
            .map(|links| shaping::shape_links(links, params.max_links));
        Ok(report(outcome))
    }
}

// ============================================================================
// Get Page Headings Tool
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct HeadingList {
    pub headings: Vec<Heading>,
}

/// Headings h1 to h6 in document order.
pub struct GetPageHeadingsTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl GetPageHeadingsTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "getPageHeadings",
                "Get Page Headings",
                "List the page headings (h1-h6) in document order",
                json!({}),
                &[],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for GetPageHeadingsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let outcome = self
            .manager
            .query::<Vec<Heading>>(&PageScript::Headings)
            .await
            .map(|headings| HeadingList { headings });
        Ok(report(outcome))
    }
}

// ============================================================================
// Get Page Outline Tool
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCounts {
    pub headings: u32,
    pub paragraphs: u32,
    pub links: u32,
    pub images: u32,
    pub forms: u32,
    pub inputs: u32,
    pub buttons: u32,
    pub tables: u32,
    pub lists: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOutline {
    pub title: String,
    pub has_nav: bool,
    pub has_search: bool,
    pub has_main: bool,
    pub has_sidebar: bool,
    pub has_footer: bool,
    pub counts: ElementCounts,
    pub first_heading: Option<String>,
}

/// Structural summary of the page.
pub struct GetPageOutlineTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl GetPageOutlineTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "getPageOutline",
                "Get Page Outline",
                "Summarize the page structure: regions present, element counts, first heading",
                json!({}),
                &[],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for GetPageOutlineTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        Ok(report(self.manager.query::<PageOutline>(&PageScript::Outline).await))
    }
}

// ============================================================================
// Get Interactive Elements Tool
// ============================================================================

/// Buttons, input fields and forms on the page.
pub struct GetInteractiveElementsTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl GetInteractiveElementsTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "getInteractiveElements",
                "Get Interactive Elements",
                "List buttons, input fields (with labels) and forms on the page",
                json!({}),
                &[],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for GetInteractiveElementsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let outcome = self
            .manager
            .query::<RawInteractive>(&PageScript::InteractiveElements)
            .await
            .map(shaping::shape_interactive);
        Ok(report(outcome))
    }
}

// ============================================================================
// Get Page Info Tool
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub canonical: Option<String>,
    pub language: Option<String>,
    pub charset: Option<String>,
    pub viewport: Option<String>,
}

/// Page metadata.
pub struct GetPageInfoTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl GetPageInfoTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "getPageInfo",
                "Get Page Info",
                "Get page metadata: URL, title, description, keywords, canonical link, language",
                json!({}),
                &[],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for GetPageInfoTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        Ok(report(self.manager.query::<PageInfo>(&PageScript::PageInfo).await))
    }
}
