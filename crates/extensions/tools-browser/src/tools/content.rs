//! Content extraction tools: page text, main content, search, tables, images.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use webnav_protocols::{Tool, ToolContext, ToolDefinition, ToolError, ToolResult};

use crate::content::condense;
use crate::manager::BrowserManager;
use crate::scripts::PageScript;

use super::shaping::{self, Image, Table};
use super::{default_max_chars, default_max_images, definition, failure, parse_params, report};

#[derive(Debug, Deserialize)]
struct PageTextResult {
    text: String,
}

fn max_chars_schema() -> serde_json::Value {
    json!({
        "maxChars": {"type": "integer", "description": "Maximum characters to return", "default": 2000}
    })
}

// ============================================================================
// Get Page Text Tool
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPageTextParams {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

/// Visible text of the page body, truncated to `maxChars`.
pub struct GetPageTextTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl GetPageTextTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "getPageText",
                "Get Page Text",
                "Get the visible text of the current page",
                max_chars_schema(),
                &[],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for GetPageTextTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: GetPageTextParams = parse_params(params)?;
        let outcome = self
            .manager
            .query::<PageTextResult>(&PageScript::PageText)
            .await
            .map(|page| shaping::truncate(&page.text, params.max_chars));
        Ok(report(outcome))
    }
}

// ============================================================================
// Get Main Content Tool
// ============================================================================

#[derive(Debug, Deserialize)]
struct MainContentResult {
    selector: Option<String>,
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MainContent {
    /// Candidate that matched; `None` means the whole body was used.
    pub selector: Option<String>,
    #[serde(flatten)]
    pub content: shaping::TruncatedText,
}

/// Text of the page's main content region.
pub struct GetMainContentTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl GetMainContentTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "getMainContent",
                "Get Main Content",
                "Get the text of the main content area, skipping navigation and sidebars",
                max_chars_schema(),
                &[],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for GetMainContentTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: GetPageTextParams = parse_params(params)?;
        let outcome = self
            .manager
            .query::<MainContentResult>(&PageScript::MainContent)
            .await
            .map(|main| MainContent {
                selector: main.selector,
                content: shaping::truncate(&condense(&main.text), params.max_chars),
            });
        Ok(report(outcome))
    }
}

// ============================================================================
// Search Page Text Tool
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchPageTextParams {
    pub query: String,
}

/// Case-insensitive search over the page text.
pub struct SearchPageTextTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl SearchPageTextTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "searchPageText",
                "Search Page Text",
                "Find occurrences of text on the page with surrounding context",
                json!({
                    "query": {"type": "string", "description": "Text to search for"}
                }),
                &["query"],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for SearchPageTextTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: SearchPageTextParams = parse_params(params)?;
        if params.query.is_empty() {
            return Ok(failure("Search query must not be empty"));
        }
        let outcome = self
            .manager
            .query::<PageTextResult>(&PageScript::PageText)
            .await
            .map(|page| shaping::search(&page.text, &params.query));
        Ok(report(outcome))
    }
}

// ============================================================================
// Get Tables Tool
// ============================================================================

/// Tables on the page with headers and capped rows.
pub struct GetTablesTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl GetTablesTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "getTables",
                "Get Tables",
                "Extract tables from the page (up to 5 tables, 20 rows each)",
                json!({}),
                &[],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for GetTablesTool {
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
            .query::<Vec<Table>>(&PageScript::Tables)
            .await
            .map(shaping::shape_tables);
        Ok(report(outcome))
    }
}

// ============================================================================
// Get Images Tool
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetImagesParams {
    #[serde(default = "default_max_images")]
    pub max_images: usize,
}

/// Images on the page.
pub struct GetImagesTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl GetImagesTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "getImages",
                "Get Images",
                "List images on the page with source, alt text and size",
                json!({
                    "maxImages": {"type": "integer", "description": "Maximum images to return", "default": 20}
                }),
                &[],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for GetImagesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: GetImagesParams = parse_params(params)?;
        let outcome = self
            .manager
            .query::<Vec<Image>>(&PageScript::Images)
            .await
            .map(|images| shaping::shape_images(images, params.max_images));
        Ok(report(outcome))
    }
}
