//! Navigation tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use webnav_protocols::{
    PAGE_FETCH_RESULT_KEY, PAGE_RESULT_MARKER, Tool, ToolContext, ToolDefinition, ToolError,
    ToolResult,
};

use crate::manager::BrowserManager;

use super::{definition, failure, parse_params};

// ============================================================================
// Navigate Tool
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NavigateParams {
    pub url: String,
}

/// Navigate to a URL (absolute, or relative to the current page) and return
/// the cleaned page content, tagged as a fetched page for history rewriting.
pub struct NavigateTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl NavigateTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "navigate",
                "Navigate",
                "Navigate the browser to a URL and return the page content. \
                 Relative URLs resolve against the current page.",
                json!({
                    "url": {"type": "string", "description": "Absolute or relative URL"}
                }),
                &["url"],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for NavigateTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: NavigateParams = parse_params(params)?;

        match self.manager.visit(&params.url).await {
            Ok(page) => {
                debug!("Navigated to {}", page.url);
                let output = json!({ "url": page.url.as_str(), "content": page.content });
                let tagged = format!("{}{}", PAGE_RESULT_MARKER, page.content);
                Ok(ToolResult::success_json(tagged, output)
                    .with_metadata(PAGE_FETCH_RESULT_KEY, json!(true)))
            }
            Err(e) => Ok(failure(e.to_string())),
        }
    }
}
