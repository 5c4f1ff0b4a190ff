//! Interaction tools: click, fill, submit, scroll, custom script.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use webnav_protocols::{RiskLevel, Tool, ToolContext, ToolDefinition, ToolError, ToolResult};

use crate::bridge::ScriptError;
use crate::manager::BrowserManager;
use crate::scripts::{PageScript, ScrollDirection};

use super::{default_scroll_amount, definition, failure, parse_params, report};

// ============================================================================
// Click Tool
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ClickParams {
    pub selector: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickOutcome {
    pub success: bool,
    pub clicked_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub text: String,
}

/// Click an element by CSS selector.
pub struct ClickTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl ClickTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "click",
                "Click",
                "Click an element on the page using a CSS selector",
                json!({
                    "selector": {"type": "string", "description": "CSS selector of the element"}
                }),
                &["selector"],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for ClickTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: ClickParams = parse_params(params)?;
        let script = PageScript::Click {
            selector: params.selector,
        };
        Ok(report(self.manager.query::<ClickOutcome>(&script).await))
    }
}

// ============================================================================
// Fill Input Tool
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FillInputParams {
    pub selector: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillOutcome {
    pub success: bool,
    pub field_tag: String,
    pub name: String,
}

/// Set the value of an input field.
pub struct FillInputTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl FillInputTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "fillInput",
                "Fill Input",
                "Fill an input field with a value",
                json!({
                    "selector": {"type": "string", "description": "CSS selector of the field"},
                    "value": {"type": "string", "description": "Value to enter"}
                }),
                &["selector", "value"],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for FillInputTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: FillInputParams = parse_params(params)?;
        let script = PageScript::FillInput {
            selector: params.selector,
            value: params.value,
        };
        Ok(report(self.manager.query::<FillOutcome>(&script).await))
    }
}

// ============================================================================
// Submit Form Tool
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitFormParams {
    pub selector: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Submit a form, or the form enclosing the selected element.
pub struct SubmitFormTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl SubmitFormTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "submitForm",
                "Submit Form",
                "Submit a form selected by CSS selector (or the form containing the element)",
                json!({
                    "selector": {"type": "string", "description": "CSS selector of the form or an element inside it"}
                }),
                &["selector"],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for SubmitFormTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: SubmitFormParams = parse_params(params)?;
        let script = PageScript::SubmitForm {
            selector: params.selector,
        };
        let outcome = match self.manager.run(&script).await {
            Ok(_) => Ok(SubmitOutcome {
                success: true,
                note: None,
            }),
            // The submit navigated away before the result could be read.
            Err(e @ (ScriptError::EngineError(_) | ScriptError::MalformedResult)) => {
                warn!("Form submitted, result unavailable: {}", e);
                Ok(SubmitOutcome {
                    success: true,
                    note: Some("Form submitted; the page changed before the result was read".into()),
                })
            }
            Err(e) => Err(e),
        };
        Ok(report(outcome))
    }
}

// ============================================================================
// Scroll Page Tool
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ScrollPageParams {
    pub direction: ScrollDirection,
    #[serde(default = "default_scroll_amount")]
    pub amount: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollOutcome {
    pub success: bool,
    pub scroll_position: i64,
    pub page_height: i64,
    pub viewport_height: i64,
}

/// Scroll the page.
pub struct ScrollPageTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl ScrollPageTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "scrollPage",
                "Scroll Page",
                "Scroll the page up, down, to the top or to the bottom",
                json!({
                    "direction": {"type": "string", "enum": ["up", "down", "top", "bottom"]},
                    "amount": {"type": "integer", "description": "Pixels for up/down", "default": 500}
                }),
                &["direction"],
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for ScrollPageTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: ScrollPageParams = parse_params(params)?;
        let script = PageScript::Scroll {
            direction: params.direction,
            amount: params.amount,
        };
        Ok(report(self.manager.query::<ScrollOutcome>(&script).await))
    }
}

// ============================================================================
// Execute Custom Script Tool
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ExecuteCustomScriptParams {
    #[serde(alias = "scriptText")]
    pub script: String,
}

/// Run arbitrary JavaScript in the page and return its raw result.
pub struct ExecuteCustomScriptTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl ExecuteCustomScriptTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: definition(
                "executeCustomScript",
                "Execute Custom Script",
                "Execute JavaScript in the page and return the raw result",
                json!({
                    "script": {"type": "string", "description": "JavaScript expression to evaluate"}
                }),
                &["script"],
            )
            .with_risk_level(RiskLevel::High),
            manager,
        }
    }
}

#[async_trait]
impl Tool for ExecuteCustomScriptTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: ExecuteCustomScriptParams = parse_params(params)?;
        debug!("Executing custom script ({} chars)", params.script.len());

        match self.manager.execute_raw(&params.script).await {
            Ok(raw) => {
                let output = json!({ "success": true, "result": raw });
                Ok(ToolResult::success_json(raw, output))
            }
            Err(e) => Ok(failure(e.to_string())),
        }
    }
}
