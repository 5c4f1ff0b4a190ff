//! Tool catalog: registry and dispatch for the page-interaction tools.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{Instrument, debug, info_span, warn};

use webnav_protocols::{
    ExtensionError, Tool, ToolContext, ToolDefinition, ToolError, ToolRegistryAccess, ToolResult,
};

use crate::manager::BrowserManager;

use super::*;

/// One tool call from the agent runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    pub tool_name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolInvocation {
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// Registry of tools keyed by id.
pub struct ToolCatalog {
    tools: DashMap<String, Arc<dyn Tool>>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: DashMap::new(),
        }
    }

    /// Register a tool. Fails if the id is taken.
    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), ExtensionError> {
        let id = tool.definition().id.clone();
        if self.tools.contains_key(&id) {
            return Err(ExtensionError::AlreadyRegistered(id));
        }
        self.tools.insert(id, tool);
        Ok(())
    }

    pub fn unregister(&self, id: &str) -> Result<(), ExtensionError> {
        self.tools
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ExtensionError::NotRegistered(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(id).map(|entry| entry.value().clone())
    }

    /// Tool definitions, sorted by id.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .iter()
            .map(|entry| entry.value().definition().clone())
            .collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        definitions
    }

    /// Definitions in OpenAI function-calling format.
    pub fn openai_functions(&self) -> Vec<Value> {
        self.definitions()
            .iter()
            .map(ToolDefinition::to_openai_function)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch an invocation to exactly one tool. Never fails: unknown
    /// tools, cancelled contexts and tool errors come back as failed results.
    pub async fn invoke(&self, invocation: ToolInvocation, ctx: ToolContext) -> ToolResult {
        let span = info_span!(
            "tool",
            name = %invocation.tool_name,
            session = %ctx.session_id,
            correlation_id = %ctx.correlation_id,
        );
        self.dispatch(invocation, ctx).instrument(span).await
    }

    async fn dispatch(&self, invocation: ToolInvocation, ctx: ToolContext) -> ToolResult {
        let Some(tool) = self.get(&invocation.tool_name) else {
            let err = ToolError::NotFound(invocation.tool_name);
            warn!("{}", err);
            return failure(err.to_string());
        };
        if ctx.is_aborted() {
            return failure(ToolError::Cancelled.to_string());
        }

        let arguments = match invocation.arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        if let Err(e) = tool.validate(&arguments) {
            return failure(e.to_string());
        }

        debug!("Invoking tool {}", invocation.tool_name);
        match tool.execute(arguments, ctx).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Tool {} failed: {}", invocation.tool_name, e);
                failure(e.to_string())
            }
        }
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistryAccess for ToolCatalog {
    fn register_tool(&self, tool: Arc<dyn Tool>) -> Result<(), ExtensionError> {
        self.register(tool)
    }

    fn unregister_tool(&self, tool_id: &str) -> Result<(), ExtensionError> {
        self.unregister(tool_id)
    }
}

/// Every page-interaction tool, bound to `manager`.
pub fn browser_tools(manager: Arc<BrowserManager>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(NavigateTool::new(manager.clone())),
        Arc::new(ClickTool::new(manager.clone())),
        Arc::new(FillInputTool::new(manager.clone())),
        Arc::new(SubmitFormTool::new(manager.clone())),
        Arc::new(ScrollPageTool::new(manager.clone())),
        Arc::new(GetPageTextTool::new(manager.clone())),
        Arc::new(GetPageLinksTool::new(manager.clone())),
        Arc::new(GetPageHeadingsTool::new(manager.clone())),
        Arc::new(GetPageOutlineTool::new(manager.clone())),
        Arc::new(GetInteractiveElementsTool::new(manager.clone())),
        Arc::new(GetMainContentTool::new(manager.clone())),
        Arc::new(SearchPageTextTool::new(manager.clone())),
        Arc::new(GetTablesTool::new(manager.clone())),
        Arc::new(GetImagesTool::new(manager.clone())),
        Arc::new(GetPageInfoTool::new(manager.clone())),
        Arc::new(ExecuteCustomScriptTool::new(manager)),
    ]
}

/// Register every page-interaction tool into `registry`.
pub fn register_browser_tools(
    registry: &dyn ToolRegistryAccess,
    manager: Arc<BrowserManager>,
) -> Result<(), ExtensionError> {
    for tool in browser_tools(manager) {
        registry.register_tool(tool)?;
    }
    Ok(())
}
