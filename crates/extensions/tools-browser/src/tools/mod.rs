//! Page-interaction tools.
//!
//! Every tool reports instead of raising: script failures come back as a
//! failed [`ToolResult`] carrying `{"success": false, "error": ...}`.

mod catalog;
mod content;
mod interaction;
mod navigation;
mod page;
pub mod shaping;

pub use catalog::{ToolCatalog, ToolInvocation, browser_tools, register_browser_tools};
pub use content::*;
pub use interaction::*;
pub use navigation::*;
pub use page::*;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use webnav_protocols::{ToolDefinition, ToolError, ToolResult};

use crate::bridge::ScriptError;
use crate::extension::EXTENSION_ID;

// Shared default value helpers used by multiple submodules.

pub(crate) fn default_max_chars() -> usize {
    2000
}

pub(crate) fn default_max_links() -> usize {
    30
}

pub(crate) fn default_max_images() -> usize {
    20
}

pub(crate) fn default_scroll_amount() -> u32 {
    500
}

/// Build a tool definition with an object parameter schema.
pub(crate) fn definition(
    id: &str,
    name: &str,
    description: &str,
    properties: Value,
    required: &[&str],
) -> ToolDefinition {
    ToolDefinition::new(id, name, description)
        .with_parameters_schema(json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }))
        .with_extension_id(EXTENSION_ID)
}

/// Deserialize tool parameters. Missing parameters read as `{}`.
pub(crate) fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, ToolError> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

/// Report a script outcome as a tool result.
pub(crate) fn report<T: Serialize>(outcome: Result<T, ScriptError>) -> ToolResult {
    let value = outcome.and_then(|v| serde_json::to_value(v).map_err(|_| ScriptError::MalformedResult));
    match value {
        Ok(value) => ToolResult::success_json(value.to_string(), value),
        Err(e) => failure(e.to_string()),
    }
}

/// A failed tool result with a structured `error` field.
pub(crate) fn failure(message: impl Into<String>) -> ToolResult {
    let message = message.into();
    ToolResult::failure_json(message.clone(), json!({ "success": false, "error": message }))
}
