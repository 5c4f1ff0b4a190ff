//! Extension trait definition.

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

use super::{AdditionalPrompt, ExtensionContext, ExtensionManifest};
use crate::error::ExtensionError;

/// Core trait for all extensions.
///
/// Every extension must implement this trait. It provides:
/// - Metadata about the extension (via manifest)
/// - Lifecycle hooks (initialize, shutdown)
/// - Prompt fragments and codeblock handlers for the chat runtime
#[async_trait]
pub trait Extension: Send + Sync + 'static {
    /// Returns the extension manifest.
    fn manifest(&self) -> &ExtensionManifest;

    /// Initialize the extension with the given context.
    async fn initialize(&mut self, ctx: ExtensionContext) -> Result<(), ExtensionError>;

    /// Shutdown the extension.
    async fn shutdown(&self) -> Result<(), ExtensionError> {
        Ok(())
    }

    /// Prompt fragments the runtime may append to the system prompt.
    fn additional_prompts(&self) -> Vec<AdditionalPrompt> {
        Vec::new()
    }

    /// Codeblock languages this extension answers for.
    fn codeblock_langs(&self) -> Vec<String> {
        Vec::new()
    }

    /// Answer a codeblock emitted by the model. `None` means "no text answer".
    async fn answer_codeblock(&self, _code: &str, _lang: &str) -> Option<String> {
        None
    }

    /// Returns a reference to the extension as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to the extension as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Trait for accessing the tool registry from extensions.
pub trait ToolRegistryAccess: Send + Sync {
    /// Register a tool.
    fn register_tool(&self, tool: Arc<dyn crate::tool::Tool>) -> Result<(), ExtensionError>;

    /// Unregister a tool.
    fn unregister_tool(&self, tool_id: &str) -> Result<(), ExtensionError>;
}
