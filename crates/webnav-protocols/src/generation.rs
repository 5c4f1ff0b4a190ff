//! Secondary text generation protocol.
//!
//! Used only to summarize page content that is leaving the history.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::GenerationError;
use crate::types::HistoryEntry;

/// Prompt overrides keyed by prompt name.
pub type PromptOverrides = HashMap<String, String>;

/// A secondary, non-conversational text generator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply to `text` given `history` and prompt overrides.
    async fn generate(
        &self,
        text: &str,
        history: &[HistoryEntry],
        prompt_overrides: &PromptOverrides,
    ) -> Result<String, GenerationError>;
}
