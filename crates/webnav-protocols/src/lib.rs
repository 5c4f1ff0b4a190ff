//! # Webnav Protocols
//!
//! Core protocol definitions (traits) for webnav.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`Extension`] - Base trait for extensions hosting tools
//! - [`Tool`] - Trait for tool implementations
//! - [`RetrievalService`] / [`RetrievalIndex`] - Semantic lookup over visited pages
//! - [`TextGenerator`] - Secondary text generation used for page summaries

pub mod error;
pub mod extension;
pub mod generation;
pub mod retrieval;
pub mod tool;
pub mod types;

// Re-export core traits
pub use error::{ExtensionError, GenerationError, RetrievalError, ToolError};
pub use extension::{Extension, ExtensionContext, ExtensionManifest, ToolRegistryAccess};
pub use generation::{PromptOverrides, TextGenerator};
pub use retrieval::{RetrievalIndex, RetrievalService};
pub use tool::{Tool, ToolContext, ToolDefinition, ToolResult};
pub use types::*;
