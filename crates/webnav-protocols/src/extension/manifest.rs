//! Extension manifest types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Metadata, Version};

/// Extension manifest containing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionManifest {
    pub id: String,
    pub name: String,
    pub version: Version,
    pub description: String,
    #[serde(default)]
    pub provides: Provides,
    #[serde(default)]
    pub settings: Vec<ExtensionSetting>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl ExtensionManifest {
    /// Create a new extension manifest.
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version,
            description: String::new(),
            provides: Provides::default(),
            settings: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// What an extension provides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provides {
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub codeblock_langs: Vec<String>,
}

/// A user-facing toggle exposed by an extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionSetting {
    pub key: String,
    pub title: String,
    pub description: String,
    pub default: serde_json::Value,
}

/// A prompt fragment an extension contributes to the system prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalPrompt {
    pub key: String,
    pub title: String,
    pub description: String,
    /// Whether the user may edit the text.
    pub editable: bool,
    /// Whether the prompt is enabled by default.
    pub default: bool,
    pub text: String,
}
