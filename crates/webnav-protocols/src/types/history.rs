//! Conversation history entries.
//!
//! History is owned by the chat runtime; webnav only rewrites the text of
//! entries that carry a fetched page. On the wire such entries are tagged by
//! the [`PAGE_RESULT_MARKER`] prefix, which must survive a round-trip so
//! replayed conversations keep working.

use serde::{Deserialize, Serialize};

use crate::tool::ToolResult;

/// Wire marker tagging a history entry as a fetched-page result.
pub const PAGE_RESULT_MARKER: &str = "Webnav Result: ";

/// Tool-result metadata key flagging fetched-page content.
pub const PAGE_FETCH_RESULT_KEY: &str = "page_fetch_result";

/// Role of a history entry's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    /// Output produced by a tool or codeblock on the assistant's behalf.
    Console,
}

/// One message in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,

    /// Message text, without the page-result marker.
    pub text: String,

    /// Whether this entry holds the content of a fetched page.
    #[serde(default)]
    pub is_page_fetch_result: bool,
}

impl HistoryEntry {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            is_page_fetch_result: false,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, text)
    }

    /// An entry holding the cleaned content of a fetched page.
    pub fn page_fetch_result(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Console,
            text: content.into(),
            is_page_fetch_result: true,
        }
    }

    /// Parse an entry from its wire text, detecting the page-result marker.
    pub fn from_wire(role: MessageRole, wire_text: &str) -> Self {
        match wire_text.find(PAGE_RESULT_MARKER) {
            Some(pos) => {
                let mut text = String::with_capacity(wire_text.len());
                text.push_str(&wire_text[..pos]);
                text.push_str(&wire_text[pos + PAGE_RESULT_MARKER.len()..]);
                Self {
                    role,
                    text,
                    is_page_fetch_result: true,
                }
            }
            None => Self::new(role, wire_text),
        }
    }

    /// The history entry recording a tool's output.
    ///
    /// Tagged as a fetched page when the content carries the marker or the
    /// result's metadata sets [`PAGE_FETCH_RESULT_KEY`].
    pub fn from_tool_result(result: &ToolResult) -> Self {
        let text = if result.success {
            result.content.as_str()
        } else {
            result.error.as_deref().unwrap_or_default()
        };
        let mut entry = Self::from_wire(MessageRole::Console, text);
        if result.success
            && result
                .metadata
                .get(PAGE_FETCH_RESULT_KEY)
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
        {
            entry.is_page_fetch_result = true;
        }
        entry
    }

    /// Render the entry back to wire text.
    pub fn to_wire(&self) -> String {
        if self.is_page_fetch_result {
            format!("{}{}", PAGE_RESULT_MARKER, self.text)
        } else {
            self.text.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_fetch_result_wire_round_trip() {
        let entry = HistoryEntry::page_fetch_result("# Example\n\n## Links\n");
        let wire = entry.to_wire();
        assert!(wire.starts_with(PAGE_RESULT_MARKER));

        let parsed = HistoryEntry::from_wire(MessageRole::Console, &wire);
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_marker_anywhere_in_text_tags_entry() {
        let parsed = HistoryEntry::from_wire(MessageRole::Console, "```website\nx\n```\nWebnav Result: body");
        assert!(parsed.is_page_fetch_result);
        assert_eq!(parsed.text, "```website\nx\n```\nbody");
    }

    #[test]
    fn test_plain_text_is_not_tagged() {
        let parsed = HistoryEntry::from_wire(MessageRole::User, "What is on example.com?");
        assert!(!parsed.is_page_fetch_result);
        assert_eq!(parsed.to_wire(), "What is on example.com?");
    }

    #[test]
    fn test_tool_result_with_marker_is_tagged() {
        let result = ToolResult::success(format!("{}Example Domain", PAGE_RESULT_MARKER));
        let entry = HistoryEntry::from_tool_result(&result);
        assert!(entry.is_page_fetch_result);
        assert_eq!(entry.role, MessageRole::Console);
        assert_eq!(entry.text, "Example Domain");
    }

    #[test]
    fn test_tool_result_metadata_flag_tags_entry() {
        let result = ToolResult::success("Example Domain")
            .with_metadata(PAGE_FETCH_RESULT_KEY, serde_json::json!(true));
        let entry = HistoryEntry::from_tool_result(&result);
        assert!(entry.is_page_fetch_result);
        assert_eq!(entry.to_wire(), "Webnav Result: Example Domain");
    }

    #[test]
    fn test_failed_tool_result_is_not_tagged() {
        let result = ToolResult::error("Element not found: #x")
            .with_metadata(PAGE_FETCH_RESULT_KEY, serde_json::json!(true));
        let entry = HistoryEntry::from_tool_result(&result);
        assert!(!entry.is_page_fetch_result);
        assert_eq!(entry.text, "Element not found: #x");
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&MessageRole::Console).unwrap();
        assert_eq!(json, "\"console\"");
    }
}
