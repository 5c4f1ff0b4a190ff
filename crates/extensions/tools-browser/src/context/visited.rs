//! Store of pages visited during the conversation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

/// Cleaned content of one visited page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitedPage {
    pub url: String,
    pub cleaned_content: String,
    pub fetched_at: DateTime<Utc>,
}

/// Visited pages keyed by absolute URL. Revisiting a URL overwrites its
/// content.
#[derive(Clone, Default)]
pub struct VisitedPages {
    pages: Arc<RwLock<HashMap<String, VisitedPage>>>,
}

impl VisitedPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, url: impl Into<String>, cleaned_content: impl Into<String>) -> VisitedPage {
        let page = VisitedPage {
            url: url.into(),
            cleaned_content: cleaned_content.into(),
            fetched_at: Utc::now(),
        };
        self.pages.write().insert(page.url.clone(), page.clone());
        page
    }

    pub fn get(&self, url: &str) -> Option<VisitedPage> {
        self.pages.read().get(url).cloned()
    }

    /// Stored contents, oldest fetch first.
    pub fn contents(&self) -> Vec<String> {
        let mut pages: Vec<VisitedPage> = self.pages.read().values().cloned().collect();
        pages.sort_by(|a, b| a.fetched_at.cmp(&b.fetched_at).then_with(|| a.url.cmp(&b.url)));
        pages.into_iter().map(|page| page.cleaned_content).collect()
    }

    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.read().is_empty()
    }

    pub fn clear(&self) {
        self.pages.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let pages = VisitedPages::new();
        pages.record("https://a.com/", "A content");
        let page = pages.get("https://a.com/").unwrap();
        assert_eq!(page.cleaned_content, "A content");
        assert!(pages.get("https://b.com/").is_none());
    }

    #[test]
    fn test_revisit_overwrites() {
        let pages = VisitedPages::new();
        pages.record("https://a.com/", "old");
        pages.record("https://a.com/", "new");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages.contents(), vec!["new".to_string()]);
    }

    #[test]
    fn test_clones_share_storage() {
        let pages = VisitedPages::new();
        let other = pages.clone();
        other.record("https://a.com/", "A");
        assert!(!pages.is_empty());
        pages.clear();
        assert!(other.is_empty());
    }
}
