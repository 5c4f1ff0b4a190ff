//! Per-turn history rewriting and retrieval feeding.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use webnav_config::ContextConfig;
use webnav_protocols::{
    HistoryEntry, MessageRole, PromptOverrides, RetrievalIndex, RetrievalService, TextGenerator,
};

use super::VisitedPages;

/// Text replacing a fetched page under the remove-old-pages policy.
pub const REMOVED_PAGE_PLACEHOLDER: &str = "[Web page content removed to save context]";

/// Seed prompt for page summaries.
pub const SUMMARY_PROMPT: &str = "Summarize the following web page content in a few \
sentences. Keep only the key facts and the most relevant links.";

const RETRIEVAL_HEADER: &str = "Relevant information from previously visited web pages:";

/// How fetched-page entries are rewritten on later turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Replace with [`REMOVED_PAGE_PLACEHOLDER`].
    Placeholder,
    /// Replace with a generated summary.
    Summarize,
    /// Replace with an empty string.
    Drop,
}

impl RetentionPolicy {
    /// Placeholder wins over summary when both are enabled.
    pub fn from_config(config: &ContextConfig) -> Self {
        if config.remove_old_pages {
            Self::Placeholder
        } else if config.page_summary {
            Self::Summarize
        } else {
            Self::Drop
        }
    }
}

/// Rewrites fetched-page history entries and maintains the retrieval index
/// over visited pages.
pub struct PageContextManager {
    policy: RetentionPolicy,
    retrieve: bool,
    chunk_size: usize,
    visited: VisitedPages,
    generator: Option<Arc<dyn TextGenerator>>,
    retrieval: Option<Arc<dyn RetrievalService>>,
    index: Option<Box<dyn RetrievalIndex>>,
    indexed: HashSet<String>,
    prompt_overrides: PromptOverrides,
}

impl PageContextManager {
    pub fn new(config: &ContextConfig, visited: VisitedPages) -> Self {
        Self {
            policy: RetentionPolicy::from_config(config),
            retrieve: config.retrieve_information,
            chunk_size: config.chunk_size,
            visited,
            generator: None,
            retrieval: None,
            index: None,
            indexed: HashSet::new(),
            prompt_overrides: PromptOverrides::new(),
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_retrieval(mut self, retrieval: Arc<dyn RetrievalService>) -> Self {
        self.retrieval = Some(retrieval);
        self
    }

    pub fn with_prompt_overrides(mut self, overrides: PromptOverrides) -> Self {
        self.prompt_overrides = overrides;
        self
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Number of content blobs submitted to the retrieval index so far.
    pub fn indexed_count(&self) -> usize {
        self.indexed.len()
    }

    /// Pre-process one turn.
    ///
    /// Every entry tagged as a fetched page is rewritten in place and loses
    /// its tag. When retrieval is enabled, returns the extra context entries
    /// to append for the upcoming model call.
    pub async fn preprocess(&mut self, history: &mut [HistoryEntry]) -> Vec<HistoryEntry> {
        self.apply_retention(history).await;

        if !self.retrieve {
            return Vec::new();
        }
        let Some(query) = latest_user_message(history) else {
            return Vec::new();
        };
        match self.retrieve_context(&query).await {
            Some(entry) => vec![entry],
            None => Vec::new(),
        }
    }

    async fn apply_retention(&self, history: &mut [HistoryEntry]) {
        for entry in history.iter_mut().filter(|e| e.is_page_fetch_result) {
            entry.text = match self.policy {
                RetentionPolicy::Placeholder => REMOVED_PAGE_PLACEHOLDER.to_string(),
                RetentionPolicy::Summarize => self.summarize(&entry.text).await,
                RetentionPolicy::Drop => String::new(),
            };
            entry.is_page_fetch_result = false;
        }
    }

    async fn summarize(&self, content: &str) -> String {
        let Some(generator) = &self.generator else {
            warn!("Page summary enabled but no text generator configured");
            return REMOVED_PAGE_PLACEHOLDER.to_string();
        };
        let prompt = format!("{}\n\n{}", SUMMARY_PROMPT, content);
        match generator.generate(&prompt, &[], &self.prompt_overrides).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Page summary failed: {}", e);
                REMOVED_PAGE_PLACEHOLDER.to_string()
            }
        }
    }

    async fn retrieve_context(&mut self, query: &str) -> Option<HistoryEntry> {
        self.sync_index().await;
        let index = self.index.as_ref()?;
        match index.query(query).await {
            Ok(snippets) if !snippets.is_empty() => Some(HistoryEntry::system(format!(
                "{}\n\n{}",
                RETRIEVAL_HEADER,
                snippets.join("\n\n")
            ))),
            Ok(_) => None,
            Err(e) => {
                warn!("Retrieval query failed: {}", e);
                None
            }
        }
    }

    /// Submit visited content not yet indexed, building the index on first use.
    async fn sync_index(&mut self) {
        let Some(retrieval) = self.retrieval.clone() else {
            warn!("Retrieval enabled but no retrieval service configured");
            return;
        };

        let mut batch = HashSet::new();
        let fresh: Vec<String> = self
            .visited
            .contents()
            .into_iter()
            .filter(|content| !self.indexed.contains(content) && batch.insert(content.clone()))
            .collect();

        if fresh.is_empty() {
            return;
        }

        match self.index.as_mut() {
            Some(index) => {
                debug!("Inserting {} new pages into retrieval index", fresh.len());
                match index.insert(fresh.clone()).await {
                    Ok(()) => self.indexed.extend(fresh),
                    Err(e) => warn!("Failed to update retrieval index: {}", e),
                }
            }
            None => match retrieval.build_index(fresh.clone(), self.chunk_size).await {
                Ok(index) => {
                    info!("Built retrieval index over {} pages", fresh.len());
                    self.index = Some(index);
                    self.indexed.extend(fresh);
                }
                Err(e) => warn!("Failed to build retrieval index: {}", e),
            },
        }
    }
}

fn latest_user_message(history: &[HistoryEntry]) -> Option<String> {
    history
        .iter()
        .rev()
        .find(|entry| entry.role == MessageRole::User)
        .map(|entry| entry.text.clone())
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
