//! Visited-page context management.
//!
//! Keeps the content of visited pages, rewrites fetched-page entries in the
//! conversation history according to the retention policy, and feeds an
//! incremental retrieval index over everything visited.

mod manager;
mod visited;

pub use manager::{PageContextManager, REMOVED_PAGE_PLACEHOLDER, RetentionPolicy, SUMMARY_PROMPT};
pub use visited::{VisitedPage, VisitedPages};
