//! Retrieval service protocol definitions.
//!
//! The retrieval engine is an external collaborator: webnav only builds an
//! index from visited-page content, feeds it new content, and queries it.

use async_trait::async_trait;

use crate::error::RetrievalError;

/// Builds retrieval indexes.
#[async_trait]
pub trait RetrievalService: Send + Sync {
    /// Build an index over `documents`, chunking each into `chunk_size` pieces.
    async fn build_index(
        &self,
        documents: Vec<String>,
        chunk_size: usize,
    ) -> Result<Box<dyn RetrievalIndex>, RetrievalError>;
}

/// A built index supporting incremental insertion.
#[async_trait]
pub trait RetrievalIndex: Send + Sync {
    /// Add documents to the index.
    async fn insert(&mut self, documents: Vec<String>) -> Result<(), RetrievalError>;

    /// Query the index, returning ranked text snippets.
    async fn query(&self, text: &str) -> Result<Vec<String>, RetrievalError>;
}
