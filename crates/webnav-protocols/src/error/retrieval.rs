//! Retrieval index errors.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    #[error("Index build failed: {0}")]
    BuildFailed(String),

    #[error("Index insert failed: {0}")]
    InsertFailed(String),

    #[error("Index query failed: {0}")]
    QueryFailed(String),
}
