//! Store error types

use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("service record not found: {kind} in namespace {namespace}")]
    NotFound { kind: String, namespace: String },

    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
