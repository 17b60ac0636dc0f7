//! Orchestrator error types

use crate::backend::BackendError;
use streamlink_graph::GraphError;
use thiserror::Error;

/// Orchestration errors
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Graph or resolver error; configuration or programming error, never
    /// silently degraded
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Target is already installed in the namespace
    #[error("service '{kind}' is already deployed in namespace '{namespace}'")]
    AlreadyInstalled { kind: String, namespace: String },

    /// No installed service record for the target
    #[error("service '{kind}' is not installed in namespace '{namespace}'")]
    NotFound { kind: String, namespace: String },

    /// No deployment manifest available for a kind
    #[error("no deployment manifest for service kind '{0}'")]
    MissingManifest(String),

    /// Delete refused: dependents exist and cascade was not requested
    #[error("service '{kind}' has installed dependents: {}", .dependents.join(", "))]
    HasDependents {
        kind: String,
        dependents: Vec<String>,
    },

    /// Deployment backend failure
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Persistence failure
    #[error("store error: {0}")]
    Store(String),

    /// Deployment plan stopped partway; completed steps remain installed
    #[error("deployment stopped at '{failed_at}' ({} step(s) completed): {reason}", .completed.len())]
    PartialDeployment {
        completed: Vec<String>,
        failed_at: String,
        reason: String,
    },

    /// Deletion plan stopped partway; completed deletions are not resurrected
    #[error("deletion stopped at '{failed_at}' ({} removed, {} remaining): {reason}", .completed.len(), .remaining.len())]
    PartialDeletion {
        completed: Vec<String>,
        remaining: Vec<String>,
        failed_at: String,
        reason: String,
    },
}

impl From<streamlink_store::StoreError> for OrchestratorError {
    fn from(err: streamlink_store::StoreError) -> Self {
        OrchestratorError::Store(err.to_string())
    }
}

/// Result type for orchestration operations
pub type Result<T> = std::result::Result<T, OrchestratorError>;
