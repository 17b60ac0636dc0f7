//! Deployment backend contract
//!
//! The backend is the container-orchestration API that actually creates
//! and destroys workloads and reports pod health. The orchestrator
//! consumes it through this narrow contract; every call is bounded by the
//! configured timeout before it reaches the trait.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Deployment backend failures
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend rejected the request
    #[error("backend api error: {message}")]
    Api { message: String },

    /// The backend could not be reached
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The call exceeded its bound; retryable
    #[error("backend call timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },
}

impl BackendError {
    /// Whether retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendError::Timeout { .. } | BackendError::Unreachable(_)
        )
    }
}

/// Result type for backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Live workload phase as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkloadPhase {
    /// Pods scheduled and running
    Running,

    /// Pods scheduled, none running yet
    Pending,

    /// Containers still being created or initialized
    Creating,

    /// Pods crashing or erroring
    CrashLoop,

    /// No workload exists for the selector
    NotFound,
}

/// Replica counts and phase for one workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadStatus {
    /// Replicas reporting ready
    pub ready: u32,

    /// Desired replicas
    pub total: u32,

    /// Aggregate pod phase
    pub phase: WorkloadPhase,
}

impl WorkloadStatus {
    pub fn new(ready: u32, total: u32, phase: WorkloadPhase) -> Self {
        Self {
            ready,
            total,
            phase,
        }
    }

    /// Status reported when no workload exists
    pub fn not_found() -> Self {
        Self::new(0, 0, WorkloadPhase::NotFound)
    }
}

/// External deployment backend contract
#[async_trait]
pub trait DeploymentBackend: Send + Sync {
    /// Apply a namespace-rendered manifest for a service kind.
    /// Resolves on synchronous creation acknowledgment; workload readiness
    /// arrives later via `get_status`.
    async fn apply(&self, kind: &str, manifest: &str, namespace: &str) -> BackendResult<()>;

    /// Delete the workload for a service kind. Deleting an absent
    /// workload succeeds.
    async fn delete(&self, kind: &str, namespace: &str) -> BackendResult<()>;

    /// Current replica counts and phase for a service kind's selector
    async fn get_status(&self, kind: &str, namespace: &str) -> BackendResult<WorkloadStatus>;
}

/// In-memory deployment backend for development and testing
///
/// Applied workloads start in `Creating` with zero ready replicas; tests
/// drive phase transitions with `set_status` and inject failures with
/// `fail_apply` / `fail_status`.
pub struct InMemoryBackend {
    workloads: DashMap<(String, String), WorkloadStatus>,
    apply_failures: DashMap<String, String>,
    delete_failures: DashMap<String, String>,
    status_failures: DashMap<String, String>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            workloads: DashMap::new(),
            apply_failures: DashMap::new(),
            delete_failures: DashMap::new(),
            status_failures: DashMap::new(),
        }
    }

    /// Force subsequent applies of a kind to fail
    pub fn fail_apply(&self, kind: impl Into<String>, message: impl Into<String>) {
        self.apply_failures.insert(kind.into(), message.into());
    }

    /// Force subsequent deletes of a kind to fail
    pub fn fail_delete(&self, kind: impl Into<String>, message: impl Into<String>) {
        self.delete_failures.insert(kind.into(), message.into());
    }

    /// Force subsequent status queries of a kind to fail
    pub fn fail_status(&self, kind: impl Into<String>, message: impl Into<String>) {
        self.status_failures.insert(kind.into(), message.into());
    }

    /// Set the live status of a workload
    pub fn set_status(&self, kind: &str, namespace: &str, status: WorkloadStatus) {
        self.workloads
            .insert((kind.to_string(), namespace.to_string()), status);
    }

    /// Whether a workload currently exists
    pub fn exists(&self, kind: &str, namespace: &str) -> bool {
        self.workloads
            .contains_key(&(kind.to_string(), namespace.to_string()))
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeploymentBackend for InMemoryBackend {
    async fn apply(&self, kind: &str, _manifest: &str, namespace: &str) -> BackendResult<()> {
        if let Some(message) = self.apply_failures.get(kind) {
            return Err(BackendError::Api {
                message: message.clone(),
            });
        }
        self.workloads.insert(
            (kind.to_string(), namespace.to_string()),
            WorkloadStatus::new(0, 1, WorkloadPhase::Creating),
        );
        Ok(())
    }

    async fn delete(&self, kind: &str, namespace: &str) -> BackendResult<()> {
        if let Some(message) = self.delete_failures.get(kind) {
            return Err(BackendError::Api {
                message: message.clone(),
            });
        }
        // Absent workloads are fine; deletion is idempotent.
        self.workloads
            .remove(&(kind.to_string(), namespace.to_string()));
        Ok(())
    }

    async fn get_status(&self, kind: &str, namespace: &str) -> BackendResult<WorkloadStatus> {
        if let Some(message) = self.status_failures.get(kind) {
            return Err(BackendError::Unreachable(message.clone()));
        }
        Ok(self
            .workloads
            .get(&(kind.to_string(), namespace.to_string()))
            .map(|s| *s)
            .unwrap_or_else(WorkloadStatus::not_found))
    }
}
