//! Orchestrator configuration

use std::time::Duration;

/// Configuration for plan execution and reconciliation
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound on every individual deployment backend call. A call
    /// that exceeds it fails with a retryable `BackendError::Timeout`.
    pub backend_timeout: Duration,

    /// Interval between reconciliation ticks
    pub reconcile_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            backend_timeout: Duration::from_secs(30),
            reconcile_interval: Duration::from_secs(30),
        }
    }
}
