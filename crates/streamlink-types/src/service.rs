//! Installed service records
//!
//! An InstalledService is the persisted record of one deployed instance of
//! a service kind. The orchestrator treats at most one record per
//! (kind, namespace) pair as "the" instance the resolver reasons about.

use crate::ServiceId;
use serde::{Deserialize, Serialize};

/// A deployed service instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledService {
    /// Unique record identifier
    pub id: ServiceId,

    /// Service kind name (manifest identity, e.g. "schema-registry")
    pub kind: String,

    /// Human-readable name (e.g. "Schema Registry")
    pub display_name: String,

    /// Target namespace on the cluster
    pub namespace: String,

    /// Current lifecycle status
    pub status: ServiceStatus,

    /// Replica/health summary from the last reconcile, if any
    pub replicas: Option<ReplicaSummary>,

    /// Installed version, if known
    pub version: Option<semver::Version>,

    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Timestamp of the last status reconcile
    pub last_checked: Option<chrono::DateTime<chrono::Utc>>,
}

impl InstalledService {
    /// Create a new record in the `Pending` state
    pub fn new(
        kind: impl Into<String>,
        display_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            id: ServiceId::generate(),
            kind: kind.into(),
            display_name: display_name.into(),
            namespace: namespace.into(),
            status: ServiceStatus::Pending,
            replicas: None,
            version: None,
            created_at: chrono::Utc::now(),
            last_checked: None,
        }
    }

    /// Set the initial status (builder style)
    pub fn with_status(mut self, status: ServiceStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the service is serving traffic (possibly degraded)
    pub fn is_operational(&self) -> bool {
        self.status.is_operational()
    }
}

/// Service lifecycle status
///
/// Transitions: `Pending → Deploying → Running | Failed`;
/// `Running ↔ Degraded`; removal only via explicit delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// Record created, deploy not yet issued
    Pending,

    /// Deploy issued, workload not yet ready
    Deploying,

    /// All replicas ready
    Running,

    /// Some but not all replicas ready
    Degraded,

    /// Deploy error or crashing workload
    Failed {
        /// Failure reason
        reason: String,
    },

    /// Last status poll failed; live state unknown
    Unknown,
}

impl ServiceStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, ServiceStatus::Running)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ServiceStatus::Failed { .. })
    }

    pub fn is_operational(&self) -> bool {
        matches!(self, ServiceStatus::Running | ServiceStatus::Degraded)
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Pending => write!(f, "pending"),
            ServiceStatus::Deploying => write!(f, "deploying"),
            ServiceStatus::Running => write!(f, "running"),
            ServiceStatus::Degraded => write!(f, "degraded"),
            ServiceStatus::Failed { reason } => write!(f, "failed: {}", reason),
            ServiceStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Ready/total replica counts for a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaSummary {
    /// Replicas reporting ready
    pub ready: u32,

    /// Desired replicas
    pub total: u32,
}

impl ReplicaSummary {
    pub fn new(ready: u32, total: u32) -> Self {
        Self { ready, total }
    }

    /// All desired replicas are ready
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.ready == self.total
    }
}

impl std::fmt::Display for ReplicaSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.ready, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_pending() {
        let svc = InstalledService::new("kafka", "Apache Kafka", "streamlink");
        assert_eq!(svc.status, ServiceStatus::Pending);
        assert!(svc.replicas.is_none());
        assert!(svc.last_checked.is_none());
    }

    #[test]
    fn test_operational_states() {
        assert!(ServiceStatus::Running.is_operational());
        assert!(ServiceStatus::Degraded.is_operational());
        assert!(!ServiceStatus::Deploying.is_operational());
        assert!(!ServiceStatus::Failed {
            reason: "crash loop".into()
        }
        .is_operational());
    }

    #[test]
    fn test_replica_summary_display() {
        assert_eq!(ReplicaSummary::new(1, 3).to_string(), "1/3");
        assert!(ReplicaSummary::new(3, 3).is_complete());
        assert!(!ReplicaSummary::new(0, 0).is_complete());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&ServiceStatus::Deploying).unwrap();
        assert_eq!(json, "\"deploying\"");
    }
}
