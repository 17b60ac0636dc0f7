//! Event types for orchestration observability
//!
//! Events provide a unified stream of deployment lifecycle activity.

use crate::service::ServiceStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all orchestration events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,

    /// Event timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Event source
    pub source: EventSource,

    /// Event severity
    pub severity: EventSeverity,

    /// The actual event
    pub event: OrchestratorEvent,
}

impl EventEnvelope {
    /// Wrap an event, stamping id, time and severity
    pub fn new(event: OrchestratorEvent, source: EventSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            source,
            severity: event.severity(),
            event,
        }
    }
}

/// Event sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSource {
    /// Plan execution (deploy/delete)
    Orchestrator,
    /// Periodic status reconciliation
    Reconciler,
}

/// Event severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Informational event
    Info,
    /// Warning event
    Warning,
    /// Error event
    Error,
}

/// Orchestration events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrchestratorEvent {
    /// Deployment plan execution started
    DeploymentStarted {
        target: String,
        namespace: String,
        total_to_install: usize,
    },

    /// One service in a plan was deployed and recorded
    ServiceDeployed { kind: String, namespace: String },

    /// Deployment plan completed, target included
    DeploymentCompleted {
        target: String,
        namespace: String,
        deployed: Vec<String>,
    },

    /// Deployment plan stopped on a failing step
    DeploymentFailed {
        target: String,
        namespace: String,
        failed_at: String,
        reason: String,
    },

    /// Deletion plan execution started
    DeletionStarted {
        target: String,
        namespace: String,
        total_deletions: usize,
    },

    /// One service was removed from the backend and the store
    ServiceDeleted { kind: String, namespace: String },

    /// Deletion plan completed
    DeletionCompleted {
        target: String,
        namespace: String,
        deleted: usize,
    },

    /// Deletion plan stopped on a failing step
    DeletionFailed {
        target: String,
        namespace: String,
        failed_at: String,
        reason: String,
    },

    /// Reconciliation observed a status change
    StatusChanged {
        kind: String,
        namespace: String,
        old_status: ServiceStatus,
        new_status: ServiceStatus,
    },
}

impl OrchestratorEvent {
    /// Default severity for this event
    pub fn severity(&self) -> EventSeverity {
        match self {
            OrchestratorEvent::DeploymentFailed { .. }
            | OrchestratorEvent::DeletionFailed { .. } => EventSeverity::Error,
            OrchestratorEvent::StatusChanged { new_status, .. } if new_status.is_failed() => {
                EventSeverity::Warning
            }
            _ => EventSeverity::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_stamps_severity() {
        let envelope = EventEnvelope::new(
            OrchestratorEvent::DeploymentFailed {
                target: "ksqldb".into(),
                namespace: "streamlink".into(),
                failed_at: "schema-registry".into(),
                reason: "apply rejected".into(),
            },
            EventSource::Orchestrator,
        );
        assert_eq!(envelope.severity, EventSeverity::Error);
    }

    #[test]
    fn test_failed_status_change_is_warning() {
        let event = OrchestratorEvent::StatusChanged {
            kind: "kafka".into(),
            namespace: "streamlink".into(),
            old_status: ServiceStatus::Running,
            new_status: ServiceStatus::Failed {
                reason: "crash loop".into(),
            },
        };
        assert_eq!(event.severity(), EventSeverity::Warning);
    }
}
