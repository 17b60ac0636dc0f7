//! StreamLink Types - Core types for service orchestration
//!
//! StreamLink deploys interdependent infrastructure services (message
//! brokers, schema stores, connector runtimes) onto a remote cluster in
//! dependency order. This crate holds the shared data model; it contains
//! no I/O and no orchestration logic.
//!
//! ## Key Concepts
//!
//! - **InstalledService**: A persisted record of one deployed instance,
//!   keyed by (kind, namespace)
//! - **DeploymentPlan**: Ordered, annotated install plan for a target kind
//! - **DeletionPlan**: Cascade-aware removal plan for an installed service
//! - **Events**: Unified observability stream for orchestration activity

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod events;
pub mod ids;
pub mod plan;
pub mod service;

// Re-export main types
pub use events::{EventEnvelope, EventSeverity, EventSource, OrchestratorEvent};
pub use ids::ServiceId;
pub use plan::{DeletionPlan, DeploymentPlan, PlanAction, PlanStep};
pub use service::{InstalledService, ReplicaSummary, ServiceStatus};
