//! StreamLink Orchestrator - Dependency-ordered deployment execution
//!
//! Executes deployment and deletion plans against an external deployment
//! backend, deploy-then-record in order with stop-on-first-failure, and
//! drives the reconciliation loop that keeps persisted service status in
//! step with live cluster state.
//!
//! ## Architectural Boundaries
//!
//! - `streamlink-graph` owns: resolution and plan building (pure)
//! - `streamlink-store` owns: record and manifest persistence contracts
//! - This crate owns: plan execution, status reconciliation, and the
//!   `DeploymentBackend` contract the cluster integration implements
//!
//! ## Key Principle
//!
//! Plan execution is strictly sequential: a later step may assume an
//! earlier step's resource exists. Execution is forward-only: a failure
//! stops the plan and reports the exact completion point. Prerequisites
//! that already succeeded are never rolled back.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use streamlink_graph::DependencyGraph;
//! use streamlink_orchestrator::{InMemoryBackend, Orchestrator, OrchestratorConfig};
//! use streamlink_store::{InMemoryManifestStore, InMemoryServiceStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::new(
//!     Arc::new(DependencyGraph::streaming_stack()),
//!     Arc::new(InMemoryServiceStore::new()),
//!     Arc::new(InMemoryManifestStore::new()),
//!     Arc::new(InMemoryBackend::new()),
//!     OrchestratorConfig::default(),
//! );
//!
//! let plan = orchestrator.deployment_plan("ksqldb", "streamlink").await?;
//! println!("{}", plan.message);
//! let _deployed = orchestrator.deploy("ksqldb", "streamlink").await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod backend;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod reconciler;

// Re-exports
pub use backend::{BackendError, DeploymentBackend, InMemoryBackend, WorkloadPhase, WorkloadStatus};
pub use config::OrchestratorConfig;
pub use error::{OrchestratorError, Result};
pub use orchestrator::Orchestrator;
pub use reconciler::Reconciler;
