//! StreamLink Graph - Dependency resolution for service deployment
//!
//! Models the static, directed dependency graph over service kinds and
//! provides the pure resolution algorithms the orchestrator plans with:
//! cycle detection, topological ordering, transitive closure, and
//! installed/missing classification.
//!
//! ## Architectural Boundaries
//!
//! - This crate is pure and synchronous: the graph is an immutable value
//!   built once at process start and passed explicitly to resolver and
//!   plan-builder calls. No I/O, no ambient global state.
//! - `streamlink-orchestrator` owns: executing the plans built here
//!   against a deployment backend.
//!
//! ## Usage
//!
//! ```
//! use streamlink_graph::{plan, DependencyGraph};
//! use std::collections::HashSet;
//!
//! let graph = DependencyGraph::streaming_stack();
//! let installed = HashSet::from(["kafka".to_string()]);
//! let deployment = plan::build_deployment_plan(&graph, "ksqldb", &installed).unwrap();
//! assert!(deployment.total_to_install > 0);
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod error;
pub mod graph;
pub mod plan;
pub mod resolver;

// Re-exports
pub use config::{GraphConfig, KindConfig};
pub use error::{GraphError, Result};
pub use graph::{DependencyGraph, ServiceKind};
pub use plan::{build_deletion_plan, build_deployment_plan};
pub use resolver::{detect_cycle, missing_dependencies, topological_order, transitive_closure};
