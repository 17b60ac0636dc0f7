//! StreamLink Store - Persistence contracts for the orchestration core
//!
//! This crate defines the storage collaborators the orchestrator consumes:
//!
//! - **ServiceStore**: Persisted installed-service records, addressed by
//!   (kind, namespace)
//! - **ManifestStore**: Opaque deployment manifests keyed by service kind
//!
//! ## In-Memory vs Persistent
//!
//! The in-memory implementations are suitable for development and testing.
//! Production deployments should use a persistent backend implementing the
//! same traits; that backend owns serializing concurrent mutations of the
//! same record (the in-memory store gets this from per-key entry locking).

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod manifest;
pub mod memory;
pub mod service;

// Re-exports
pub use error::{Result, StoreError};
pub use manifest::{render_namespace, ManifestStore};
pub use memory::{InMemoryManifestStore, InMemoryServiceStore};
pub use service::{ServiceKey, ServiceStore};
