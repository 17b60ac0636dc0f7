//! Service record store contract
//!
//! The orchestrator reasons about at most one installed service per
//! (kind, namespace) pair; that pair is the record key.

use crate::error::Result;
use async_trait::async_trait;
use streamlink_types::{InstalledService, ReplicaSummary, ServiceStatus};

/// Key addressing one installed-service record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    /// Service kind name
    pub kind: String,

    /// Target namespace
    pub namespace: String,
}

impl ServiceKey {
    pub fn new(kind: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            namespace: namespace.into(),
        }
    }
}

impl std::fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.kind)
    }
}

/// Store for installed-service records
///
/// Implementations must serialize concurrent mutations of the same record;
/// mutations of different records never conflict.
#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// Insert or replace a record
    async fn upsert(&self, service: InstalledService) -> Result<()>;

    /// Get a record by kind and namespace
    async fn get(&self, kind: &str, namespace: &str) -> Result<Option<InstalledService>>;

    /// List all records
    async fn list_all(&self) -> Result<Vec<InstalledService>>;

    /// List records in a namespace
    async fn list_namespace(&self, namespace: &str) -> Result<Vec<InstalledService>>;

    /// Update a record's status, replica summary and last-checked
    /// timestamp in one operation; used by reconciliation
    async fn update_status(
        &self,
        kind: &str,
        namespace: &str,
        status: ServiceStatus,
        replicas: Option<ReplicaSummary>,
        checked_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()>;

    /// Remove a record; removing an absent record is not an error
    async fn remove(&self, kind: &str, namespace: &str) -> Result<()>;
}
