//! In-memory implementations of store traits
//!
//! Suitable for development and testing. Production deployments should use
//! persistent backends implementing the same traits.

use crate::error::{Result, StoreError};
use crate::manifest::ManifestStore;
use crate::service::{ServiceKey, ServiceStore};
use async_trait::async_trait;
use dashmap::DashMap;
use streamlink_types::{InstalledService, ReplicaSummary, ServiceStatus};

/// In-memory service record store
///
/// DashMap entry locking serializes concurrent mutations of the same
/// record, satisfying the store contract.
pub struct InMemoryServiceStore {
    records: DashMap<ServiceKey, InstalledService>,
}

impl InMemoryServiceStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl Default for InMemoryServiceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceStore for InMemoryServiceStore {
    async fn upsert(&self, service: InstalledService) -> Result<()> {
        let key = ServiceKey::new(&service.kind, &service.namespace);
        self.records.insert(key, service);
        Ok(())
    }

    async fn get(&self, kind: &str, namespace: &str) -> Result<Option<InstalledService>> {
        let key = ServiceKey::new(kind, namespace);
        Ok(self.records.get(&key).map(|r| r.clone()))
    }

    async fn list_all(&self) -> Result<Vec<InstalledService>> {
        Ok(self.records.iter().map(|r| r.value().clone()).collect())
    }

    async fn list_namespace(&self, namespace: &str) -> Result<Vec<InstalledService>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.key().namespace == namespace)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn update_status(
        &self,
        kind: &str,
        namespace: &str,
        status: ServiceStatus,
        replicas: Option<ReplicaSummary>,
        checked_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        let key = ServiceKey::new(kind, namespace);
        if let Some(mut record) = self.records.get_mut(&key) {
            record.status = status;
            record.replicas = replicas;
            record.last_checked = Some(checked_at);
            Ok(())
        } else {
            Err(StoreError::NotFound {
                kind: kind.to_string(),
                namespace: namespace.to_string(),
            })
        }
    }

    async fn remove(&self, kind: &str, namespace: &str) -> Result<()> {
        let key = ServiceKey::new(kind, namespace);
        self.records.remove(&key);
        Ok(())
    }
}

/// In-memory manifest store
pub struct InMemoryManifestStore {
    manifests: DashMap<String, String>,
}

impl InMemoryManifestStore {
    pub fn new() -> Self {
        Self {
            manifests: DashMap::new(),
        }
    }

    /// Register a manifest for a kind
    pub fn insert(&self, kind: impl Into<String>, manifest: impl Into<String>) {
        self.manifests.insert(kind.into(), manifest.into());
    }
}

impl Default for InMemoryManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ManifestStore for InMemoryManifestStore {
    async fn get(&self, kind: &str) -> Result<Option<String>> {
        Ok(self.manifests.get(kind).map(|m| m.clone()))
    }

    async fn available_kinds(&self) -> Result<Vec<String>> {
        Ok(self.manifests.iter().map(|m| m.key().clone()).collect())
    }
}
