//! Orchestrator - dependency-ordered plan execution
//!
//! The Orchestrator is the main entry point for deployment operations. It
//! resolves plans through the graph crate and executes them against the
//! deployment backend, deploy-then-record, strictly in order, stopping on
//! the first failure. Already-completed steps are never rolled back.

use crate::backend::{BackendError, BackendResult, DeploymentBackend, WorkloadPhase, WorkloadStatus};
use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, Result};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use streamlink_graph::{plan, DependencyGraph};
use streamlink_store::{render_namespace, ManifestStore, ServiceStore};
use streamlink_types::{
    DeletionPlan, DeploymentPlan, EventEnvelope, EventSource, InstalledService, OrchestratorEvent,
    ReplicaSummary, ServiceStatus,
};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

/// Orchestrates dependency-ordered deployment and removal of services
pub struct Orchestrator {
    /// The static, validated dependency graph
    graph: Arc<DependencyGraph>,
    /// Installed-service record store
    store: Arc<dyn ServiceStore>,
    /// Manifest store
    manifests: Arc<dyn ManifestStore>,
    /// Deployment backend
    backend: Arc<dyn DeploymentBackend>,
    /// Timeouts and intervals
    config: OrchestratorConfig,
    /// Event channel
    event_tx: broadcast::Sender<EventEnvelope>,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(
        graph: Arc<DependencyGraph>,
        store: Arc<dyn ServiceStore>,
        manifests: Arc<dyn ManifestStore>,
        backend: Arc<dyn DeploymentBackend>,
        config: OrchestratorConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(1024);
        Self {
            graph,
            store,
            manifests,
            backend,
            config,
            event_tx,
        }
    }

    /// Subscribe to orchestration events
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.event_tx.subscribe()
    }

    /// The dependency graph this orchestrator plans with
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Configured reconcile interval; used by the reconciler
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// All installed-service records
    pub async fn installed_services(&self) -> Result<Vec<InstalledService>> {
        Ok(self.store.list_all().await?)
    }

    /// Resolve an ordered install plan for a target kind.
    ///
    /// An already-installed target still resolves; `deploy` is the
    /// operation that rejects it.
    pub async fn deployment_plan(&self, kind: &str, namespace: &str) -> Result<DeploymentPlan> {
        let installed = self.installed_kinds(namespace).await?;
        Ok(plan::build_deployment_plan(&self.graph, kind, &installed)?)
    }

    /// Resolve a cascade-aware deletion plan for an installed service
    pub async fn deletion_plan(&self, kind: &str, namespace: &str) -> Result<DeletionPlan> {
        let target = self.store.get(kind, namespace).await?.ok_or_else(|| {
            OrchestratorError::NotFound {
                kind: kind.to_string(),
                namespace: namespace.to_string(),
            }
        })?;
        let installed = self.store.list_namespace(namespace).await?;
        Ok(plan::build_deletion_plan(&self.graph, &target, &installed)?)
    }

    /// Deploy a target kind with all of its missing dependencies, in
    /// dependency order.
    ///
    /// Returns the kinds deployed, target last. Fails fast before any
    /// side effect when the target is already installed or a needed
    /// manifest is missing; fails with `PartialDeployment` when a step
    /// fails mid-plan (earlier steps remain installed).
    #[instrument(skip(self), fields(kind = %kind, namespace = %namespace))]
    pub async fn deploy(&self, kind: &str, namespace: &str) -> Result<Vec<String>> {
        if self.store.get(kind, namespace).await?.is_some() {
            return Err(OrchestratorError::AlreadyInstalled {
                kind: kind.to_string(),
                namespace: namespace.to_string(),
            });
        }

        let installed = self.installed_kinds(namespace).await?;
        let deployment = plan::build_deployment_plan(&self.graph, kind, &installed)?;

        // Every pending step and the target need a manifest before any
        // backend call is issued.
        for step in deployment.pending_steps() {
            self.require_manifest(&step.kind).await?;
        }
        self.require_manifest(kind).await?;

        self.emit(OrchestratorEvent::DeploymentStarted {
            target: kind.to_string(),
            namespace: namespace.to_string(),
            total_to_install: deployment.total_to_install,
        });
        info!(
            total_to_install = deployment.total_to_install,
            "executing deployment plan"
        );

        let mut deployed = self.execute_deployment_plan(&deployment, namespace).await?;

        // Target itself is the implicit final step.
        if let Err(e) = self.deploy_step(kind, namespace).await {
            let reason = e.to_string();
            self.emit(OrchestratorEvent::DeploymentFailed {
                target: kind.to_string(),
                namespace: namespace.to_string(),
                failed_at: kind.to_string(),
                reason: reason.clone(),
            });
            return Err(OrchestratorError::PartialDeployment {
                completed: deployed,
                failed_at: kind.to_string(),
                reason,
            });
        }
        deployed.push(kind.to_string());

        self.emit(OrchestratorEvent::DeploymentCompleted {
            target: kind.to_string(),
            namespace: namespace.to_string(),
            deployed: deployed.clone(),
        });
        info!(deployed = deployed.len(), "deployment plan completed");

        Ok(deployed)
    }

    /// Execute the `WillInstall` steps of a deployment plan, in order.
    ///
    /// Stops immediately on the first failure: earlier steps stay
    /// installed (forward-only, no rollback) and the error reports the
    /// exact completion point.
    pub async fn execute_deployment_plan(
        &self,
        deployment: &DeploymentPlan,
        namespace: &str,
    ) -> Result<Vec<String>> {
        let mut completed: Vec<String> = Vec::new();

        for step in deployment.pending_steps() {
            if let Err(e) = self.deploy_step(&step.kind, namespace).await {
                let reason = e.to_string();
                warn!(
                    failed_at = %step.kind,
                    completed = completed.len(),
                    reason = %reason,
                    "deployment plan stopped"
                );
                self.emit(OrchestratorEvent::DeploymentFailed {
                    target: deployment.target.clone(),
                    namespace: namespace.to_string(),
                    failed_at: step.kind.clone(),
                    reason: reason.clone(),
                });
                return Err(OrchestratorError::PartialDeployment {
                    completed,
                    failed_at: step.kind.clone(),
                    reason,
                });
            }
            completed.push(step.kind.clone());
        }

        Ok(completed)
    }

    /// Delete an installed service.
    ///
    /// With `cascade = false` the call is refused with `HasDependents` if
    /// any installed service still depends on the target. With
    /// `cascade = true` dependents are removed first, deepest first.
    /// Returns the number of services removed.
    #[instrument(skip(self), fields(kind = %kind, namespace = %namespace, cascade = cascade))]
    pub async fn delete(&self, kind: &str, namespace: &str, cascade: bool) -> Result<usize> {
        let deletion = self.deletion_plan(kind, namespace).await?;

        if !cascade && deletion.is_cascade() {
            return Err(OrchestratorError::HasDependents {
                kind: kind.to_string(),
                dependents: deletion.dependents.iter().map(|s| s.kind.clone()).collect(),
            });
        }

        self.execute_deletion_plan(&deletion).await
    }

    /// Execute a deletion plan: dependents in their computed order, then
    /// the target.
    ///
    /// A mid-sequence failure leaves already-deleted entries deleted and
    /// skips the rest; the error carries the partial-completion state.
    pub async fn execute_deletion_plan(&self, deletion: &DeletionPlan) -> Result<usize> {
        let target = &deletion.target;

        self.emit(OrchestratorEvent::DeletionStarted {
            target: target.kind.clone(),
            namespace: target.namespace.clone(),
            total_deletions: deletion.total_deletions,
        });
        info!(
            target = %target.kind,
            namespace = %target.namespace,
            total_deletions = deletion.total_deletions,
            "executing deletion plan"
        );

        let sequence: Vec<&InstalledService> = deletion
            .dependents
            .iter()
            .chain(std::iter::once(target))
            .collect();

        let mut completed: Vec<String> = Vec::new();
        for (position, service) in sequence.iter().enumerate() {
            if let Err(e) = self.delete_step(&service.kind, &service.namespace).await {
                let reason = e.to_string();
                let remaining: Vec<String> = sequence[position + 1..]
                    .iter()
                    .map(|s| s.kind.clone())
                    .collect();
                warn!(
                    failed_at = %service.kind,
                    completed = completed.len(),
                    reason = %reason,
                    "deletion plan stopped"
                );
                self.emit(OrchestratorEvent::DeletionFailed {
                    target: target.kind.clone(),
                    namespace: target.namespace.clone(),
                    failed_at: service.kind.clone(),
                    reason: reason.clone(),
                });
                return Err(OrchestratorError::PartialDeletion {
                    completed,
                    remaining,
                    failed_at: service.kind.clone(),
                    reason,
                });
            }
            completed.push(service.kind.clone());
            self.emit(OrchestratorEvent::ServiceDeleted {
                kind: service.kind.clone(),
                namespace: service.namespace.clone(),
            });
        }

        self.emit(OrchestratorEvent::DeletionCompleted {
            target: target.kind.clone(),
            namespace: target.namespace.clone(),
            deleted: completed.len(),
        });

        Ok(completed.len())
    }

    /// Refresh one service's persisted status from live backend state.
    ///
    /// Idempotent: unchanged backend state produces the same status, only
    /// the last-checked timestamp moves. A failed poll records `Unknown`
    /// and is never raised; the next tick retries.
    pub async fn reconcile(&self, service: &InstalledService) -> Result<ServiceStatus> {
        let polled = self
            .bounded(self.backend.get_status(&service.kind, &service.namespace))
            .await;

        let (status, replicas) = match polled {
            Ok(workload) => (
                map_workload_status(&workload),
                Some(ReplicaSummary::new(workload.ready, workload.total)),
            ),
            Err(e) => {
                warn!(
                    kind = %service.kind,
                    namespace = %service.namespace,
                    error = %e,
                    "status poll failed"
                );
                (ServiceStatus::Unknown, service.replicas)
            }
        };

        if status != service.status {
            info!(
                kind = %service.kind,
                namespace = %service.namespace,
                old_status = %service.status,
                new_status = %status,
                "service status changed"
            );
            self.emit_from(
                EventSource::Reconciler,
                OrchestratorEvent::StatusChanged {
                    kind: service.kind.clone(),
                    namespace: service.namespace.clone(),
                    old_status: service.status.clone(),
                    new_status: status.clone(),
                },
            );
        }

        self.store
            .update_status(
                &service.kind,
                &service.namespace,
                status.clone(),
                replicas,
                chrono::Utc::now(),
            )
            .await?;

        Ok(status)
    }

    // --- Internal helpers ---

    /// Kinds with an installed record in the namespace
    async fn installed_kinds(&self, namespace: &str) -> Result<HashSet<String>> {
        Ok(self
            .store
            .list_namespace(namespace)
            .await?
            .into_iter()
            .map(|s| s.kind)
            .collect())
    }

    async fn require_manifest(&self, kind: &str) -> Result<()> {
        if self.manifests.get(kind).await?.is_none() {
            return Err(OrchestratorError::MissingManifest(kind.to_string()));
        }
        Ok(())
    }

    /// Deploy one kind: render, apply, then persist a `Deploying` record.
    /// The record is written only after the backend acknowledged creation.
    async fn deploy_step(&self, kind: &str, namespace: &str) -> Result<()> {
        let manifest = self
            .manifests
            .get(kind)
            .await?
            .ok_or_else(|| OrchestratorError::MissingManifest(kind.to_string()))?;
        let rendered = render_namespace(&manifest, namespace);

        self.bounded(self.backend.apply(kind, &rendered, namespace))
            .await?;

        let record = InstalledService::new(kind, self.graph.display_name(kind), namespace)
            .with_status(ServiceStatus::Deploying);
        self.store.upsert(record).await?;

        self.emit(OrchestratorEvent::ServiceDeployed {
            kind: kind.to_string(),
            namespace: namespace.to_string(),
        });
        info!(kind = %kind, namespace = %namespace, "service deployed, awaiting readiness");

        Ok(())
    }

    /// Delete one kind from the backend, then drop its record
    async fn delete_step(&self, kind: &str, namespace: &str) -> Result<()> {
        self.bounded(self.backend.delete(kind, namespace)).await?;
        self.store.remove(kind, namespace).await?;
        info!(kind = %kind, namespace = %namespace, "service deleted");
        Ok(())
    }

    /// Bound a backend call by the configured timeout
    async fn bounded<T, F>(&self, call: F) -> BackendResult<T>
    where
        F: Future<Output = BackendResult<T>>,
    {
        match tokio::time::timeout(self.config.backend_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout {
                elapsed: self.config.backend_timeout,
            }),
        }
    }

    fn emit(&self, event: OrchestratorEvent) {
        self.emit_from(EventSource::Orchestrator, event);
    }

    fn emit_from(&self, source: EventSource, event: OrchestratorEvent) {
        let _ = self.event_tx.send(EventEnvelope::new(event, source));
    }
}

/// Map live workload state to a service status.
///
/// All replicas ready means running; zero ready with pods scheduled means
/// pending; some-but-not-all ready means degraded; crashing pods mean
/// failed.
fn map_workload_status(workload: &WorkloadStatus) -> ServiceStatus {
    match workload.phase {
        WorkloadPhase::CrashLoop => ServiceStatus::Failed {
            reason: "pods crash looping".to_string(),
        },
        WorkloadPhase::NotFound => ServiceStatus::Failed {
            reason: "workload not found".to_string(),
        },
        WorkloadPhase::Creating => ServiceStatus::Deploying,
        WorkloadPhase::Pending => ServiceStatus::Pending,
        WorkloadPhase::Running => {
            if workload.total > 0 && workload.ready == workload.total {
                ServiceStatus::Running
            } else if workload.ready == 0 {
                ServiceStatus::Pending
            } else {
                ServiceStatus::Degraded
            }
        }
    }
}
