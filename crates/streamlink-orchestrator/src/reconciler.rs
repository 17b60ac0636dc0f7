//! Periodic status reconciliation
//!
//! The reconciler runs a fixed-interval loop that polls live backend state
//! for every installed service and refreshes the persisted status records.
//! Per-service failures are isolated: one unreachable workload never stops
//! the sweep or the loop.

use crate::orchestrator::Orchestrator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Drives periodic reconciliation sweeps against the orchestrator
pub struct Reconciler {
    orchestrator: Arc<Orchestrator>,
    interval: Duration,
    shutdown_tx: watch::Sender<bool>,
}

impl Reconciler {
    /// Create a reconciler using the orchestrator's configured interval
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let interval = orchestrator.config().reconcile_interval;
        Self::with_interval(orchestrator, interval)
    }

    /// Create a reconciler with an explicit sweep interval
    pub fn with_interval(orchestrator: Arc<Orchestrator>, interval: Duration) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            orchestrator,
            interval,
            shutdown_tx,
        }
    }

    /// Spawn the reconciliation loop.
    ///
    /// The first sweep runs after one full interval. The loop exits
    /// cleanly when `shutdown` is called.
    pub fn start(&self) -> JoinHandle<()> {
        let orchestrator = self.orchestrator.clone();
        let interval = self.interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "reconciler started");
            let mut ticker = tokio::time::interval(interval);
            // The immediate first tick would sweep before anything settles.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        sweep(&orchestrator).await;
                    }
                    _ = shutdown_rx.changed() => {
                        info!("reconciler stopped");
                        break;
                    }
                }
            }
        })
    }

    /// Signal the loop to exit after the current sweep
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// One reconciliation sweep over every installed service
async fn sweep(orchestrator: &Orchestrator) {
    let services = match orchestrator.installed_services().await {
        Ok(services) => services,
        Err(e) => {
            warn!(error = %e, "could not list services for reconciliation");
            return;
        }
    };

    if services.is_empty() {
        return;
    }
    debug!(services = services.len(), "reconciliation sweep");

    for service in &services {
        if let Err(e) = orchestrator.reconcile(service).await {
            warn!(
                kind = %service.kind,
                namespace = %service.namespace,
                error = %e,
                "reconciliation failed for service"
            );
        }
    }
}
