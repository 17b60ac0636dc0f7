//! Deployment and deletion plan values
//!
//! Plans are derived, ephemeral values: recomputed per request, never
//! persisted. A DeploymentPlan orders a target's missing dependencies; a
//! DeletionPlan orders the installed services that must be removed before
//! its target can go.

use crate::service::InstalledService;
use serde::{Deserialize, Serialize};

/// What a plan step will do for one service kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    /// Already present in the target namespace; kept for context
    Installed,

    /// Will be deployed as part of plan execution
    WillInstall,
}

/// One entry in a deployment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Service kind name
    pub kind: String,

    /// Human-readable name
    pub display_name: String,

    /// Install action for this step
    pub action: PlanAction,

    /// Zero-based position in the ordered sequence
    pub order: usize,
}

/// Ordered install plan for a target service kind
///
/// Steps cover the target's transitive dependencies only, dependencies
/// always preceding their dependents; the target itself is deployed as the
/// implicit final step after every `WillInstall` entry succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    /// Target service kind
    pub target: String,

    /// Ordered dependency steps (installed entries included for context)
    pub steps: Vec<PlanStep>,

    /// Count of `WillInstall` steps
    pub total_to_install: usize,

    /// Human-readable summary for confirmation prompts
    pub message: String,
}

impl DeploymentPlan {
    /// Steps that will actually be deployed, in order
    pub fn pending_steps(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps
            .iter()
            .filter(|s| s.action == PlanAction::WillInstall)
    }

    /// True when no dependencies need installing; callers may skip
    /// confirmation
    pub fn is_direct(&self) -> bool {
        self.total_to_install == 0
    }
}

/// Cascade-aware removal plan for an installed service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionPlan {
    /// The service being removed
    pub target: InstalledService,

    /// Installed services that transitively depend on the target, in
    /// removal order (a dependent-of-a-dependent comes first)
    pub dependents: Vec<InstalledService>,

    /// Total services removed when the plan executes (dependents + target)
    pub total_deletions: usize,

    /// Removal has side effects requiring a caller-driven restart
    pub restart_required: bool,
}

impl DeletionPlan {
    /// Whether executing the plan removes anything beyond the target
    pub fn is_cascade(&self) -> bool {
        !self.dependents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(kind: &str, action: PlanAction, order: usize) -> PlanStep {
        PlanStep {
            kind: kind.into(),
            display_name: kind.into(),
            action,
            order,
        }
    }

    #[test]
    fn test_pending_steps_filters_installed() {
        let plan = DeploymentPlan {
            target: "ksqldb".into(),
            steps: vec![
                step("kafka", PlanAction::Installed, 0),
                step("schema-registry", PlanAction::WillInstall, 1),
            ],
            total_to_install: 1,
            message: String::new(),
        };

        let pending: Vec<_> = plan.pending_steps().map(|s| s.kind.as_str()).collect();
        assert_eq!(pending, vec!["schema-registry"]);
        assert!(!plan.is_direct());
    }

    #[test]
    fn test_deletion_plan_cascade_flag() {
        let target = InstalledService::new("kafka", "Apache Kafka", "streamlink");
        let plan = DeletionPlan {
            target: target.clone(),
            dependents: Vec::new(),
            total_deletions: 1,
            restart_required: false,
        };
        assert!(!plan.is_cascade());
    }
}
