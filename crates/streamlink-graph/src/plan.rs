//! Plan builders
//!
//! Turn a resolved closure plus the currently-installed service set into
//! an ordered, annotated install plan, or an installed service plus the
//! live service list into a cascade-aware deletion plan. Builders are
//! pure; executing a plan is the orchestrator's job.

use crate::error::{GraphError, Result};
use crate::graph::DependencyGraph;
use crate::resolver::{topological_order, transitive_closure};
use std::collections::HashSet;
use streamlink_types::{DeletionPlan, DeploymentPlan, InstalledService, PlanAction, PlanStep};

/// Build an ordered install plan for `target`.
///
/// Every dependency in the target's transitive closure appears as a step,
/// dependencies before dependents; kinds already in `installed` are kept
/// as `Installed` context entries and still occupy an order slot. The
/// target itself is not a step — it is deployed after the plan succeeds.
/// An already-installed target still resolves; rejecting it is a caller
/// concern.
pub fn build_deployment_plan(
    graph: &DependencyGraph,
    target: &str,
    installed: &HashSet<String>,
) -> Result<DeploymentPlan> {
    if !graph.contains(target) {
        return Err(GraphError::UnknownKind(target.to_string()));
    }

    let closure = transitive_closure(graph, target);
    let ordered = topological_order(graph, &closure)?;

    let steps: Vec<PlanStep> = ordered
        .into_iter()
        .enumerate()
        .map(|(order, kind)| {
            let action = if installed.contains(&kind) {
                PlanAction::Installed
            } else {
                PlanAction::WillInstall
            };
            PlanStep {
                display_name: graph.display_name(&kind).to_string(),
                kind,
                action,
                order,
            }
        })
        .collect();

    let total_to_install = steps
        .iter()
        .filter(|s| s.action == PlanAction::WillInstall)
        .count();

    let display = graph.display_name(target);
    let message = if total_to_install == 0 {
        format!("No dependency services to install before {display}.")
    } else {
        format!("Will install {total_to_install} dependency service(s) before {display}.")
    };

    Ok(DeploymentPlan {
        target: target.to_string(),
        steps,
        total_to_install,
        message,
    })
}

/// Build a cascade-aware deletion plan for an installed service.
///
/// Dependents are the installed services in the target's namespace that
/// transitively depend on the target's kind, ordered for removal: reverse
/// topological order, so nothing is removed while a service depending on
/// it remains installed.
pub fn build_deletion_plan(
    graph: &DependencyGraph,
    target: &InstalledService,
    installed: &[InstalledService],
) -> Result<DeletionPlan> {
    // Transitive dependents of the target kind, via the precomputed
    // reverse-adjacency index.
    let mut dependent_kinds: HashSet<String> = HashSet::new();
    let mut stack: Vec<&str> = vec![target.kind.as_str()];
    while let Some(current) = stack.pop() {
        for dependent in graph.dependents_of(current) {
            if dependent_kinds.insert(dependent.clone()) {
                stack.push(dependent);
            }
        }
    }

    let live: Vec<&InstalledService> = installed
        .iter()
        .filter(|s| {
            s.namespace == target.namespace
                && s.kind != target.kind
                && dependent_kinds.contains(&s.kind)
        })
        .collect();

    let roots: Vec<String> = live.iter().map(|s| s.kind.clone()).collect();
    let ordered = topological_order(graph, &roots)?;

    let mut dependents: Vec<InstalledService> = ordered
        .iter()
        .filter_map(|kind| live.iter().find(|s| &s.kind == kind).map(|s| (*s).clone()))
        .collect();
    dependents.reverse();

    let total_deletions = 1 + dependents.len();
    let restart_required = graph
        .kind(&target.kind)
        .map(|k| k.restart_on_removal)
        .unwrap_or(false);

    Ok(DeletionPlan {
        target: target.clone(),
        dependents,
        total_deletions,
        restart_required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ServiceKind;

    fn chain_graph() -> DependencyGraph {
        // a <- b <- c <- t
        DependencyGraph::new(vec![
            ServiceKind::new("a", "A"),
            ServiceKind::new("b", "B").depends_on(["a"]),
            ServiceKind::new("c", "C").depends_on(["b"]),
            ServiceKind::new("t", "Target").depends_on(["c"]),
        ])
        .unwrap()
    }

    fn installed(kind: &str, namespace: &str) -> InstalledService {
        InstalledService::new(kind, kind.to_uppercase(), namespace)
    }

    #[test]
    fn test_plan_with_nothing_installed() {
        let graph = chain_graph();
        let plan = build_deployment_plan(&graph, "t", &HashSet::new()).unwrap();

        let kinds: Vec<_> = plan.steps.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, vec!["a", "b", "c"]);
        assert!(plan
            .steps
            .iter()
            .all(|s| s.action == PlanAction::WillInstall));
        assert_eq!(plan.total_to_install, 3);
        assert_eq!(
            plan.message,
            "Will install 3 dependency service(s) before Target."
        );
    }

    #[test]
    fn test_plan_classifies_installed_kinds() {
        let graph = chain_graph();
        let have = HashSet::from(["a".to_string(), "b".to_string()]);
        let plan = build_deployment_plan(&graph, "t", &have).unwrap();

        let actions: Vec<_> = plan
            .steps
            .iter()
            .map(|s| (s.kind.as_str(), s.action, s.order))
            .collect();
        assert_eq!(
            actions,
            vec![
                ("a", PlanAction::Installed, 0),
                ("b", PlanAction::Installed, 1),
                ("c", PlanAction::WillInstall, 2),
            ]
        );
        assert_eq!(plan.total_to_install, 1);
    }

    #[test]
    fn test_plan_with_no_dependencies() {
        let graph = chain_graph();
        let plan = build_deployment_plan(&graph, "a", &HashSet::new()).unwrap();
        assert!(plan.steps.is_empty());
        assert!(plan.is_direct());
        assert_eq!(plan.message, "No dependency services to install before A.");
    }

    #[test]
    fn test_plan_for_unknown_kind() {
        let graph = chain_graph();
        let err = build_deployment_plan(&graph, "nope", &HashSet::new()).unwrap_err();
        assert_eq!(err, GraphError::UnknownKind("nope".into()));
    }

    #[test]
    fn test_plan_resolves_for_installed_target() {
        // "already deployed" handling is a caller concern
        let graph = chain_graph();
        let have = HashSet::from(["t".to_string(), "a".to_string()]);
        let plan = build_deployment_plan(&graph, "t", &have).unwrap();
        assert_eq!(plan.total_to_install, 2);
    }

    #[test]
    fn test_deletion_plan_orders_dependents_deepest_first() {
        // target <- d1 <- d2
        let graph = DependencyGraph::new(vec![
            ServiceKind::new("target", "Target"),
            ServiceKind::new("d1", "D1").depends_on(["target"]),
            ServiceKind::new("d2", "D2").depends_on(["d1"]),
        ])
        .unwrap();

        let target = installed("target", "streamlink");
        let live = vec![
            target.clone(),
            installed("d1", "streamlink"),
            installed("d2", "streamlink"),
        ];

        let plan = build_deletion_plan(&graph, &target, &live).unwrap();
        let kinds: Vec<_> = plan.dependents.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, vec!["d2", "d1"]);
        assert_eq!(plan.total_deletions, 3);
        assert!(plan.is_cascade());
    }

    #[test]
    fn test_deletion_plan_ignores_other_namespaces() {
        let graph = chain_graph();
        let target = installed("a", "streamlink");
        let live = vec![target.clone(), installed("b", "other")];

        let plan = build_deletion_plan(&graph, &target, &live).unwrap();
        assert!(plan.dependents.is_empty());
        assert_eq!(plan.total_deletions, 1);
    }

    #[test]
    fn test_deletion_plan_ignores_non_dependents() {
        let graph = DependencyGraph::streaming_stack();
        let target = installed("kafka", "streamlink");
        let live = vec![
            target.clone(),
            installed("schema-registry", "streamlink"),
            installed("postgres", "streamlink"),
        ];

        let plan = build_deletion_plan(&graph, &target, &live).unwrap();
        let kinds: Vec<_> = plan.dependents.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, vec!["schema-registry"]);
        assert!(!plan.restart_required);
    }

    #[test]
    fn test_deletion_plan_restart_flag() {
        let graph = DependencyGraph::streaming_stack();
        let target = installed("postgres", "streamlink");
        let plan = build_deletion_plan(&graph, &target, &[target.clone()]).unwrap();
        assert!(plan.restart_required);
    }
}
