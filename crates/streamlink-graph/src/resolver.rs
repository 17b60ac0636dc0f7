//! Pure resolution algorithms over a dependency graph
//!
//! All functions take the graph explicitly and are deterministic given a
//! fixed declaration order: ties are always broken first-declared-first.

use crate::error::{GraphError, Result};
use crate::graph::DependencyGraph;
use std::collections::{HashMap, HashSet, VecDeque};

/// Depth-first search marking for cycle detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Find a dependency cycle, if any.
///
/// Runs a three-color depth-first traversal from every kind in declaration
/// order; a back-edge to an in-progress kind yields the cycle, reported as
/// the ordered closed walk forming it.
pub fn detect_cycle(graph: &DependencyGraph) -> Option<Vec<String>> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();

    for name in graph.kind_names() {
        if marks.get(name).copied().unwrap_or(Mark::Unvisited) == Mark::Unvisited {
            let mut path = Vec::new();
            if let Some(cycle) = visit_for_cycle(graph, name, &mut marks, &mut path) {
                return Some(cycle);
            }
        }
    }

    None
}

fn visit_for_cycle<'a>(
    graph: &'a DependencyGraph,
    name: &'a str,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    marks.insert(name, Mark::InProgress);
    path.push(name);

    for dep in graph.dependencies_of(name) {
        match marks.get(dep.as_str()).copied().unwrap_or(Mark::Unvisited) {
            Mark::Done => {}
            Mark::InProgress => {
                // Back-edge: the cycle is the path from the first occurrence
                // of `dep`, closed by repeating it.
                let start = path.iter().position(|n| *n == dep).unwrap_or(0);
                let mut cycle: Vec<String> =
                    path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(dep.clone());
                return Some(cycle);
            }
            Mark::Unvisited => {
                if let Some(cycle) = visit_for_cycle(graph, dep, marks, path) {
                    return Some(cycle);
                }
            }
        }
    }

    path.pop();
    marks.insert(name, Mark::Done);
    None
}

/// Transitive dependency closure of a target kind, dependencies before
/// dependents.
///
/// Computed by reverse-postorder depth-first visitation of the target's
/// dependency subtree. The target itself is excluded; callers append it as
/// the final plan step. Unknown targets have an empty closure.
pub fn transitive_closure(graph: &DependencyGraph, target: &str) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    visit_postorder(graph, target, &mut visited, &mut order);
    // The target is always pushed last; drop it from its own closure.
    order.pop();
    order
}

fn visit_postorder(
    graph: &DependencyGraph,
    name: &str,
    visited: &mut HashSet<String>,
    order: &mut Vec<String>,
) {
    if !visited.insert(name.to_string()) {
        return;
    }
    for dep in graph.dependencies_of(name) {
        visit_postorder(graph, dep, visited, order);
    }
    order.push(name.to_string());
}

/// Topological order over the given roots and their transitive closures.
///
/// Kahn's algorithm restricted to the closure set: repeatedly remove
/// zero-in-degree kinds, decrementing the in-degree of their dependents.
/// Simultaneously-zero kinds leave in declaration order, making the output
/// deterministic. Fails with `CircularDependency` if kinds remain when the
/// queue empties; unreachable if construction-time validation ran.
pub fn topological_order(graph: &DependencyGraph, roots: &[String]) -> Result<Vec<String>> {
    // Collect roots plus everything they transitively depend on.
    let mut members: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for root in roots {
        if seen.insert(root.clone()) {
            members.push(root.clone());
        }
        for dep in transitive_closure(graph, root) {
            if seen.insert(dep.clone()) {
                members.push(dep);
            }
        }
    }
    members.sort_by_key(|name| graph.declaration_index(name).unwrap_or(usize::MAX));

    // In-degree restricted to edges within the member set.
    let mut in_degree: HashMap<&str, usize> = HashMap::with_capacity(members.len());
    for name in &members {
        let degree = graph
            .dependencies_of(name)
            .iter()
            .filter(|dep| seen.contains(*dep))
            .count();
        in_degree.insert(name.as_str(), degree);
    }

    let mut queue: VecDeque<&str> = members
        .iter()
        .map(String::as_str)
        .filter(|name| in_degree[name] == 0)
        .collect();
    let mut result = Vec::with_capacity(members.len());

    while let Some(current) = queue.pop_front() {
        result.push(current.to_string());

        // Dependents are indexed in declaration order, keeping ties stable.
        for dependent in graph.dependents_of(current) {
            if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(dependent.as_str());
                }
            }
        }
    }

    if result.len() != members.len() {
        let stuck: Vec<String> = members
            .iter()
            .filter(|name| !result.contains(name))
            .cloned()
            .collect();
        return Err(GraphError::CircularDependency(stuck));
    }

    Ok(result)
}

/// Dependencies of a target that are not yet installed, in install order
pub fn missing_dependencies(
    graph: &DependencyGraph,
    target: &str,
    installed: &HashSet<String>,
) -> Vec<String> {
    transitive_closure(graph, target)
        .into_iter()
        .filter(|dep| !installed.contains(dep))
        .collect()
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
            ServiceKind::new("t", "T").depends_on(["c"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_detect_cycle_on_acyclic_graph() {
        assert_eq!(detect_cycle(&chain_graph()), None);
        assert_eq!(detect_cycle(&DependencyGraph::streaming_stack()), None);
    }

    #[test]
    fn test_cycle_is_a_closed_walk() {
        // Construct without validation by probing the error from new()
        let err = DependencyGraph::new(vec![
            ServiceKind::new("a", "A").depends_on(["b"]),
            ServiceKind::new("b", "B").depends_on(["c"]),
            ServiceKind::new("c", "C").depends_on(["a"]),
        ])
        .unwrap_err();

        match err {
            crate::GraphError::CircularDependency(cycle) => {
                assert_eq!(cycle, vec!["a", "b", "c", "a"]);
                assert_eq!(cycle.first(), cycle.last());
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_closure_excludes_target_and_orders_dependencies_first() {
        let graph = chain_graph();
        assert_eq!(transitive_closure(&graph, "t"), vec!["a", "b", "c"]);
        assert_eq!(transitive_closure(&graph, "a"), Vec::<String>::new());
    }

    #[test]
    fn test_closure_is_a_fixed_point() {
        let graph = DependencyGraph::streaming_stack();
        let closure = transitive_closure(&graph, "kafbat-ui");
        let closure_set: HashSet<String> = closure.iter().cloned().collect();
        assert!(!closure_set.contains("kafbat-ui"));

        let mut again: HashSet<String> = HashSet::new();
        for kind in &closure {
            again.insert(kind.clone());
            again.extend(transitive_closure(&graph, kind));
        }
        assert_eq!(again, closure_set);
    }

    #[test]
    fn test_closure_of_unknown_kind_is_empty() {
        let graph = chain_graph();
        assert!(transitive_closure(&graph, "nope").is_empty());
    }

    #[test]
    fn test_topological_order_respects_all_edges() {
        let graph = DependencyGraph::streaming_stack();
        let roots: Vec<String> = graph.kind_names().map(str::to_string).collect();
        let order = topological_order(&graph, &roots).unwrap();
        assert_eq!(order.len(), graph.kinds().len());

        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        for kind in graph.kinds() {
            for dep in &kind.depends_on {
                assert!(
                    position[dep.as_str()] < position[kind.name.as_str()],
                    "{dep} must precede {}",
                    kind.name
                );
            }
        }
    }

    #[test]
    fn test_topological_order_is_deterministic() {
        let graph = DependencyGraph::streaming_stack();
        let roots = vec!["kafbat-ui".to_string()];
        let first = topological_order(&graph, &roots).unwrap();
        for _ in 0..10 {
            assert_eq!(topological_order(&graph, &roots).unwrap(), first);
        }
        // Declaration-order tie-break: postgres and kafka are both ready
        // at the start and leave in declaration order.
        assert_eq!(
            first,
            vec![
                "postgres",
                "kafka",
                "keycloak",
                "schema-registry",
                "kafka-connect",
                "ksqldb",
                "kafbat-ui"
            ]
        );
    }

    #[test]
    fn test_missing_dependencies_filters_installed() {
        let graph = chain_graph();
        let installed = HashSet::from(["a".to_string()]);
        assert_eq!(
            missing_dependencies(&graph, "t", &installed),
            vec!["b", "c"]
        );
    }
}
