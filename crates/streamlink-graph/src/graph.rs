//! The static service dependency graph
//!
//! A DependencyGraph is an immutable value constructed once at process
//! start from static configuration. Construction validates every declared
//! dependency reference and rejects cyclic declarations, so the resolver
//! can assume a well-formed DAG from then on.

use crate::error::{GraphError, Result};
use crate::resolver;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A class of deployable workload, identified by a stable name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceKind {
    /// Canonical name (manifest identity, e.g. "schema-registry")
    pub name: String,

    /// Human-readable name (e.g. "Schema Registry")
    pub display_name: String,

    /// Direct dependency kind names, declaration order preserved
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Removing this service requires a caller-driven restart of the
    /// control plane (e.g. its own database)
    #[serde(default)]
    pub restart_on_removal: bool,
}

impl ServiceKind {
    /// Declare a kind with no dependencies
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            depends_on: Vec::new(),
            restart_on_removal: false,
        }
    }

    /// Declare direct dependencies (builder style, order significant)
    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Flag removal as requiring a control-plane restart
    pub fn restart_on_removal(mut self) -> Self {
        self.restart_on_removal = true;
        self
    }
}

/// Immutable, validated dependency graph over service kinds
///
/// Declaration order is significant: it is the tie-break that makes every
/// resolver ordering deterministic.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Kinds in declaration order
    kinds: Vec<ServiceKind>,

    /// name -> position in `kinds`
    index: HashMap<String, usize>,

    /// Reverse adjacency: name -> direct dependents, declaration order.
    /// Precomputed so dependent lookup is O(1) amortized per request.
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build and validate a graph from kind declarations.
    ///
    /// Fails with `InvalidGraph` if a dependency references an undefined
    /// kind, `DuplicateKind` on repeated declarations, and
    /// `CircularDependency` if the relation is not acyclic.
    pub fn new(kinds: Vec<ServiceKind>) -> Result<Self> {
        let mut index = HashMap::with_capacity(kinds.len());
        for (pos, kind) in kinds.iter().enumerate() {
            if index.insert(kind.name.clone(), pos).is_some() {
                return Err(GraphError::DuplicateKind(kind.name.clone()));
            }
        }

        let mut dependents: HashMap<String, Vec<String>> = HashMap::with_capacity(kinds.len());
        for kind in &kinds {
            dependents.entry(kind.name.clone()).or_default();
        }
        for kind in &kinds {
            for dep in &kind.depends_on {
                if !index.contains_key(dep) {
                    return Err(GraphError::InvalidGraph {
                        kind: kind.name.clone(),
                        dependency: dep.clone(),
                    });
                }
                dependents
                    .entry(dep.clone())
                    .or_default()
                    .push(kind.name.clone());
            }
        }

        let graph = Self {
            kinds,
            index,
            dependents,
        };

        if let Some(cycle) = resolver::detect_cycle(&graph) {
            return Err(GraphError::CircularDependency(cycle));
        }

        Ok(graph)
    }

    /// The built-in streaming platform catalog
    pub fn streaming_stack() -> Self {
        Self::new(vec![
            ServiceKind::new("postgres", "PostgreSQL Database").restart_on_removal(),
            ServiceKind::new("keycloak", "Keycloak (Authentication)").depends_on(["postgres"]),
            ServiceKind::new("kafka", "Apache Kafka"),
            ServiceKind::new("schema-registry", "Schema Registry").depends_on(["kafka"]),
            ServiceKind::new("kafka-connect", "Kafka Connect")
                .depends_on(["kafka", "schema-registry"]),
            ServiceKind::new("ksqldb", "ksqlDB").depends_on([
                "kafka",
                "schema-registry",
                "kafka-connect",
            ]),
            ServiceKind::new("kafka-rest", "Kafka REST Proxy")
                .depends_on(["kafka", "schema-registry"]),
            ServiceKind::new("kafbat-ui", "Kafbat UI").depends_on([
                "kafka",
                "schema-registry",
                "kafka-connect",
                "ksqldb",
                "keycloak",
            ]),
        ])
        .expect("built-in catalog is a valid DAG")
    }

    /// Whether a kind is defined
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a kind declaration
    pub fn kind(&self, name: &str) -> Option<&ServiceKind> {
        self.index.get(name).map(|&pos| &self.kinds[pos])
    }

    /// Direct dependencies of a kind, declaration order preserved.
    /// Unknown kinds have no dependencies.
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.kind(name).map(|k| k.depends_on.as_slice()).unwrap_or(&[])
    }

    /// Direct dependents of a kind, declaration order preserved
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.dependents
            .get(name)
            .map(|d| d.as_slice())
            .unwrap_or(&[])
    }

    /// Human-readable name for a kind, falling back to the raw name
    pub fn display_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.kind(name)
            .map(|k| k.display_name.as_str())
            .unwrap_or(name)
    }

    /// All declared kinds, declaration order preserved
    pub fn kinds(&self) -> &[ServiceKind] {
        &self.kinds
    }

    /// All declared kind names, declaration order preserved
    pub fn kind_names(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(|k| k.name.as_str())
    }

    /// Declaration position of a kind; the resolver's deterministic
    /// tie-break
    pub(crate) fn declaration_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_stack_is_valid() {
        let graph = DependencyGraph::streaming_stack();
        assert_eq!(graph.kinds().len(), 8);
        assert_eq!(graph.dependencies_of("schema-registry"), &["kafka"]);
        assert_eq!(graph.display_name("ksqldb"), "ksqlDB");
    }

    #[test]
    fn test_display_name_falls_back_to_raw_name() {
        let graph = DependencyGraph::streaming_stack();
        assert_eq!(graph.display_name("not-a-kind"), "not-a-kind");
    }

    #[test]
    fn test_undefined_dependency_is_rejected() {
        let result = DependencyGraph::new(vec![
            ServiceKind::new("a", "A").depends_on(["missing"]),
        ]);
        assert_eq!(
            result.unwrap_err(),
            GraphError::InvalidGraph {
                kind: "a".into(),
                dependency: "missing".into(),
            }
        );
    }

    #[test]
    fn test_duplicate_kind_is_rejected() {
        let result = DependencyGraph::new(vec![
            ServiceKind::new("a", "A"),
            ServiceKind::new("a", "A again"),
        ]);
        assert_eq!(result.unwrap_err(), GraphError::DuplicateKind("a".into()));
    }

    #[test]
    fn test_cyclic_declaration_is_rejected() {
        let result = DependencyGraph::new(vec![
            ServiceKind::new("a", "A").depends_on(["b"]),
            ServiceKind::new("b", "B").depends_on(["a"]),
        ]);
        assert!(matches!(
            result.unwrap_err(),
            GraphError::CircularDependency(_)
        ));
    }

    #[test]
    fn test_dependents_index_preserves_declaration_order() {
        let graph = DependencyGraph::streaming_stack();
        assert_eq!(
            graph.dependents_of("kafka"),
            &[
                "schema-registry",
                "kafka-connect",
                "ksqldb",
                "kafka-rest",
                "kafbat-ui"
            ]
        );
        assert!(graph.dependents_of("kafbat-ui").is_empty());
    }
}
