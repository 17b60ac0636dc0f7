//! Static graph configuration loading
//!
//! The dependency graph is configuration data supplied at process start.
//! `GraphConfig` is the declaration format; loading validates it into a
//! `DependencyGraph` or aborts startup with the construction error.

use crate::error::Result;
use crate::graph::{DependencyGraph, ServiceKind};
use serde::{Deserialize, Serialize};

/// One service kind declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindConfig {
    /// Canonical kind name
    pub name: String,

    /// Human-readable name; defaults to the kind name
    #[serde(default)]
    pub display_name: Option<String>,

    /// Direct dependency kind names, order significant
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Removal requires a caller-driven control-plane restart
    #[serde(default)]
    pub restart_on_removal: bool,
}

/// Dependency graph declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Kind declarations, order significant
    pub kinds: Vec<KindConfig>,
}

impl DependencyGraph {
    /// Build a validated graph from a declaration
    pub fn from_config(config: GraphConfig) -> Result<Self> {
        let kinds = config
            .kinds
            .into_iter()
            .map(|decl| ServiceKind {
                display_name: decl.display_name.unwrap_or_else(|| decl.name.clone()),
                name: decl.name,
                depends_on: decl.depends_on,
                restart_on_removal: decl.restart_on_removal,
            })
            .collect();
        Self::new(kinds)
    }

    /// Build a validated graph from a JSON declaration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GraphConfig = serde_json::from_str(json)
            .map_err(|e| crate::GraphError::MalformedDeclaration(e.to_string()))?;
        Self::from_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_declaration() {
        let graph = DependencyGraph::from_json_str(
            r#"{
                "kinds": [
                    { "name": "kafka", "display_name": "Apache Kafka" },
                    { "name": "schema-registry", "depends_on": ["kafka"] }
                ]
            }"#,
        )
        .unwrap();

        assert!(graph.contains("schema-registry"));
        assert_eq!(graph.display_name("kafka"), "Apache Kafka");
        // display_name defaults to the raw kind name
        assert_eq!(graph.display_name("schema-registry"), "schema-registry");
    }

    #[test]
    fn test_invalid_declaration_aborts_load() {
        let result = DependencyGraph::from_json_str(
            r#"{ "kinds": [ { "name": "a", "depends_on": ["ghost"] } ] }"#,
        );
        assert!(result.is_err());
    }
}
