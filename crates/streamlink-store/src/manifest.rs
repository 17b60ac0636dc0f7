//! Manifest store contract
//!
//! Manifests are opaque text blobs keyed by service kind name. The
//! orchestrator substitutes the target namespace into the manifest before
//! handing it to the deployment backend.

use crate::error::Result;
use async_trait::async_trait;

/// Store for deployment manifests
#[async_trait]
pub trait ManifestStore: Send + Sync {
    /// Get the manifest for a service kind, if one exists
    async fn get(&self, kind: &str) -> Result<Option<String>>;

    /// Kinds with a manifest available
    async fn available_kinds(&self) -> Result<Vec<String>>;
}

/// Substitute the target namespace into a manifest.
///
/// Rewrites every `namespace: <anything>` line to the given namespace,
/// preserving indentation. Manifests are otherwise opaque.
pub fn render_namespace(manifest: &str, namespace: &str) -> String {
    manifest
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("namespace:") {
                let indent = &line[..line.len() - trimmed.len()];
                format!("{indent}namespace: {namespace}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_namespace_rewrites_every_occurrence() {
        let manifest = "kind: Deployment\nmetadata:\n  namespace: streamlink\n---\nkind: Service\nmetadata:\n  namespace: streamlink\n";
        let rendered = render_namespace(manifest, "staging");
        assert_eq!(rendered.matches("namespace: staging").count(), 2);
        assert!(!rendered.contains("namespace: streamlink"));
    }

    #[test]
    fn test_render_namespace_preserves_indentation() {
        let rendered = render_namespace("    namespace: a", "b");
        assert_eq!(rendered, "    namespace: b");
    }

    #[test]
    fn test_render_namespace_leaves_other_lines_alone() {
        let manifest = "image: kafka:7.4.0\nreplicas: 1";
        assert_eq!(render_namespace(manifest, "x"), manifest);
    }
}
