//! Graph and resolver error types

use thiserror::Error;

/// Graph construction and resolution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A declared dependency references a kind that is not defined.
    /// Construction-time, fatal: the process must not start.
    #[error("invalid graph: '{kind}' depends on undefined kind '{dependency}'")]
    InvalidGraph { kind: String, dependency: String },

    /// The same kind was declared twice
    #[error("invalid graph: kind '{0}' declared more than once")]
    DuplicateKind(String),

    /// The dependency relation contains a cycle, reported as the ordered
    /// sequence of kinds forming it
    #[error("circular dependency detected: {}", .0.join(" -> "))]
    CircularDependency(Vec<String>),

    /// Caller requested a kind that is not in the graph
    #[error("unknown service kind: '{0}'")]
    UnknownKind(String),

    /// The graph declaration could not be parsed
    #[error("malformed graph declaration: {0}")]
    MalformedDeclaration(String),
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
