//! Error types for network construction, constraint resolution, and queries.

use thiserror::Error;

/// Errors surfaced by the fingerprint engine.
///
/// The taxonomy is deliberately small: graph-shape errors are fatal at
/// construction time, constraint errors reject a single request, and the
/// query errors signal caller misuse. There is no transient class — the
/// engine performs no I/O, so nothing is retryable.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed network construction (duplicate node, missing parent,
    /// invalid distribution). Surfaced once at startup.
    #[error("graph error: {0}")]
    Graph(String),

    /// The declared parent/child structure contains a cycle, so no sampling
    /// order exists.
    #[error("cycle error: {0}")]
    Cycle(String),

    /// Caller-supplied constraints reference an unrecognized value. The
    /// message names the offending field. Rejects that single request only.
    #[error("constraint error: field '{field}': {message}")]
    Constraint { field: String, message: String },

    /// A query referenced a node name that is not in the graph.
    #[error("unknown node: '{0}'")]
    UnknownNode(String),

    /// Evidence handed to a query or the assembler violated the node
    /// schema (non-parent keys, or a required node missing). Programmer
    /// error, not retried.
    #[error("invalid evidence: {0}")]
    InvalidEvidence(String),
}

impl EngineError {
    /// Shorthand for a constraint violation on a named field.
    pub fn constraint(field: &str, message: impl Into<String>) -> Self {
        EngineError::Constraint {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
