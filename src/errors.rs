//! Error types for rapid-pagerank.

use thiserror::Error;

use crate::types::NodeId;

/// Every failure the ranking core can report.
///
/// All variants are local and non-retryable: the core never recovers on its
/// own, the caller decides whether to skip, abort or fall back.
#[derive(Debug, Error)]
pub enum PageRankError {
    /// An edge operation referenced a source node that was never added.
    #[error("unknown source node {0}")]
    UnknownSourceNode(NodeId),

    /// An edge was added towards a node that was never added.
    #[error("unknown target node {0}")]
    UnknownTargetNode(NodeId),

    /// A sink node was met while building the matrix under
    /// [`SinkPolicy::Reject`](crate::types::SinkPolicy::Reject).
    #[error("node {0} has no outgoing edges")]
    ZeroOutDegree(NodeId),

    /// Ranks were requested before a transition matrix was built.
    #[error("transition matrix has not been built")]
    MatrixNotBuilt,

    /// A vector did not match the matrix dimension.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A JSON configuration document could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// The edge-list reader stopped before a clean end of input.
    ///
    /// Edges ingested before the failure remain in the graph.
    #[error("ingestion failed after {line} lines: {source}")]
    IngestionFailed {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, PageRankError>;
