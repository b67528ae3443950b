//! # rapid-pagerank
//!
//! PageRank-style importance scores for the nodes of a directed graph built
//! from a flat `from to` edge list.
//!
//! The pipeline is deliberately small:
//!
//! 1. [`ingest`] turns edge-list lines into `(from, to)` pairs and populates a
//!    [`Graph`], creating both endpoints before recording the edge.
//! 2. [`Graph::build_matrix`] converts the current edges into a dense
//!    row-stochastic [`TransitionMatrix`] with a damping (teleport) term.
//! 3. [`Graph::compute_ranks`] runs power iteration on that matrix and stores
//!    the resulting [`RankVector`], addressable by node id.
//!
//! ```rust
//! use rapid_pagerank::{Graph, RankConfig};
//!
//! let mut graph = Graph::from_edges([(1, 2), (2, 3), (3, 1)]).unwrap();
//! let ranks = graph.rank(&RankConfig::default()).unwrap();
//! assert_eq!(ranks.len(), 3);
//! assert!(graph.rank_of(1).is_some());
//! ```

// ---------------------------------------------------------------------------
// Conditional tracing support
// ---------------------------------------------------------------------------

/// Enter a tracing span for a pipeline stage (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("pagerank_stage", stage = $name).entered();
    };
}

/// Emit a tracing event at the given level when the `tracing` feature is on.
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::$level!($($arg)+);
    };
}

pub mod errors;
pub mod graph;
pub mod ingest;
pub mod matrix;
pub mod pagerank;
pub mod types;

pub use errors::{PageRankError, Result};
pub use graph::{Graph, Node};
pub use ingest::{load_edges, parse_edge_line, Edge, EdgeListReader, LoadReport};
pub use matrix::{magnitude, MatrixConfig, TransitionMatrix};
pub use pagerank::{EigenResult, PowerIteration, RankVector};
pub use types::{
    NodeId, RankConfig, SinkPolicy, DEFAULT_DAMPING_FACTOR, DEFAULT_INITIAL_MAGNITUDE,
    DEFAULT_MAGNITUDE_TOLERANCE, DEFAULT_MAX_ITERATIONS,
};
