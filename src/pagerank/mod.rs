//! PageRank ranking
//!
//! This module provides the power-iteration solver and the rank vector it
//! produces.

pub mod power;

pub use power::PowerIteration;

use serde::Serialize;

use crate::errors::Result;
use crate::types::NodeId;

/// Result of a power-iteration run
#[derive(Debug, Clone, PartialEq)]
pub struct EigenResult {
    /// Final vector, unnormalized
    pub vector: Vec<f64>,
    /// Number of matrix applications performed
    pub iterations: usize,
    /// Magnitude drop observed on the last step
    pub magnitude_drop: f64,
    /// Whether the run stopped on the magnitude test rather than the cap
    pub converged: bool,
}

impl EigenResult {
    /// Create a new eigen result
    pub fn new(vector: Vec<f64>, iterations: usize, magnitude_drop: f64, converged: bool) -> Self {
        Self {
            vector,
            iterations,
            magnitude_drop,
            converged,
        }
    }
}

/// Per-node scores, indexed like the transition matrix.
///
/// Scores are left exactly as power iteration produced them; use
/// [`RankVector::normalized`] for a probability distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankVector {
    /// Node id for each index
    pub ids: Vec<NodeId>,
    /// Score for each index
    pub scores: Vec<f64>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Whether the solver stopped before its iteration cap
    pub converged: bool,
}

impl RankVector {
    /// Pair a solver result with the graph's index -> id mapping
    pub fn from_eigen(ids: Vec<NodeId>, result: EigenResult) -> Self {
        debug_assert_eq!(ids.len(), result.vector.len());
        Self {
            ids,
            scores: result.vector,
            iterations: result.iterations,
            converged: result.converged,
        }
    }

    /// Score at a dense index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.scores.get(index).copied()
    }

    /// Score for a node id (linear search over `ids`)
    pub fn score(&self, id: NodeId) -> Option<f64> {
        self.ids
            .iter()
            .position(|&i| i == id)
            .and_then(|idx| self.get(idx))
    }

    /// Number of ranked nodes
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Check if no node was ranked
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate over `(id, score)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.ids.iter().copied().zip(self.scores.iter().copied())
    }

    /// Get top N nodes by score, ties broken by ascending id
    pub fn top_n(&self, n: usize) -> Vec<(NodeId, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }

    /// Scores rescaled to sum to 1 (unchanged if the sum is not positive)
    pub fn normalized(&self) -> Vec<f64> {
        let sum: f64 = self.scores.iter().sum();
        if sum > 0.0 {
            self.scores.iter().map(|s| s / sum).collect()
        } else {
            self.scores.clone()
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
