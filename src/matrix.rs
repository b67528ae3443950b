//! Dense row-stochastic transition matrix
//!
//! Row `u` holds the probabilities of moving from node `u` to every other
//! node. The matrix is stored as one contiguous row-major buffer of `n * n`
//! doubles, sized once at construction.

use std::ops::Index;

use crate::errors::{PageRankError, Result};
use crate::graph::Graph;
use crate::pagerank::{EigenResult, PowerIteration};
use crate::types::{SinkPolicy, DEFAULT_DAMPING_FACTOR};

/// Parameters for turning a graph into a transition matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixConfig {
    /// Probability of following an out-edge (`1 - d` stays on the node)
    pub damping_factor: f64,
    /// Treatment of nodes without out-edges
    pub sink_policy: SinkPolicy,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            damping_factor: DEFAULT_DAMPING_FACTOR,
            sink_policy: SinkPolicy::default(),
        }
    }
}

impl MatrixConfig {
    /// Create a config with the given damping factor and the default sink policy
    pub fn with_damping(damping_factor: f64) -> Self {
        Self {
            damping_factor,
            ..Self::default()
        }
    }
}

/// A dense `n x n` matrix of transition probabilities
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    n: usize,
    data: Box<[f64]>,
}

impl TransitionMatrix {
    /// Create an all-zero matrix of dimension `n`
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n].into_boxed_slice(),
        }
    }

    /// Build the transition matrix of `graph`.
    ///
    /// For a node `u` with out-degree `k > 0`, every edge `u -> v` gets
    /// `d / k` and the diagonal cell `(u, u)` additionally gets `1 - d`.
    /// A self-loop edge therefore lands on the diagonal as `d / k + (1 - d)`.
    /// Sinks follow `config.sink_policy`.
    pub fn from_graph(graph: &Graph, config: &MatrixConfig) -> Result<Self> {
        trace_stage!("build_matrix");
        let d = config.damping_factor;
        if !d.is_finite() || !(0.0..=1.0).contains(&d) {
            return Err(PageRankError::InvalidConfig(format!(
                "damping_factor must lie in [0, 1], got {d}"
            )));
        }

        let mut matrix = Self::zeros(graph.node_count());
        let mut sinks = 0usize;

        for (u, node) in graph.nodes() {
            let u = u as usize;
            let degree = node.out_degree();

            if degree == 0 {
                match config.sink_policy {
                    SinkPolicy::Reject => return Err(PageRankError::ZeroOutDegree(node.id)),
                    SinkPolicy::SelfLoop => {
                        matrix.set(u, u, 1.0);
                        sinks += 1;
                        continue;
                    }
                }
            }

            let p = d / degree as f64;
            for target in node.out_edges() {
                let v = graph
                    .index_of(target)
                    .ok_or(PageRankError::UnknownTargetNode(target))?;
                matrix.set(u, v as usize, p);
            }
            matrix.add(u, u, 1.0 - d);
        }

        if sinks > 0 {
            trace_event!(debug, sinks, "sink nodes kept as self-loops");
        }
        trace_event!(
            debug,
            nodes = matrix.n,
            edges = graph.edge_count(),
            damping = d,
            "transition matrix built"
        );
        Ok(matrix)
    }

    /// Matrix dimension `n`
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Whether the matrix has dimension zero
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Entry at `(row, col)`, `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.n || col >= self.n {
            return None;
        }
        self.data.get(row * self.n + col).copied()
    }

    /// A full row as a slice
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.n {
            return None;
        }
        Some(&self.data[row * self.n..(row + 1) * self.n])
    }

    /// Sum of a row's entries (1.0 for every row of a built matrix)
    pub fn row_sum(&self, row: usize) -> Option<f64> {
        self.row(row).map(|r| r.iter().sum())
    }

    /// Replace `v` with `M * v`.
    ///
    /// Uses one scratch buffer of length `n`.
    pub fn apply(&self, v: &mut [f64]) -> Result<()> {
        self.check_len(v.len())?;
        let mut scratch = vec![0.0; self.n];
        self.multiply(v, &mut scratch);
        v.copy_from_slice(&scratch);
        Ok(())
    }

    /// Write `M * src` into `dst`
    pub fn apply_into(&self, src: &[f64], dst: &mut [f64]) -> Result<()> {
        self.check_len(src.len())?;
        self.check_len(dst.len())?;
        self.multiply(src, dst);
        Ok(())
    }

    /// Principal eigenvector by power iteration with the default limits.
    ///
    /// See [`PowerIteration::run`] for the stopping rule.
    pub fn principal_eigenvector(&self, initial_magnitude: f64) -> EigenResult {
        PowerIteration::default().run(self, initial_magnitude)
    }

    /// Dense product; lengths are checked by the callers.
    pub(crate) fn multiply(&self, src: &[f64], dst: &mut [f64]) {
        for (out, row) in dst.iter_mut().zip(self.data.chunks_exact(self.n.max(1))) {
            *out = row.iter().zip(src).map(|(m, x)| m * x).sum();
        }
    }

    fn check_len(&self, got: usize) -> Result<()> {
        if got != self.n {
            return Err(PageRankError::DimensionMismatch {
                expected: self.n,
                got,
            });
        }
        Ok(())
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    fn add(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] += value;
    }
}

impl Index<(usize, usize)> for TransitionMatrix {
    type Output = f64;

    /// Panics when out of bounds, like slice indexing
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.n && col < self.n,
            "index ({row}, {col}) out of bounds for {n}x{n} matrix",
            n = self.n
        );
        &self.data[row * self.n + col]
    }
}

/// Euclidean norm `sqrt(sum v_i^2)`
pub fn magnitude(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    fn graph_from(edges: &[(i64, i64)]) -> Graph {
        let mut graph = Graph::new();
        for &(from, to) in edges {
            graph.get_or_create_node(from);
            graph.get_or_create_node(to);
            graph.add_edge(from, to).unwrap();
        }
        graph
    }

    fn idx(graph: &Graph, id: i64) -> usize {
        graph.index_of(id).unwrap() as usize
    }

    #[test]
    fn test_zeros() {
        let m = TransitionMatrix::zeros(3);
        assert_eq!(m.dim(), 3);
        assert!((0..3).all(|r| m.row_sum(r) == Some(0.0)));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn test_entries_for_star() {
        let graph = graph_from(&[(1, 2), (1, 3), (2, 1), (3, 1)]);
        let m = TransitionMatrix::from_graph(&graph, &MatrixConfig::with_damping(0.8)).unwrap();

        let (a, b, c) = (idx(&graph, 1), idx(&graph, 2), idx(&graph, 3));
        assert!((m[(a, b)] - 0.4).abs() < 1e-12);
        assert!((m[(a, c)] - 0.4).abs() < 1e-12);
        assert!((m[(a, a)] - 0.2).abs() < 1e-12);
        assert!((m[(b, a)] - 0.8).abs() < 1e-12);
        assert_eq!(m[(b, c)], 0.0);
    }

    #[test]
    fn test_rows_are_stochastic() {
        let graph = graph_from(&[(1, 2), (1, 3), (2, 3), (3, 1), (3, 2)]);
        let m = TransitionMatrix::from_graph(&graph, &MatrixConfig::default()).unwrap();

        for r in 0..m.dim() {
            assert!((m.row_sum(r).unwrap() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_self_loop_is_additive() {
        let graph = graph_from(&[(1, 1), (1, 2), (2, 1)]);
        let m = TransitionMatrix::from_graph(&graph, &MatrixConfig::with_damping(0.9)).unwrap();

        let a = idx(&graph, 1);
        assert!((m[(a, a)] - (0.45 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_sink_self_loop_policy() {
        let graph = graph_from(&[(1, 2)]);
        let m = TransitionMatrix::from_graph(&graph, &MatrixConfig::default()).unwrap();

        let b = idx(&graph, 2);
        assert_eq!(m[(b, b)], 1.0);
        assert_eq!(m.row_sum(b), Some(1.0));
    }

    #[test]
    fn test_sink_reject_policy() {
        let graph = graph_from(&[(1, 2)]);
        let config = MatrixConfig {
            sink_policy: SinkPolicy::Reject,
            ..MatrixConfig::default()
        };

        let err = TransitionMatrix::from_graph(&graph, &config).unwrap_err();
        assert!(matches!(err, PageRankError::ZeroOutDegree(2)));
    }

    #[test]
    fn test_isolated_node_added_directly() {
        let mut graph = Graph::new();
        graph.add_node(Node::new(7)).unwrap();
        let m = TransitionMatrix::from_graph(&graph, &MatrixConfig::default()).unwrap();
        assert_eq!(m.get(0, 0), Some(1.0));
    }

    #[test]
    fn test_invalid_damping() {
        let graph = graph_from(&[(1, 2), (2, 1)]);
        let err = TransitionMatrix::from_graph(&graph, &MatrixConfig::with_damping(1.5));
        assert!(matches!(err, Err(PageRankError::InvalidConfig(_))));
    }

    #[test]
    fn test_build_is_deterministic() {
        let graph = graph_from(&[(1, 2), (1, 3), (2, 3), (3, 1), (4, 1), (4, 2)]);
        let first = TransitionMatrix::from_graph(&graph, &MatrixConfig::default()).unwrap();
        let second = TransitionMatrix::from_graph(&graph, &MatrixConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_apply() {
        let graph = graph_from(&[(1, 2), (2, 1)]);
        let m = TransitionMatrix::from_graph(&graph, &MatrixConfig::with_damping(1.0)).unwrap();

        let mut v = vec![1.0, 3.0];
        m.apply(&mut v).unwrap();
        assert_eq!(v, vec![3.0, 1.0]);
    }

    #[test]
    fn test_apply_dimension_mismatch() {
        let m = TransitionMatrix::zeros(2);
        let mut v = vec![1.0; 3];
        assert!(matches!(
            m.apply(&mut v),
            Err(PageRankError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        ));

        let mut dst = vec![0.0; 1];
        assert!(m.apply_into(&[1.0, 1.0], &mut dst).is_err());
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(magnitude(&[3.0, 4.0]), 5.0);
        assert_eq!(magnitude(&[]), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_panics() {
        let m = TransitionMatrix::zeros(2);
        let _ = m[(0, 2)];
    }
}
