//! The owning graph
//!
//! [`Graph`] stores nodes contiguously and keeps an FxHashMap from external
//! node id to dense index. That index is the row/column of the node in the
//! transition matrix and its position in the rank vector, so ids may be
//! sparse, negative or arbitrarily large.

use rustc_hash::FxHashMap;

use super::node::Node;
use crate::errors::{PageRankError, Result};
use crate::matrix::{MatrixConfig, TransitionMatrix};
use crate::pagerank::{PowerIteration, RankVector};
use crate::types::{NodeId, RankConfig};

/// A directed graph together with its derived matrix and rank vector.
///
/// The matrix exists only after [`Graph::build_matrix`] and the rank vector
/// only after [`Graph::compute_ranks`]. Structural mutations discard both,
/// since their index space or content would no longer match the graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Maps node id -> dense index
    index: FxHashMap<NodeId, u32>,
    /// Node storage, position is the dense index
    nodes: Vec<Node>,
    matrix: Option<TransitionMatrix>,
    ranks: Option<RankVector>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with pre-allocated capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(node_capacity, Default::default()),
            nodes: Vec::with_capacity(node_capacity),
            matrix: None,
            ranks: None,
        }
    }

    /// Register a node under its id.
    ///
    /// An existing node with the same id is replaced (edges included) but
    /// keeps its dense index. Callers that only want to make sure a node
    /// exists should use [`Graph::get_or_create_node`].
    ///
    /// Every out-edge of `node` must point at a node already in the graph
    /// (or at `node` itself); otherwise nothing changes and
    /// [`PageRankError::UnknownTargetNode`] is returned.
    pub fn add_node(&mut self, node: Node) -> Result<u32> {
        if let Some(target) = node
            .out_edges()
            .find(|&t| t != node.id && !self.contains_node(t))
        {
            return Err(PageRankError::UnknownTargetNode(target));
        }
        Ok(self.insert_node(node))
    }

    fn insert_node(&mut self, node: Node) -> u32 {
        self.invalidate();
        if let Some(&idx) = self.index.get(&node.id) {
            self.nodes[idx as usize] = node;
            return idx;
        }

        let idx = self.nodes.len() as u32;
        self.index.insert(node.id, idx);
        self.nodes.push(node);
        idx
    }

    /// Get or create the node for `id`, returning its dense index
    pub fn get_or_create_node(&mut self, id: NodeId) -> u32 {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        self.insert_node(Node::new(id))
    }

    /// Add the edge `from -> to`.
    ///
    /// Both endpoints must already exist. Adding an existing edge again is a
    /// no-op.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        let from_idx = self
            .index_of(from)
            .ok_or(PageRankError::UnknownSourceNode(from))?;
        if !self.contains_node(to) {
            return Err(PageRankError::UnknownTargetNode(to));
        }

        if self.nodes[from_idx as usize].add_edge(to) {
            self.invalidate();
        }
        Ok(())
    }

    /// Check whether the edge `from -> to` exists.
    ///
    /// Fails when `from` is not a node of this graph.
    pub fn is_edge(&self, from: NodeId, to: NodeId) -> Result<bool> {
        self.node(from)
            .map(|node| node.has_edge(to))
            .ok_or(PageRankError::UnknownSourceNode(from))
    }

    /// Whether a node with this id exists
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Get a node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.nodes[idx as usize])
    }

    /// Get the dense index of a node id
    pub fn index_of(&self, id: NodeId) -> Option<u32> {
        self.index.get(&id).copied()
    }

    /// Iterate over all nodes in index order
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }

    /// Node ids in index order (the inverse of [`Graph::index_of`])
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of distinct directed edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(Node::out_degree).sum()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of nodes with no outgoing edges, in index order
    pub fn sink_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.is_sink())
            .map(|n| n.id)
            .collect()
    }

    /// Build a fresh transition matrix from the current edges.
    ///
    /// Replaces any previous matrix and discards previously computed ranks.
    pub fn build_matrix(&mut self, config: &MatrixConfig) -> Result<()> {
        self.ranks = None;
        self.matrix = None;
        self.matrix = Some(TransitionMatrix::from_graph(self, config)?);
        Ok(())
    }

    /// The transition matrix, if built
    pub fn matrix(&self) -> Option<&TransitionMatrix> {
        self.matrix.as_ref()
    }

    /// Compute ranks with the default power-iteration limits.
    pub fn compute_ranks(&mut self, initial_magnitude: f64) -> Result<&RankVector> {
        self.compute_ranks_with(&PowerIteration::default(), initial_magnitude)
    }

    /// Compute ranks with an explicit solver.
    ///
    /// Fails with [`PageRankError::MatrixNotBuilt`] if
    /// [`Graph::build_matrix`] has not run since the last mutation.
    pub fn compute_ranks_with(
        &mut self,
        solver: &PowerIteration,
        initial_magnitude: f64,
    ) -> Result<&RankVector> {
        if !initial_magnitude.is_finite() || initial_magnitude <= 0.0 {
            return Err(PageRankError::InvalidConfig(format!(
                "initial_magnitude must be finite and positive, got {initial_magnitude}"
            )));
        }
        let matrix = self.matrix.as_ref().ok_or(PageRankError::MatrixNotBuilt)?;

        let result = solver.run(matrix, initial_magnitude);
        let ranks = RankVector::from_eigen(self.node_ids(), result);
        Ok(self.ranks.insert(ranks))
    }

    /// The rank vector, if computed
    pub fn ranks(&self) -> Option<&RankVector> {
        self.ranks.as_ref()
    }

    /// Rank of a node, if ranks are computed and the node exists
    pub fn rank_of(&self, id: NodeId) -> Option<f64> {
        let idx = self.index_of(id)?;
        self.ranks.as_ref()?.get(idx as usize)
    }

    /// Validate `config`, build the matrix and compute ranks in one call.
    pub fn rank(&mut self, config: &RankConfig) -> Result<&RankVector> {
        config.validate()?;
        self.build_matrix(&config.matrix_config())?;
        self.compute_ranks_with(&config.solver(), config.initial_magnitude)
    }

    fn invalidate(&mut self) {
        self.matrix = None;
        self.ranks = None;
    }
}
