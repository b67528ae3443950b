//! Graph vertices.

use rustc_hash::FxHashSet;

use crate::types::NodeId;

/// A vertex with an identity and a set of outgoing edge targets.
///
/// Edges have set semantics: adding the same target twice is a no-op, so the
/// out-degree always equals the number of distinct targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Graph-scoped identity
    pub id: NodeId,
    out_edges: FxHashSet<NodeId>,
}

impl Node {
    /// Create a new node without edges
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            out_edges: FxHashSet::default(),
        }
    }

    /// Add an edge to `target`.
    ///
    /// Returns `true` if the edge is new. Self-loops are accepted.
    pub fn add_edge(&mut self, target: NodeId) -> bool {
        self.out_edges.insert(target)
    }

    /// Check whether an edge to `target` exists
    pub fn has_edge(&self, target: NodeId) -> bool {
        self.out_edges.contains(&target)
    }

    /// Number of distinct outgoing edges
    pub fn out_degree(&self) -> usize {
        self.out_edges.len()
    }

    /// Whether this node has no outgoing edges
    pub fn is_sink(&self) -> bool {
        self.out_edges.is_empty()
    }

    /// Iterate over edge targets (unordered)
    pub fn out_edges(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_sink() {
        let node = Node::new(3);
        assert_eq!(node.id, 3);
        assert_eq!(node.out_degree(), 0);
        assert!(node.is_sink());
    }

    #[test]
    fn test_duplicate_edge_does_not_grow_degree() {
        let mut node = Node::new(1);
        assert!(node.add_edge(2));
        assert!(!node.add_edge(2));
        assert_eq!(node.out_degree(), 1);
        assert!(node.has_edge(2));
        assert!(!node.has_edge(3));
    }

    #[test]
    fn test_self_loop_counts_as_edge() {
        let mut node = Node::new(5);
        node.add_edge(5);
        assert!(node.has_edge(5));
        assert_eq!(node.out_degree(), 1);
        assert!(!node.is_sink());
    }

    #[test]
    fn test_out_edges_iteration() {
        let mut node = Node::new(0);
        node.add_edge(4);
        node.add_edge(2);
        let mut targets: Vec<_> = node.out_edges().collect();
        targets.sort_unstable();
        assert_eq!(targets, vec![2, 4]);
    }
}
