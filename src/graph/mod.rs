//! Graph construction and representation
//!
//! This module provides the node/edge data model and the owning [`Graph`]
//! that maps sparse external node ids onto a dense matrix index space.

pub mod builder;
pub mod node;

pub use builder::Graph;
pub use node::Node;
