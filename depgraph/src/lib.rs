//! Labeled dependency graphs over treebank sentences.
//!
//! A [`Graph`](graph::Graph) stores the nodes of a sentence (with the
//! synthetic root at index 0) and a set of labeled, directed edges. The
//! [`algo`] module provides the analyses that are used for corpus
//! statistics and serialization: cycle detection and DFS decomposition.
//! Crossing edges are computed by the graph itself.

mod error;
pub use crate::error::GraphError;

pub mod algo;

pub mod graph;

pub mod node;
