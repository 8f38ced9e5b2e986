use depgraph::graph::Edge;
use thiserror::Error;

/// Linearization errors.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum EncodeError {
    /// The graph does not have a node with index 0.
    #[error("graph does not have a root node")]
    MissingRoot,

    /// Transitions only relate distinct stack and buffer nodes.
    #[error("self-loop on node {node:?} cannot be encoded")]
    SelfLoop { node: usize },

    /// None of the transitions applies in the current configuration.
    #[error("no transition applies (stack top: {stack_top:?}, buffer front: {buffer_front:?})")]
    NoTransition {
        stack_top: Option<usize>,
        buffer_front: usize,
    },

    /// The buffer is exhausted, but some edges were never encoded.
    #[error("{} edge(s) cannot be expressed by the transition system", .edges.len())]
    UnaccountedEdges { edges: Vec<Edge> },
}

/// Errors in the textual form of an action.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseActionError {
    #[error("unknown action: {value:?}")]
    UnknownAction { value: String },

    #[error("action requires a label: {value:?}")]
    MissingLabel { value: String },

    #[error("action does not take a label: {value:?}")]
    UnexpectedLabel { value: String },
}
