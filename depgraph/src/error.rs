use thiserror::Error;

/// Graph processing error.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum GraphError {
    #[error("node {index:?} is not in the graph")]
    NodeNotFound { index: usize },

    #[error("there is no edge from {head:?} to {dependent:?}")]
    EdgeNotFound { head: usize, dependent: usize },

    /// A DFS priority name that is not one of `LEFT`, `RIGHT`, `MIN`, `LABEL`.
    #[error("unknown DFS priority: {value:?}")]
    UnknownPriority { value: String },
}
