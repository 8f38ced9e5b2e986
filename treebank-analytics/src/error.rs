use std::io;

use depgraph::GraphError;
use thiserror::Error;

/// Configuration error.
///
/// Configuration errors are reported when the configuration is loaded,
/// before any graph is read.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown analyzer: {name:?}")]
    UnknownAnalyzer { name: String },

    #[error("unknown scorer: {name:?}")]
    UnknownScorer { name: String },

    #[error("unknown table format: {value:?}")]
    UnknownTable { value: String },

    /// Bins with a zero step.
    #[error("invalid bins for {component}: start {start}, stop {stop}, step {step}")]
    InvalidBins {
        component: &'static str,
        start: usize,
        stop: usize,
        step: usize,
    },

    #[error("dependency path length should be at least 1, was {length}")]
    InvalidPathLength { length: usize },
}

/// Analysis or evaluation error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Format(#[from] treebank_formats::Error),

    #[error(transparent)]
    IO(#[from] io::Error),
}
