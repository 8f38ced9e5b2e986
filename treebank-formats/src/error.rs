use std::io;

use depgraph_transition::{EncodeError, ParseActionError};
use thiserror::Error;

/// Treebank IO error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Error in file IO.
    #[error("error reading or writing treebank")]
    IO(#[from] io::Error),

    /// Parsing error.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The graph cannot be linearized.
    #[error("cannot linearize graph")]
    Encode(#[from] EncodeError),

    /// The format name is not known.
    #[error("unknown format: {value:?}")]
    UnknownFormat { value: String },

    /// The format has no reader.
    #[error("format {format} cannot be read")]
    UnsupportedReader { format: String },

    /// The format has no writer.
    #[error("format {format} cannot be written")]
    UnsupportedWriter { format: String },
}

/// Treebank parsing errors.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    /// A required column is missing.
    #[error("{field} field is missing in line: {line:?}")]
    MissingField { field: &'static str, line: String },

    /// The feature field could not be parsed
    #[error("cannot parse feature field: {value:?}")]
    IncorrectFeatureField { value: String },

    /// An integer field could not be parsed as an integer.
    #[error("cannot parse as integer field: {value:?}")]
    ParseIntField { value: String },

    /// An SDP argument column without a matching predicate.
    #[error("argument column {column} has no predicate")]
    UnknownPredicate { column: usize },

    /// The action sequence of a linearized graph could not be parsed.
    #[error(transparent)]
    Action(#[from] ParseActionError),
}
