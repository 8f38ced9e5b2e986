//! Readers and writers for dependency graph treebank formats.
//!
//! Every format module provides a `Reader` implementing [`ReadGraph`],
//! a `Writer` implementing [`WriteGraph`], or both. [`Format`] selects
//! a reader or writer by name.
//!
//! [`ReadGraph`]: io::ReadGraph
//! [`WriteGraph`]: io::WriteGraph

mod error;
pub use crate::error::{Error, ParseError};

mod fields;
pub use crate::fields::FeaturesField;

mod format;
pub use crate::format::Format;

pub mod io;

pub mod linearize;

pub mod penman;

pub mod sagae;

pub mod sdp;

pub mod sequoia;

pub mod tikz;
