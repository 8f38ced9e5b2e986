//! Corpus statistics and evaluation for dependency graph treebanks.
//!
//! [`Analyzer`]s accumulate statistics over the graphs of a corpus,
//! [`Scorer`]s compare system graphs with gold graphs. Both render their
//! results as a [`Table`], which is output in a [`TableFormat`]. The
//! components to run are selected by name in a YAML [`Config`].

mod analyzer;
pub use crate::analyzer::{
    analyze_graphs, Analyzer, AnalyzerKind, CrossingEdgesAnalyzer, CyclesAnalyzer,
    EdgeLengthBinsAnalyzer, LabelsAnalyzer, NonPlanarAnalyzer, SentenceLengthBinsAnalyzer,
    VoidAnalyzer,
};

pub mod bins;

pub mod config;
pub use crate::config::Config;

mod error;
pub use crate::error::{ConfigError, Error};

mod lexical;
pub use crate::lexical::{
    DependencyPathsAnalyzer, LexicalLabelPairsAnalyzer, LexicalPairsByLabelAnalyzer,
};

mod scorer;
pub use crate::scorer::{
    evaluate, f1, AllScorer, Counts, EdgeLengthBinsScorer, Evaluation, FilteredScorer,
    LabelsScorer, Scorer, ScorerKind, Scores, SentenceBinsScorer,
};

mod table;
pub use crate::table::{Table, TableFormat};
