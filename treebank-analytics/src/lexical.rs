//! Analyzers over the words and labels of edges.

use std::collections::{BTreeMap, HashMap};

use depgraph::graph::Graph;
use depgraph::node::Node;
use depgraph::GraphError;

use crate::analyzer::{by_frequency, push_cumulated_rows, Analyzer, AnalyzerKind};
use crate::config::{LexicalField, PairType};
use crate::error::{ConfigError, Error};
use crate::table::Table;

fn node(graph: &Graph, index: usize) -> Result<&Node, GraphError> {
    graph.node(index).ok_or(GraphError::NodeNotFound { index })
}

/// Frequencies of (word, label) pairs.
///
/// The word is a field of the head, of the dependent, or of both
/// endpoints of an edge.
#[derive(Debug)]
pub struct LexicalLabelPairsAnalyzer {
    field: LexicalField,
    pair_type: PairType,
    pairs: HashMap<(String, String), usize>,
}

impl LexicalLabelPairsAnalyzer {
    pub fn new(field: LexicalField, pair_type: PairType) -> Self {
        LexicalLabelPairsAnalyzer {
            field,
            pair_type,
            pairs: HashMap::new(),
        }
    }
}

impl Analyzer for LexicalLabelPairsAnalyzer {
    fn name(&self) -> &'static str {
        AnalyzerKind::LexicalLabelPairs.name()
    }

    fn analyze(&mut self, graph: &Graph) -> Result<(), Error> {
        for edge in graph.edges() {
            let endpoints = match self.pair_type {
                PairType::Head => vec![edge.source()],
                PairType::Dependent => vec![edge.target()],
                PairType::Both => vec![edge.source(), edge.target()],
            };

            for index in endpoints {
                let word = self.field.value(node(graph, index)?).to_owned();
                *self
                    .pairs
                    .entry((word, edge.label().to_owned()))
                    .or_insert(0) += 1;
            }
        }

        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new(vec!["Pair", "#"]);
        let counts = by_frequency(self.pairs.iter().map(|(pair, &count)| (pair, count)));
        for ((word, label), count) in counts {
            table.push_row(vec![format!("{} / {}", word, label), count.to_string()]);
        }
        table
    }
}

/// Frequencies of (head word, dependent word) pairs per label.
#[derive(Debug)]
pub struct LexicalPairsByLabelAnalyzer {
    field: LexicalField,
    pairs: BTreeMap<String, HashMap<(String, String), usize>>,
}

impl LexicalPairsByLabelAnalyzer {
    pub fn new(field: LexicalField) -> Self {
        LexicalPairsByLabelAnalyzer {
            field,
            pairs: BTreeMap::new(),
        }
    }
}

impl Analyzer for LexicalPairsByLabelAnalyzer {
    fn name(&self) -> &'static str {
        AnalyzerKind::LexicalPairsByLabel.name()
    }

    fn analyze(&mut self, graph: &Graph) -> Result<(), Error> {
        for edge in graph.edges() {
            let head = self.field.value(node(graph, edge.source())?).to_owned();
            let dependent = self.field.value(node(graph, edge.target())?).to_owned();
            *self
                .pairs
                .entry(edge.label().to_owned())
                .or_default()
                .entry((head, dependent))
                .or_insert(0) += 1;
        }

        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new(vec!["Label", "Pair", "#"]);
        for (label, pairs) in &self.pairs {
            let counts = by_frequency(pairs.iter().map(|(pair, &count)| (pair, count)));
            for ((head, dependent), count) in counts {
                table.push_row(vec![
                    label.clone(),
                    format!("{} / {}", head, dependent),
                    count.to_string(),
                ]);
            }
        }
        table
    }
}

/// Frequencies of label paths.
///
/// A path is a sequence of `length` edges that starts at a token and
/// follows outgoing edges. Its labels are joined by `-`. Paths that
/// reach a node without outgoing edges before `length` edges are not
/// counted.
#[derive(Debug)]
pub struct DependencyPathsAnalyzer {
    length: usize,
    paths: HashMap<String, usize>,
    total: usize,
}

impl DependencyPathsAnalyzer {
    /// Construct the analyzer for paths of `length` edges.
    ///
    /// Returns an error if `length` is zero.
    pub fn new(length: usize) -> Result<Self, ConfigError> {
        if length == 0 {
            return Err(ConfigError::InvalidPathLength { length });
        }

        Ok(DependencyPathsAnalyzer {
            length,
            paths: HashMap::new(),
            total: 0,
        })
    }

    fn collect_paths<'a>(&mut self, graph: &'a Graph, node: usize, labels: &mut Vec<&'a str>) {
        let targets = match graph.targets_of(node) {
            Some(targets) => targets,
            None => return,
        };

        for edge in targets.values() {
            labels.push(edge.label());
            if labels.len() == self.length {
                *self.paths.entry(labels.join("-")).or_insert(0) += 1;
                self.total += 1;
            } else {
                self.collect_paths(graph, edge.target(), labels);
            }
            labels.pop();
        }
    }
}

impl Analyzer for DependencyPathsAnalyzer {
    fn name(&self) -> &'static str {
        AnalyzerKind::DependencyPaths.name()
    }

    fn analyze(&mut self, graph: &Graph) -> Result<(), Error> {
        let mut labels = Vec::with_capacity(self.length);
        for node in graph.nodes().filter(|node| !node.is_root()) {
            self.collect_paths(graph, node.index(), &mut labels);
        }

        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new(vec!["Path", "#", "%", "% Cumulated"]);
        let counts = by_frequency(self.paths.iter().map(|(path, &count)| (path, count)));
        push_cumulated_rows(&mut table, counts, self.total);
        table
    }
}
