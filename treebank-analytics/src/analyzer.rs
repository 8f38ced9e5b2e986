//! Corpus analyzers.
//!
//! An analyzer accumulates statistics over the graphs of a corpus and
//! renders them as a single table.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use depgraph::algo::strongly_connected_components;
use depgraph::graph::Graph;
use itertools::Itertools;
use tracing::debug;

use crate::bins::{Bin, Bins};
use crate::config::Config;
use crate::error::{ConfigError, Error};
use crate::lexical::{
    DependencyPathsAnalyzer, LexicalLabelPairsAnalyzer, LexicalPairsByLabelAnalyzer,
};
use crate::table::{decimal, percentage, Table};

/// A trait for corpus analyzers.
pub trait Analyzer {
    /// The name of the analyzer.
    fn name(&self) -> &'static str;

    /// Add the statistics of a graph.
    ///
    /// # Errors
    ///
    /// Analyzers that look up the endpoints of edges fail when an endpoint
    /// is not a node of the graph.
    fn analyze(&mut self, graph: &Graph) -> Result<(), Error>;

    /// Render the accumulated statistics.
    fn table(&self) -> Table;
}

impl<A> Analyzer for Box<A>
where
    A: Analyzer + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn analyze(&mut self, graph: &Graph) -> Result<(), Error> {
        (**self).analyze(graph)
    }

    fn table(&self) -> Table {
        (**self).table()
    }
}

/// Run analyzers over a sequence of graphs.
///
/// Returns the number of graphs that were analyzed.
pub fn analyze_graphs<A, I>(analyzers: &mut [A], graphs: I) -> Result<usize, Error>
where
    A: Analyzer,
    I: IntoIterator<Item = Result<Graph, treebank_formats::Error>>,
{
    let mut n_graphs = 0;

    for graph in graphs {
        let graph = graph?;
        for analyzer in analyzers.iter_mut() {
            analyzer.analyze(&graph)?;
        }
        n_graphs += 1;
    }

    debug!(graphs = n_graphs, "analyzed corpus");

    Ok(n_graphs)
}

/// Analyzers, by name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnalyzerKind {
    Void,
    CrossingEdges,
    NonPlanar,
    Cycles,
    Labels,
    EdgeLengthBins,
    SentenceLengthBins,
    LexicalLabelPairs,
    LexicalPairsByLabel,
    DependencyPaths,
}

impl AnalyzerKind {
    /// All known analyzers.
    pub const ALL: [AnalyzerKind; 10] = [
        AnalyzerKind::Void,
        AnalyzerKind::CrossingEdges,
        AnalyzerKind::NonPlanar,
        AnalyzerKind::Cycles,
        AnalyzerKind::Labels,
        AnalyzerKind::EdgeLengthBins,
        AnalyzerKind::SentenceLengthBins,
        AnalyzerKind::LexicalLabelPairs,
        AnalyzerKind::LexicalPairsByLabel,
        AnalyzerKind::DependencyPaths,
    ];

    /// The name of the analyzer, as used in the configuration.
    pub fn name(self) -> &'static str {
        match self {
            AnalyzerKind::Void => "VoidAnalyzer",
            AnalyzerKind::CrossingEdges => "CrossingEdgesAnalyzer",
            AnalyzerKind::NonPlanar => "NonPlanarAnalyzer",
            AnalyzerKind::Cycles => "CyclesAnalyzer",
            AnalyzerKind::Labels => "LabelsAnalyzer",
            AnalyzerKind::EdgeLengthBins => "EdgeLengthBinsAnalyzer",
            AnalyzerKind::SentenceLengthBins => "SentenceLengthBinsAnalyzer",
            AnalyzerKind::LexicalLabelPairs => "LexicalLabelPairsAnalyzer",
            AnalyzerKind::LexicalPairsByLabel => "LexicalPairsByLabelAnalyzer",
            AnalyzerKind::DependencyPaths => "DependencyPathsAnalyzer",
        }
    }

    /// Construct the analyzer with its section of the configuration.
    pub fn build(self, config: &Config) -> Result<Box<dyn Analyzer>, ConfigError> {
        let analyzer: Box<dyn Analyzer> = match self {
            AnalyzerKind::Void => Box::new(VoidAnalyzer::new(
                config.void_analyzer.void_labels.iter().cloned(),
            )),
            AnalyzerKind::CrossingEdges => Box::new(CrossingEdgesAnalyzer::default()),
            AnalyzerKind::NonPlanar => Box::new(NonPlanarAnalyzer::default()),
            AnalyzerKind::Cycles => Box::new(CyclesAnalyzer::default()),
            AnalyzerKind::Labels => Box::new(LabelsAnalyzer::default()),
            AnalyzerKind::EdgeLengthBins => Box::new(EdgeLengthBinsAnalyzer::new(
                config.edge_length_bins_analyzer.bins(self.name())?,
            )),
            AnalyzerKind::SentenceLengthBins => Box::new(SentenceLengthBinsAnalyzer::new(
                config.sentence_length_bins_analyzer.bins(self.name())?,
            )),
            AnalyzerKind::LexicalLabelPairs => {
                let section = &config.lexical_label_pairs_analyzer;
                Box::new(LexicalLabelPairsAnalyzer::new(
                    section.lexical,
                    section.pair_type,
                ))
            }
            AnalyzerKind::LexicalPairsByLabel => Box::new(LexicalPairsByLabelAnalyzer::new(
                config.lexical_pairs_by_label_analyzer.lexical,
            )),
            AnalyzerKind::DependencyPaths => Box::new(DependencyPathsAnalyzer::new(
                config.dependency_paths_analyzer.length,
            )?),
        };

        Ok(analyzer)
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnalyzerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalyzerKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownAnalyzer { name: s.to_owned() })
    }
}

/// Sort counts by decreasing frequency, ties by key.
pub(crate) fn by_frequency<K, I>(counts: I) -> Vec<(K, usize)>
where
    K: Ord,
    I: IntoIterator<Item = (K, usize)>,
{
    counts
        .into_iter()
        .sorted_by(|(key1, count1), (key2, count2)| {
            count2.cmp(count1).then_with(|| key1.cmp(key2))
        })
        .collect()
}

/// Add rows with a count, its percentage and the cumulated percentage.
pub(crate) fn push_cumulated_rows<K>(table: &mut Table, counts: Vec<(K, usize)>, total: usize)
where
    K: fmt::Display,
{
    let mut cumulated = 0.;
    for (key, count) in counts {
        let percent = percentage(count as f64, total as f64);
        cumulated += percent;
        table.push_row(vec![
            key.to_string(),
            count.to_string(),
            decimal(percent),
            decimal(cumulated),
        ]);
    }
}

fn push_bin_rows(table: &mut Table, counts: &BTreeMap<Bin, usize>, total: usize) {
    for (bin, &count) in counts {
        table.push_row(vec![
            bin.to_string(),
            count.to_string(),
            decimal(percentage(count as f64, total as f64)),
        ]);
    }
}

/// Counts tokens without edges and tokens attached by void labels.
///
/// Every edge with a void label is counted once for each of its
/// endpoints. Totals include the root node.
#[derive(Debug, Default)]
pub struct VoidAnalyzer {
    void_labels: HashSet<String>,
    tokens: usize,
    void: usize,
}

impl VoidAnalyzer {
    pub fn new<I, S>(void_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        VoidAnalyzer {
            void_labels: void_labels.into_iter().map(Into::into).collect(),
            ..VoidAnalyzer::default()
        }
    }
}

impl Analyzer for VoidAnalyzer {
    fn name(&self) -> &'static str {
        AnalyzerKind::Void.name()
    }

    fn analyze(&mut self, graph: &Graph) -> Result<(), Error> {
        let void_labels = &self.void_labels;
        let void: usize = graph
            .nodes()
            .map(|node| match graph.edges_of(node.index()) {
                Some(edges) => edges
                    .iter()
                    .filter(|edge| void_labels.contains(edge.label()))
                    .count(),
                None => 1,
            })
            .sum();

        self.tokens += graph.order();
        self.void += void;

        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new(vec!["# Tokens", "# Void", "% Void"]);
        table.push_row(vec![
            self.tokens.to_string(),
            self.void.to_string(),
            decimal(percentage(self.void as f64, self.tokens as f64)),
        ]);
        table
    }
}

/// Counts crossing edges.
///
/// The number of crossings is estimated as half of the number of edges
/// that cross another edge.
#[derive(Debug, Default)]
pub struct CrossingEdgesAnalyzer {
    edges: usize,
    crossing_edges: usize,
}

impl Analyzer for CrossingEdgesAnalyzer {
    fn name(&self) -> &'static str {
        AnalyzerKind::CrossingEdges.name()
    }

    fn analyze(&mut self, graph: &Graph) -> Result<(), Error> {
        self.edges += graph.len();
        self.crossing_edges += graph.crossing_edges().len();
        Ok(())
    }

    fn table(&self) -> Table {
        let crossings = self.crossing_edges as f64 / 2.;

        let mut table = Table::new(vec!["# Edges", "# Crossings Edges", "% Crossings Edges"]);
        table.push_row(vec![
            self.edges.to_string(),
            crossings.to_string(),
            decimal(percentage(crossings, self.edges as f64)),
        ]);
        table
    }
}

/// Counts graphs with crossing edges.
#[derive(Debug, Default)]
pub struct NonPlanarAnalyzer {
    graphs: usize,
    non_planar: usize,
}

impl Analyzer for NonPlanarAnalyzer {
    fn name(&self) -> &'static str {
        AnalyzerKind::NonPlanar.name()
    }

    fn analyze(&mut self, graph: &Graph) -> Result<(), Error> {
        self.graphs += 1;
        if !graph.crossing_edges().is_empty() {
            self.non_planar += 1;
        }
        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new(vec![
            "# Graphs",
            "# Non Planar Graphs",
            "% Non Planar Graphs",
        ]);
        table.push_row(vec![
            self.graphs.to_string(),
            self.non_planar.to_string(),
            decimal(percentage(self.non_planar as f64, self.graphs as f64)),
        ]);
        table
    }
}

/// Counts acyclic graphs and cycles.
///
/// Each strongly connected component of two or more nodes is a cycle.
#[derive(Debug, Default)]
pub struct CyclesAnalyzer {
    graphs: usize,
    dags: usize,
    cycles: usize,
}

impl Analyzer for CyclesAnalyzer {
    fn name(&self) -> &'static str {
        AnalyzerKind::Cycles.name()
    }

    fn analyze(&mut self, graph: &Graph) -> Result<(), Error> {
        let cycles = strongly_connected_components(graph).len();

        self.graphs += 1;
        self.cycles += cycles;
        if cycles == 0 {
            self.dags += 1;
        }

        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new(vec!["# Graphs", "# DAGs", "% DAGs", "# Cycles"]);
        table.push_row(vec![
            self.graphs.to_string(),
            self.dags.to_string(),
            decimal(percentage(self.dags as f64, self.graphs as f64)),
            self.cycles.to_string(),
        ]);
        table
    }
}

/// Label frequencies.
#[derive(Debug, Default)]
pub struct LabelsAnalyzer {
    edges: usize,
    labels: HashMap<String, usize>,
}

impl Analyzer for LabelsAnalyzer {
    fn name(&self) -> &'static str {
        AnalyzerKind::Labels.name()
    }

    fn analyze(&mut self, graph: &Graph) -> Result<(), Error> {
        self.edges += graph.len();
        for edge in graph.edges() {
            *self.labels.entry(edge.label().to_owned()).or_insert(0) += 1;
        }
        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new(vec!["Label", "#", "%", "% Cumulated"]);
        let counts = by_frequency(self.labels.iter().map(|(label, &count)| (label, count)));
        push_cumulated_rows(&mut table, counts, self.edges);
        table
    }
}

/// Edge length distribution.
#[derive(Debug)]
pub struct EdgeLengthBinsAnalyzer {
    bins: Bins,
    edges: usize,
    lengths: BTreeMap<Bin, usize>,
}

impl EdgeLengthBinsAnalyzer {
    pub fn new(bins: Bins) -> Self {
        EdgeLengthBinsAnalyzer {
            bins,
            edges: 0,
            lengths: BTreeMap::new(),
        }
    }
}

impl Analyzer for EdgeLengthBinsAnalyzer {
    fn name(&self) -> &'static str {
        AnalyzerKind::EdgeLengthBins.name()
    }

    fn analyze(&mut self, graph: &Graph) -> Result<(), Error> {
        self.edges += graph.len();
        for edge in graph.edges() {
            *self.lengths.entry(self.bins.bin(edge.length())).or_insert(0) += 1;
        }
        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new(vec!["Length", "#", "%"]);
        push_bin_rows(&mut table, &self.lengths, self.edges);
        table
    }
}

/// Sentence length distribution.
///
/// The length of a sentence is the order of its graph, including the
/// root.
#[derive(Debug)]
pub struct SentenceLengthBinsAnalyzer {
    bins: Bins,
    graphs: usize,
    lengths: BTreeMap<Bin, usize>,
}

impl SentenceLengthBinsAnalyzer {
    pub fn new(bins: Bins) -> Self {
        SentenceLengthBinsAnalyzer {
            bins,
            graphs: 0,
            lengths: BTreeMap::new(),
        }
    }
}

impl Analyzer for SentenceLengthBinsAnalyzer {
    fn name(&self) -> &'static str {
        AnalyzerKind::SentenceLengthBins.name()
    }

    fn analyze(&mut self, graph: &Graph) -> Result<(), Error> {
        self.graphs += 1;
        *self.lengths.entry(self.bins.bin(graph.order())).or_insert(0) += 1;
        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new(vec!["Length", "#", "%"]);
        push_bin_rows(&mut table, &self.lengths, self.graphs);
        table
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::BufReader;

    use treebank_formats::io::ReadGraph;
    use treebank_formats::Format;

    use super::{
        analyze_graphs, Analyzer, AnalyzerKind, CrossingEdgesAnalyzer, CyclesAnalyzer,
        EdgeLengthBinsAnalyzer, LabelsAnalyzer, NonPlanarAnalyzer, SentenceLengthBinsAnalyzer,
        VoidAnalyzer,
    };
    use crate::bins::Bins;
    use crate::config::Config;
    use crate::error::ConfigError;
    use crate::tests::{graph_with_edges, rows, TEST_GRAPHS};

    fn run<A: Analyzer>(mut analyzer: A) -> A {
        for graph in TEST_GRAPHS.iter() {
            analyzer.analyze(graph).unwrap();
        }
        analyzer
    }

    #[test]
    fn void_tokens() {
        let table = run(VoidAnalyzer::default()).table();
        assert_eq!(table.header(), &["# Tokens", "# Void", "% Void"]);
        assert_eq!(rows(&table), vec!["10\t0\t0.00"]);

        // Both endpoints of the ponct edge count.
        let table = run(VoidAnalyzer::new(vec!["ponct"])).table();
        assert_eq!(rows(&table), vec!["10\t2\t20.00"]);
    }

    #[test]
    fn void_isolated_tokens() {
        let mut analyzer = VoidAnalyzer::default();
        analyzer
            .analyze(&graph_with_edges(3, &[(0, "root", 1)]))
            .unwrap();
        assert_eq!(rows(&analyzer.table()), vec!["4\t2\t50.00"]);
    }

    #[test]
    fn crossing_edges() {
        let table = run(CrossingEdgesAnalyzer::default()).table();
        assert_eq!(rows(&table), vec!["9\t1\t11.11"]);
    }

    #[test]
    fn non_planar_graphs() {
        let table = run(NonPlanarAnalyzer::default()).table();
        assert_eq!(rows(&table), vec!["2\t1\t50.00"]);
    }

    #[test]
    fn cycles() {
        let table = run(CyclesAnalyzer::default()).table();
        assert_eq!(table.header(), &["# Graphs", "# DAGs", "% DAGs", "# Cycles"]);
        assert_eq!(rows(&table), vec!["2\t1\t50.00\t1"]);
    }

    #[test]
    fn labels() {
        let table = run(LabelsAnalyzer::default()).table();
        assert_eq!(
            rows(&table),
            vec![
                "root\t2\t22.22\t22.22",
                "y\t2\t22.22\t44.44",
                "det\t1\t11.11\t55.56",
                "ponct\t1\t11.11\t66.67",
                "suj\t1\t11.11\t77.78",
                "x\t1\t11.11\t88.89",
                "z\t1\t11.11\t100.00",
            ]
        );
    }

    #[test]
    fn edge_length_bins() {
        let bins = Bins::new("EdgeLengthBinsAnalyzer", 1, 4, 2).unwrap();
        let table = run(EdgeLengthBinsAnalyzer::new(bins)).table();
        assert_eq!(rows(&table), vec!["1-2\t8\t88.89", "3-4\t1\t11.11"]);
    }

    #[test]
    fn sentence_length_bins() {
        let table = run(SentenceLengthBinsAnalyzer::new(Bins::default())).table();
        assert_eq!(rows(&table), vec!["1-10\t2\t100.00"]);

        let bins = Bins::new("SentenceLengthBinsAnalyzer", 1, 4, 2).unwrap();
        let table = run(SentenceLengthBinsAnalyzer::new(bins)).table();
        assert_eq!(rows(&table), vec!["4+\t2\t100.00"]);
    }

    #[test]
    fn analyzers_by_name() {
        for kind in AnalyzerKind::ALL.iter() {
            assert_eq!(kind.name().parse::<AnalyzerKind>().unwrap(), *kind);
            assert_eq!(kind.build(&Config::default()).unwrap().name(), kind.name());
        }

        assert!(matches!(
            "voidanalyzer".parse::<AnalyzerKind>(),
            Err(ConfigError::UnknownAnalyzer { .. })
        ));
    }

    #[test]
    fn analyze_graph_stream() {
        let mut analyzers = vec![
            AnalyzerKind::Cycles.build(&Config::default()).unwrap(),
            AnalyzerKind::NonPlanar.build(&Config::default()).unwrap(),
        ];

        let n_graphs =
            analyze_graphs(&mut analyzers, TEST_GRAPHS.iter().cloned().map(Ok)).unwrap();
        assert_eq!(n_graphs, 2);
        assert_eq!(rows(&analyzers[0].table()), vec!["2\t1\t50.00\t1"]);
        assert_eq!(rows(&analyzers[1].table()), vec!["2\t1\t50.00"]);
    }

    #[test]
    fn analyze_file() {
        let reader = Format::Sequoia
            .reader(BufReader::new(File::open("testdata/gold.conll").unwrap()), false)
            .unwrap();
        let mut analyzers = vec![
            AnalyzerKind::Cycles.build(&Config::default()).unwrap(),
            AnalyzerKind::Void.build(&Config::default()).unwrap(),
        ];

        assert_eq!(analyze_graphs(&mut analyzers, reader.graphs()).unwrap(), 2);
        assert_eq!(rows(&analyzers[0].table()), vec!["2\t2\t100.00\t0"]);
        // The last token of the second sentence has no head.
        assert_eq!(rows(&analyzers[1].table()), vec!["10\t1\t10.00"]);
    }
}
