//! Evaluation of system graphs against gold graphs.
//!
//! Scorers compare the edges of each gold graph with the edges of the
//! system graph for the same sentence. Labeled scores compare complete
//! edges, unlabeled scores compare (source, target) pairs.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::ops::AddAssign;
use std::str::FromStr;

use depgraph::graph::{Edge, Graph};
use itertools::{EitherOrBoth, Itertools};
use tracing::{debug, warn};

use crate::bins::{Bin, Bins};
use crate::config::{Config, LabelFilter};
use crate::error::{ConfigError, Error};
use crate::table::{decimal, Table};

const SCORE_COLUMNS: [&str; 6] = ["LP", "LR", "LF", "UP", "UR", "UF"];

/// A trait for scorers.
pub trait Scorer {
    /// The name of the scorer.
    fn name(&self) -> &'static str;

    /// Add the counts of a sentence.
    fn score(&mut self, gold: &Graph, system: &Graph);

    /// Render the accumulated scores.
    fn table(&self) -> Table;
}

impl<S> Scorer for Box<S>
where
    S: Scorer + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn score(&mut self, gold: &Graph, system: &Graph) {
        (**self).score(gold, system)
    }

    fn table(&self) -> Table {
        (**self).table()
    }
}

/// Sentence counts of an evaluation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Evaluation {
    /// Sentences that were scored.
    pub sentences: usize,

    /// Gold sentences without a system sentence.
    pub gold_only: usize,

    /// System sentences without a gold sentence.
    pub system_only: usize,
}

/// Score pairs of gold and system graphs.
///
/// Graphs are paired in order. When one sequence is longer than the
/// other, the remaining graphs are not scored and a warning is logged.
pub fn evaluate<S, G, Y>(scorers: &mut [S], golds: G, systems: Y) -> Result<Evaluation, Error>
where
    S: Scorer,
    G: IntoIterator<Item = Result<Graph, treebank_formats::Error>>,
    Y: IntoIterator<Item = Result<Graph, treebank_formats::Error>>,
{
    let mut evaluation = Evaluation::default();

    for pair in golds.into_iter().zip_longest(systems) {
        match pair {
            EitherOrBoth::Both(gold, system) => {
                let gold = gold?;
                let system = system?;
                for scorer in scorers.iter_mut() {
                    scorer.score(&gold, &system);
                }
                evaluation.sentences += 1;
            }
            EitherOrBoth::Left(gold) => {
                gold?;
                evaluation.gold_only += 1;
            }
            EitherOrBoth::Right(system) => {
                system?;
                evaluation.system_only += 1;
            }
        }
    }

    if evaluation.gold_only != 0 || evaluation.system_only != 0 {
        warn!(
            scored = evaluation.sentences,
            gold_only = evaluation.gold_only,
            system_only = evaluation.system_only,
            "gold and system files have a different number of sentences"
        );
    }

    debug!(sentences = evaluation.sentences, "evaluated corpus");

    Ok(evaluation)
}

/// Scorers, by name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScorerKind {
    All,
    Filtered,
    Labels,
    SentenceBins,
    EdgeLengthBins,
}

impl ScorerKind {
    /// All known scorers.
    pub const ALL: [ScorerKind; 5] = [
        ScorerKind::All,
        ScorerKind::Filtered,
        ScorerKind::Labels,
        ScorerKind::SentenceBins,
        ScorerKind::EdgeLengthBins,
    ];

    /// The name of the scorer, as used in the configuration.
    pub fn name(self) -> &'static str {
        match self {
            ScorerKind::All => "AllScorer",
            ScorerKind::Filtered => "FilteredScorer",
            ScorerKind::Labels => "LabelsScorer",
            ScorerKind::SentenceBins => "SentenceBinsScorer",
            ScorerKind::EdgeLengthBins => "EdgeLengthBinsScorer",
        }
    }

    /// Construct the scorer with its section of the configuration.
    pub fn build(self, config: &Config) -> Result<Box<dyn Scorer>, ConfigError> {
        let scorer: Box<dyn Scorer> = match self {
            ScorerKind::All => Box::new(AllScorer::default()),
            ScorerKind::Filtered => Box::new(FilteredScorer::new(LabelFilter::from(
                &config.filtered_scorer,
            ))),
            ScorerKind::Labels => {
                Box::new(LabelsScorer::new(LabelFilter::from(&config.labels_scorer)))
            }
            ScorerKind::SentenceBins => Box::new(SentenceBinsScorer::new(
                config.sentence_bins_scorer.bins(self.name())?,
            )),
            ScorerKind::EdgeLengthBins => Box::new(EdgeLengthBinsScorer::new(
                config.edge_length_bins_scorer.bins(self.name())?,
            )),
        };

        Ok(scorer)
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScorerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScorerKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownScorer { name: s.to_owned() })
    }
}

/// Edge counts of gold and system graphs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Counts {
    pub labeled_common: usize,
    pub unlabeled_common: usize,
    pub labeled_gold: usize,
    pub unlabeled_gold: usize,
    pub labeled_system: usize,
    pub unlabeled_system: usize,
}

impl Counts {
    /// Count the gold, system and common edges of a sentence.
    pub fn new<'a, G, S>(gold: G, system: S) -> Self
    where
        G: IntoIterator<Item = &'a Edge>,
        S: IntoIterator<Item = &'a Edge>,
    {
        let gold: HashSet<_> = gold.into_iter().collect();
        let system: HashSet<_> = system.into_iter().collect();
        let gold_unlabeled = unlabeled(&gold);
        let system_unlabeled = unlabeled(&system);

        Counts {
            labeled_common: gold.intersection(&system).count(),
            unlabeled_common: gold_unlabeled.intersection(&system_unlabeled).count(),
            labeled_gold: gold.len(),
            unlabeled_gold: gold_unlabeled.len(),
            labeled_system: system.len(),
            unlabeled_system: system_unlabeled.len(),
        }
    }

    /// Compute precision, recall and F1 scores.
    pub fn scores(&self) -> Scores {
        let labeled_precision = ratio(self.labeled_common, self.labeled_system);
        let labeled_recall = ratio(self.labeled_common, self.labeled_gold);
        let unlabeled_precision = ratio(self.unlabeled_common, self.unlabeled_system);
        let unlabeled_recall = ratio(self.unlabeled_common, self.unlabeled_gold);

        Scores {
            labeled_precision,
            labeled_recall,
            labeled_f1: f1(labeled_precision, labeled_recall),
            unlabeled_precision,
            unlabeled_recall,
            unlabeled_f1: f1(unlabeled_precision, unlabeled_recall),
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, other: Counts) {
        self.labeled_common += other.labeled_common;
        self.unlabeled_common += other.unlabeled_common;
        self.labeled_gold += other.labeled_gold;
        self.unlabeled_gold += other.unlabeled_gold;
        self.labeled_system += other.labeled_system;
        self.unlabeled_system += other.unlabeled_system;
    }
}

fn unlabeled(edges: &HashSet<&Edge>) -> HashSet<(usize, usize)> {
    edges
        .iter()
        .map(|edge| (edge.source(), edge.target()))
        .collect()
}

fn ratio(part: usize, total: usize) -> f64 {
    if total > 0 {
        part as f64 / total as f64
    } else {
        0.
    }
}

/// The harmonic mean of precision and recall, zero when both are zero.
pub fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0. {
        2. * precision * recall / (precision + recall)
    } else {
        0.
    }
}

/// Labeled and unlabeled precision, recall and F1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scores {
    pub labeled_precision: f64,
    pub labeled_recall: f64,
    pub labeled_f1: f64,
    pub unlabeled_precision: f64,
    pub unlabeled_recall: f64,
    pub unlabeled_f1: f64,
}

impl Scores {
    /// The scores as percentages with two decimals, in the order
    /// `LP LR LF UP UR UF`.
    pub fn columns(&self) -> Vec<String> {
        vec![
            self.labeled_precision,
            self.labeled_recall,
            self.labeled_f1,
            self.unlabeled_precision,
            self.unlabeled_recall,
            self.unlabeled_f1,
        ]
        .into_iter()
        .map(|score| decimal(score * 100.))
        .collect()
    }
}

/// Count the edges of a sentence per group.
///
/// `group` assigns an edge to a group, or drops it by returning `None`.
fn grouped_counts<K, F>(gold: &Graph, system: &Graph, group: F) -> HashMap<K, Counts>
where
    K: Eq + Hash,
    F: Fn(&Edge) -> Option<K>,
{
    let gold_groups = gold
        .edges()
        .filter_map(|edge| group(edge).map(|key| (key, edge)))
        .into_group_map();
    let mut system_groups = system
        .edges()
        .filter_map(|edge| group(edge).map(|key| (key, edge)))
        .into_group_map();

    let mut counts = HashMap::new();
    for (key, gold_edges) in gold_groups {
        let system_edges = system_groups.remove(&key).unwrap_or_default();
        counts.insert(key, Counts::new(gold_edges, system_edges));
    }
    for (key, system_edges) in system_groups {
        counts.insert(key, Counts::new(Vec::<&Edge>::new(), system_edges));
    }

    counts
}

fn table_with_scores(first: &str) -> Table {
    Table::new(
        vec![first, "NumberInGold"]
            .into_iter()
            .chain(SCORE_COLUMNS.iter().copied()),
    )
}

fn score_row(key: String, in_gold: usize, counts: &Counts) -> Vec<String> {
    let mut row = vec![key, in_gold.to_string()];
    row.extend(counts.scores().columns());
    row
}

/// Scores over all edges.
#[derive(Debug, Default)]
pub struct AllScorer {
    counts: Counts,
}

impl AllScorer {
    pub fn counts(&self) -> Counts {
        self.counts
    }
}

impl Scorer for AllScorer {
    fn name(&self) -> &'static str {
        ScorerKind::All.name()
    }

    fn score(&mut self, gold: &Graph, system: &Graph) {
        self.counts += Counts::new(gold.edges(), system.edges());
    }

    fn table(&self) -> Table {
        let mut table = Table::new(SCORE_COLUMNS.iter().copied());
        table.push_row(self.counts.scores().columns());
        table
    }
}

/// Scores over the edges that pass a label filter.
#[derive(Debug, Default)]
pub struct FilteredScorer {
    filter: LabelFilter,
    counts: Counts,
}

impl FilteredScorer {
    pub fn new(filter: LabelFilter) -> Self {
        FilteredScorer {
            filter,
            counts: Counts::default(),
        }
    }
}

impl Scorer for FilteredScorer {
    fn name(&self) -> &'static str {
        ScorerKind::Filtered.name()
    }

    fn score(&mut self, gold: &Graph, system: &Graph) {
        let filter = &self.filter;
        let counts = Counts::new(
            gold.edges().filter(|edge| filter.accepts(edge.label())),
            system.edges().filter(|edge| filter.accepts(edge.label())),
        );
        self.counts += counts;
    }

    fn table(&self) -> Table {
        let mut table = Table::new(SCORE_COLUMNS.iter().copied());
        table.push_row(self.counts.scores().columns());
        table
    }
}

/// Scores per label, for the labels that pass a label filter.
#[derive(Debug, Default)]
pub struct LabelsScorer {
    filter: LabelFilter,
    labels: BTreeMap<String, Counts>,
}

impl LabelsScorer {
    pub fn new(filter: LabelFilter) -> Self {
        LabelsScorer {
            filter,
            labels: BTreeMap::new(),
        }
    }
}

impl Scorer for LabelsScorer {
    fn name(&self) -> &'static str {
        ScorerKind::Labels.name()
    }

    fn score(&mut self, gold: &Graph, system: &Graph) {
        let filter = &self.filter;
        let counts = grouped_counts(gold, system, |edge| {
            if filter.accepts(edge.label()) {
                Some(edge.label().to_owned())
            } else {
                None
            }
        });

        for (label, counts) in counts {
            *self.labels.entry(label).or_default() += counts;
        }
    }

    fn table(&self) -> Table {
        let mut table = table_with_scores("Label");
        for (label, counts) in &self.labels {
            table.push_row(score_row(label.clone(), counts.labeled_gold, counts));
        }
        table
    }
}

/// Scores per sentence length bin.
///
/// Sentences are binned by the order of the gold graph. The number of
/// gold sentences is reported per bin.
#[derive(Debug)]
pub struct SentenceBinsScorer {
    bins: Bins,
    sentences: BTreeMap<Bin, (usize, Counts)>,
}

impl SentenceBinsScorer {
    pub fn new(bins: Bins) -> Self {
        SentenceBinsScorer {
            bins,
            sentences: BTreeMap::new(),
        }
    }
}

impl Scorer for SentenceBinsScorer {
    fn name(&self) -> &'static str {
        ScorerKind::SentenceBins.name()
    }

    fn score(&mut self, gold: &Graph, system: &Graph) {
        let (sentences, counts) = self
            .sentences
            .entry(self.bins.bin(gold.order()))
            .or_default();
        *sentences += 1;
        *counts += Counts::new(gold.edges(), system.edges());
    }

    fn table(&self) -> Table {
        let mut table = table_with_scores("Bin");
        for (bin, (sentences, counts)) in &self.sentences {
            table.push_row(score_row(bin.to_string(), *sentences, counts));
        }
        table
    }
}

/// Scores per edge length bin.
#[derive(Debug)]
pub struct EdgeLengthBinsScorer {
    bins: Bins,
    lengths: BTreeMap<Bin, Counts>,
}

impl EdgeLengthBinsScorer {
    pub fn new(bins: Bins) -> Self {
        EdgeLengthBinsScorer {
            bins,
            lengths: BTreeMap::new(),
        }
    }
}

impl Scorer for EdgeLengthBinsScorer {
    fn name(&self) -> &'static str {
        ScorerKind::EdgeLengthBins.name()
    }

    fn score(&mut self, gold: &Graph, system: &Graph) {
        let bins = self.bins;
        let counts = grouped_counts(gold, system, |edge| Some(bins.bin(edge.length())));

        for (bin, counts) in counts {
            *self.lengths.entry(bin).or_default() += counts;
        }
    }

    fn table(&self) -> Table {
        let mut table = table_with_scores("Bin");
        for (bin, counts) in &self.lengths {
            table.push_row(score_row(bin.to_string(), counts.labeled_gold, counts));
        }
        table
    }
}
