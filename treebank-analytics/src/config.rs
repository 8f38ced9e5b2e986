//! YAML configuration of analyses and evaluations.
//!
//! The configuration lists the analyzers and scorers to run by name. Each
//! component can be configured in a section named after it:
//!
//! ```yaml
//! General:
//!   showNameAnalyzers: true
//! Analyzers:
//!   - LabelsAnalyzer
//!   - EdgeLengthBinsAnalyzer
//! EdgeLengthBinsAnalyzer:
//!   binStart: 1
//!   binStop: 20
//!   binStep: 5
//! ```

use std::collections::HashSet;
use std::io;

use depgraph::node::{Node, EMPTY_TOKEN};
use serde::{Deserialize, Serialize};

use crate::analyzer::AnalyzerKind;
use crate::bins::{Bins, DEFAULT_BIN_START, DEFAULT_BIN_STEP, DEFAULT_BIN_STOP};
use crate::error::ConfigError;
use crate::scorer::ScorerKind;

/// Analysis and evaluation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "General", default)]
    pub general: GeneralConfig,

    #[serde(rename = "Analyzers", default)]
    pub analyzers: Vec<String>,

    #[serde(rename = "Scorers", default)]
    pub scorers: Vec<String>,

    #[serde(rename = "VoidAnalyzer", default)]
    pub void_analyzer: VoidConfig,

    #[serde(rename = "EdgeLengthBinsAnalyzer", default)]
    pub edge_length_bins_analyzer: BinsConfig,

    #[serde(rename = "SentenceLengthBinsAnalyzer", default)]
    pub sentence_length_bins_analyzer: BinsConfig,

    #[serde(rename = "LexicalLabelPairsAnalyzer", default)]
    pub lexical_label_pairs_analyzer: LexicalLabelPairsConfig,

    #[serde(rename = "LexicalPairsByLabelAnalyzer", default)]
    pub lexical_pairs_by_label_analyzer: LexicalPairsByLabelConfig,

    #[serde(rename = "DependencyPathsAnalyzer", default)]
    pub dependency_paths_analyzer: PathsConfig,

    #[serde(rename = "FilteredScorer", default)]
    pub filtered_scorer: FilteredScorerConfig,

    #[serde(rename = "LabelsScorer", default)]
    pub labels_scorer: LabelsScorerConfig,

    #[serde(rename = "SentenceBinsScorer", default)]
    pub sentence_bins_scorer: BinsConfig,

    #[serde(rename = "EdgeLengthBinsScorer", default)]
    pub edge_length_bins_scorer: BinsConfig,
}

impl Config {
    /// Read and validate a configuration.
    pub fn from_reader<R>(read: R) -> Result<Self, ConfigError>
    where
        R: io::Read,
    {
        let config: Config = serde_yaml::from_reader(read)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the analyzer names.
    pub fn analyzer_kinds(&self) -> Result<Vec<AnalyzerKind>, ConfigError> {
        self.analyzers.iter().map(|name| name.parse()).collect()
    }

    /// Resolve the scorer names.
    pub fn scorer_kinds(&self) -> Result<Vec<ScorerKind>, ConfigError> {
        self.scorers.iter().map(|name| name.parse()).collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for analyzer in self.analyzer_kinds()? {
            analyzer.build(self)?;
        }

        for scorer in self.scorer_kinds()? {
            scorer.build(self)?;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            analyzers: Vec::new(),
            scorers: Vec::new(),
            void_analyzer: VoidConfig::default(),
            edge_length_bins_analyzer: BinsConfig::default(),
            sentence_length_bins_analyzer: BinsConfig::default(),
            lexical_label_pairs_analyzer: LexicalLabelPairsConfig::default(),
            lexical_pairs_by_label_analyzer: LexicalPairsByLabelConfig::default(),
            dependency_paths_analyzer: PathsConfig::default(),
            filtered_scorer: FilteredScorerConfig::default(),
            labels_scorer: LabelsScorerConfig::default(),
            sentence_bins_scorer: BinsConfig::default(),
            edge_length_bins_scorer: BinsConfig::default(),
        }
    }
}

/// Output options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Print the name of each analyzer before its table.
    #[serde(rename = "showNameAnalyzers", default = "default_true")]
    pub show_name_analyzers: bool,

    /// Print the name of each scorer before its table.
    #[serde(rename = "showNameScorers", default = "default_true")]
    pub show_name_scorers: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            show_name_analyzers: default_true(),
            show_name_scorers: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinsConfig {
    #[serde(rename = "binStart", default = "default_bin_start")]
    pub start: usize,

    #[serde(rename = "binStop", default = "default_bin_stop")]
    pub stop: usize,

    #[serde(rename = "binStep", default = "default_bin_step")]
    pub step: usize,
}

impl BinsConfig {
    /// Construct the bins for the component `component`.
    pub fn bins(&self, component: &'static str) -> Result<Bins, ConfigError> {
        Bins::new(component, self.start, self.stop, self.step)
    }
}

impl Default for BinsConfig {
    fn default() -> Self {
        Self {
            start: default_bin_start(),
            stop: default_bin_stop(),
            step: default_bin_step(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoidConfig {
    /// Edges with these labels count as void.
    #[serde(default)]
    pub void_labels: Vec<String>,
}

/// The node field used in lexical pairs.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LexicalField {
    Token,
    Lemma,
    Cpos,
    Pos,
}

impl LexicalField {
    /// Get the field of a node, `_` when absent.
    pub fn value(self, node: &Node) -> &str {
        match self {
            LexicalField::Token => node.token(),
            LexicalField::Lemma => node.lemma().unwrap_or(EMPTY_TOKEN),
            LexicalField::Cpos => node.cpos().unwrap_or(EMPTY_TOKEN),
            LexicalField::Pos => node.pos().unwrap_or(EMPTY_TOKEN),
        }
    }
}

impl Default for LexicalField {
    fn default() -> Self {
        LexicalField::Token
    }
}

/// The edge endpoints that are paired with the edge label.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairType {
    Head,
    Dependent,
    Both,
}

impl Default for PairType {
    fn default() -> Self {
        PairType::Head
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexicalLabelPairsConfig {
    #[serde(default)]
    pub lexical: LexicalField,

    #[serde(rename = "type", default)]
    pub pair_type: PairType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexicalPairsByLabelConfig {
    #[serde(default)]
    pub lexical: LexicalField,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Number of edges in a path.
    #[serde(default = "default_path_length")]
    pub length: usize,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            length: default_path_length(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilteredScorerConfig {
    #[serde(rename = "filteredLabels", default)]
    pub filtered_labels: Vec<String>,

    /// Score only the filtered labels, rather than all other labels.
    #[serde(default)]
    pub keep: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelsScorerConfig {
    #[serde(rename = "filteredLabels", default)]
    pub filtered_labels: Vec<String>,

    /// Score only the filtered labels, rather than all other labels.
    #[serde(default = "default_true")]
    pub keep: bool,
}

impl Default for LabelsScorerConfig {
    fn default() -> Self {
        Self {
            filtered_labels: Vec::new(),
            keep: default_true(),
        }
    }
}

/// Selection of edges by label.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LabelFilter {
    labels: HashSet<String>,
    keep: bool,
}

impl LabelFilter {
    /// Construct a filter.
    ///
    /// With `keep`, only edges with one of `labels` are selected.
    /// Otherwise, only edges without one of `labels` are selected.
    pub fn new<I, S>(labels: I, keep: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LabelFilter {
            labels: labels.into_iter().map(Into::into).collect(),
            keep,
        }
    }

    pub fn accepts(&self, label: &str) -> bool {
        self.labels.contains(label) == self.keep
    }
}

impl From<&FilteredScorerConfig> for LabelFilter {
    fn from(config: &FilteredScorerConfig) -> Self {
        LabelFilter::new(config.filtered_labels.iter().cloned(), config.keep)
    }
}

impl From<&LabelsScorerConfig> for LabelFilter {
    fn from(config: &LabelsScorerConfig) -> Self {
        LabelFilter::new(config.filtered_labels.iter().cloned(), config.keep)
    }
}

const fn default_true() -> bool {
    true
}

const fn default_bin_start() -> usize {
    DEFAULT_BIN_START
}

const fn default_bin_stop() -> usize {
    DEFAULT_BIN_STOP
}

const fn default_bin_step() -> usize {
    DEFAULT_BIN_STEP
}

const fn default_path_length() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use depgraph::node::{Node, NodeBuilder};
    use maplit::hashset;

    use super::{Config, LabelFilter, LexicalField, PairType};
    use crate::analyzer::AnalyzerKind;
    use crate::error::ConfigError;
    use crate::scorer::ScorerKind;

    #[test]
    fn read_config_file() {
        let config = Config::from_reader(File::open("testdata/config.yaml").unwrap()).unwrap();

        assert!(!config.general.show_name_analyzers);
        assert!(config.general.show_name_scorers);
        assert_eq!(
            config.analyzer_kinds().unwrap(),
            vec![
                AnalyzerKind::Labels,
                AnalyzerKind::EdgeLengthBins,
                AnalyzerKind::LexicalLabelPairs,
            ]
        );
        assert_eq!(
            config.scorer_kinds().unwrap(),
            vec![ScorerKind::All, ScorerKind::Filtered]
        );
        assert_eq!(config.edge_length_bins_analyzer.stop, 20);
        assert_eq!(config.edge_length_bins_analyzer.step, 5);
        assert_eq!(config.edge_length_bins_analyzer.start, 1);
        assert_eq!(config.lexical_label_pairs_analyzer.lexical, LexicalField::Pos);
        assert_eq!(config.lexical_label_pairs_analyzer.pair_type, PairType::Both);
        assert_eq!(config.filtered_scorer.filtered_labels, vec!["ponct"]);
        assert!(!config.filtered_scorer.keep);
    }

    #[test]
    fn defaults() {
        let config = Config::from_yaml("Analyzers: [VoidAnalyzer]").unwrap();
        assert_eq!(
            config,
            Config {
                analyzers: vec!["VoidAnalyzer".to_owned()],
                ..Config::default()
            }
        );
        assert!(config.general.show_name_scorers);
        assert_eq!(config.dependency_paths_analyzer.length, 2);
        assert!(config.labels_scorer.keep);
        assert!(!config.filtered_scorer.keep);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(matches!(
            Config::from_yaml("Analyzers: [TreeAnalyzer]"),
            Err(ConfigError::UnknownAnalyzer { .. })
        ));
        assert!(matches!(
            Config::from_yaml("Scorers: [LasScorer]"),
            Err(ConfigError::UnknownScorer { .. })
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            Config::from_yaml("LexicalLabelPairsAnalyzer:\n  lexical: feats\n"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            Config::from_yaml("LexicalLabelPairsAnalyzer:\n  type: sibling\n"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            Config::from_yaml(
                "Scorers: [SentenceBinsScorer]\nSentenceBinsScorer:\n  binStep: 0\n"
            ),
            Err(ConfigError::InvalidBins {
                component: "SentenceBinsScorer",
                ..
            })
        ));
        assert!(matches!(
            Config::from_yaml(
                "Analyzers: [DependencyPathsAnalyzer]\nDependencyPathsAnalyzer:\n  length: 0\n"
            ),
            Err(ConfigError::InvalidPathLength { length: 0 })
        ));
    }

    #[test]
    fn lexical_fields() {
        let node: Node = NodeBuilder::new(1, "chats").lemma("chat").pos("NC").into();
        assert_eq!(LexicalField::Token.value(&node), "chats");
        assert_eq!(LexicalField::Lemma.value(&node), "chat");
        assert_eq!(LexicalField::Cpos.value(&node), "_");
        assert_eq!(LexicalField::Pos.value(&node), "NC");
    }

    #[test]
    fn label_filters() {
        let drop = LabelFilter::new(hashset! {"ponct"}, false);
        assert!(!drop.accepts("ponct"));
        assert!(drop.accepts("suj"));

        let keep = LabelFilter::new(hashset! {"ponct", "punct"}, true);
        assert!(keep.accepts("ponct"));
        assert!(!keep.accepts("suj"));
    }
}
