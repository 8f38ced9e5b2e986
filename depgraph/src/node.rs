//! Nodes in the dependency graph.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::mem;
use std::ops::{Deref, DerefMut};

pub const EMPTY_TOKEN: &str = "_";

/// Token form of the synthetic root node.
pub const ROOT_TOKEN: &str = "_top_";

/// A builder for `Node`s.
///
/// Treebank formats carry a handful of columns per token. This builder
/// provides a fluent interface for creating `Node`s without spelling out
/// every absent column.
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    /// Create a `Node` builder with all non-token fields set to absent.
    pub fn new(idx: usize, token: impl Into<String>) -> NodeBuilder {
        NodeBuilder {
            node: Node::new(idx, token),
        }
    }

    /// Set the lemma of the token.
    pub fn lemma(mut self, lemma: impl Into<String>) -> NodeBuilder {
        self.node.set_lemma(Some(lemma));
        self
    }

    /// Set the coarse part-of-speech tag.
    pub fn cpos(mut self, cpos: impl Into<String>) -> NodeBuilder {
        self.node.set_cpos(Some(cpos));
        self
    }

    /// Set the fine-grained part-of-speech tag.
    pub fn pos(mut self, pos: impl Into<String>) -> NodeBuilder {
        self.node.set_pos(Some(pos));
        self
    }

    /// Set the morphological features of the token.
    pub fn features(mut self, features: Features) -> NodeBuilder {
        self.node.set_features(features);
        self
    }

    /// Set format-specific columns that follow the standard ones.
    pub fn extra(mut self, extra: Vec<String>) -> NodeBuilder {
        self.node.set_extra(extra);
        self
    }
}

impl From<Node> for NodeBuilder {
    fn from(node: Node) -> Self {
        NodeBuilder { node }
    }
}

impl From<NodeBuilder> for Node {
    fn from(builder: NodeBuilder) -> Self {
        builder.node
    }
}

/// A graph node.
///
/// The index of a node is fixed at construction. Two nodes are equal when
/// they have the same index, and nodes are ordered by index. The token
/// columns can be changed freely.
#[derive(Clone, Debug)]
pub struct Node {
    idx: usize,
    token: String,
    lemma: Option<String>,
    cpos: Option<String>,
    pos: Option<String>,
    features: Features,
    extra: Vec<String>,
}

impl Node {
    /// Create a new node where all the non-token fields are absent.
    pub fn new(idx: usize, token: impl Into<String>) -> Node {
        Node {
            idx,
            token: token.into(),
            lemma: None,
            cpos: None,
            pos: None,
            features: Features::new(),
            extra: Vec::new(),
        }
    }

    /// Create the synthetic root node (index 0).
    pub fn root() -> Node {
        NodeBuilder::new(0, ROOT_TOKEN).lemma(ROOT_TOKEN).into()
    }

    /// Get the index of the node in the sentence.
    pub fn index(&self) -> usize {
        self.idx
    }

    /// Returns `true` if this is the node at index 0.
    pub fn is_root(&self) -> bool {
        self.idx == 0
    }

    /// Get the word form or punctuation symbol.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Get the lemma of the token.
    pub fn lemma(&self) -> Option<&str> {
        self.lemma.as_deref()
    }

    /// Get the coarse part-of-speech tag.
    pub fn cpos(&self) -> Option<&str> {
        self.cpos.as_deref()
    }

    /// Get the fine-grained part-of-speech tag.
    pub fn pos(&self) -> Option<&str> {
        self.pos.as_deref()
    }

    /// Get the morphological features of the token.
    pub fn features(&self) -> &Features {
        &self.features
    }

    /// Get the morphological features of the token.
    ///
    /// Returns a mutable reference, so that the features can be updated.
    pub fn features_mut(&mut self) -> &mut Features {
        &mut self.features
    }

    /// Get the format-specific columns.
    pub fn extra(&self) -> &[String] {
        &self.extra
    }

    /// Set the word form or punctuation symbol.
    ///
    /// Returns the form that is replaced.
    pub fn set_token(&mut self, token: impl Into<String>) -> String {
        mem::replace(&mut self.token, token.into())
    }

    /// Set the lemma of the token.
    ///
    /// Returns the lemma that is replaced.
    pub fn set_lemma<S>(&mut self, lemma: Option<S>) -> Option<String>
    where
        S: Into<String>,
    {
        mem::replace(&mut self.lemma, lemma.map(Into::into))
    }

    /// Set the coarse part-of-speech tag.
    ///
    /// Returns the tag that is replaced.
    pub fn set_cpos<S>(&mut self, cpos: Option<S>) -> Option<String>
    where
        S: Into<String>,
    {
        mem::replace(&mut self.cpos, cpos.map(Into::into))
    }

    /// Set the fine-grained part-of-speech tag.
    ///
    /// Returns the tag that is replaced.
    pub fn set_pos<S>(&mut self, pos: Option<S>) -> Option<String>
    where
        S: Into<String>,
    {
        mem::replace(&mut self.pos, pos.map(Into::into))
    }

    /// Set the morphological features of the token.
    ///
    /// Returns the features that are replaced.
    pub fn set_features(&mut self, features: Features) -> Features {
        mem::replace(&mut self.features, features)
    }

    /// Set the format-specific columns.
    pub fn set_extra(&mut self, extra: Vec<String>) -> Vec<String> {
        mem::replace(&mut self.extra, extra)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.idx.cmp(&other.idx)
    }
}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.idx.hash(state);
    }
}

/// Morphological features.
///
/// Typically written as `key=value` pairs separated by `|`, or `_` when
/// there are no features.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Features {
    inner: BTreeMap<String, String>,
}

impl Features {
    /// Construct an empty set of features.
    pub fn new() -> Self {
        Features {
            inner: BTreeMap::new(),
        }
    }

    /// Unwrap the contained feature map.
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.inner
    }
}

impl Deref for Features {
    type Target = BTreeMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Features {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl From<BTreeMap<String, String>> for Features {
    fn from(feature_map: BTreeMap<String, String>) -> Self {
        Features { inner: feature_map }
    }
}

impl<S, T> FromIterator<(S, T)> for Features
where
    S: Into<String>,
    T: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
    {
        let features = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Features { inner: features }
    }
}

#[cfg(test)]
mod tests {
    use std::iter::FromIterator;

    use maplit::btreemap;

    use super::{Features, Node, NodeBuilder, ROOT_TOKEN};

    #[test]
    fn features_from_iter() {
        let feature_map = btreemap! {
            "number".to_string() => "sg".to_string(),
            "gender".to_string() => "f".to_string(),
        };

        assert_eq!(feature_map, *Features::from_iter(feature_map.clone()));
    }

    #[test]
    fn nodes_compare_by_index() {
        let a: Node = NodeBuilder::new(3, "chat").pos("NC").into();
        let b: Node = NodeBuilder::new(3, "chien").pos("V").into();
        let c = Node::new(4, "chat");

        assert_eq!(a, b);
        assert!(a < c);
        assert!(c > b);
    }

    #[test]
    fn root_has_sentinel_features() {
        let root = Node::root();
        assert!(root.is_root());
        assert_eq!(root.token(), ROOT_TOKEN);
        assert_eq!(root.lemma(), Some(ROOT_TOKEN));
        assert_eq!(root.cpos(), None);
        assert_eq!(root.pos(), None);
        assert!(root.features().is_empty());
    }

    #[test]
    fn setters_return_replaced_values() {
        let mut node: Node = NodeBuilder::new(1, "mange").lemma("manger").into();
        assert_eq!(node.set_lemma(Some("mangeur")), Some("manger".to_string()));
        assert_eq!(node.set_token("mangeait"), "mange");
        node.features_mut()
            .insert("tense".to_string(), "past".to_string());
        assert_eq!(node.features().get("tense").map(String::as_str), Some("past"));
    }
}
