//! Dependency graphs.

use std::cmp::{max, min};
use std::collections::{btree_map, btree_set, BTreeMap, BTreeSet, HashMap};
use std::fmt::{self, Display, Formatter};
use std::iter::FromIterator;

use indexmap::{IndexMap, IndexSet};

use crate::node::Node;

/// Adjacency of a node: the neighbouring node index mapped to the edge.
///
/// Entries are kept in insertion order.
pub type Adjacency = IndexMap<usize, Edge>;

/// A labeled dependency edge.
///
/// Edges are identified by their source, label and target. Two edges
/// between the same nodes with different labels are distinct edges.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Edge {
    source: usize,
    label: String,
    target: usize,
}

impl Edge {
    /// Construct a new edge `source -label-> target`.
    pub fn new(source: usize, label: impl Into<String>, target: usize) -> Self {
        Edge {
            source,
            label: label.into(),
            target,
        }
    }

    /// Get the source (head) of the edge.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Get the target (dependent) of the edge.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Get the dependency label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The distance between the endpoints of the edge.
    pub fn length(&self) -> usize {
        max(self.source, self.target) - min(self.source, self.target)
    }

    /// Returns `true` if the edge attaches to the left, i.e. the source
    /// does not precede the target.
    pub fn is_left(&self) -> bool {
        self.source >= self.target
    }

    /// Returns `true` if the spans of the two edges interleave.
    ///
    /// Following Gómez-Rodríguez and Nivre (2013), edges with spans
    /// `[min1, max1]` and `[min2, max2]` cross iff
    /// `min1 < min2 < max1 < max2` or `min2 < min1 < max2 < max1`.
    pub fn crosses(&self, other: &Edge) -> bool {
        let (min1, max1) = self.span();
        let (min2, max2) = other.span();

        (min1 < min2 && min2 < max1 && max1 < max2) || (min2 < min1 && min1 < max2 && max2 < max1)
    }

    fn span(&self) -> (usize, usize) {
        (min(self.source, self.target), max(self.source, self.target))
    }
}

impl Display for Edge {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        write!(fmt, "{} - {} -> {}", self.source, self.label, self.target)
    }
}

/// A dependency graph.
///
/// `Graph` stores the nodes of a sentence by index and a set of labeled
/// edges. Edges are additionally indexed by source and by target, so that
/// the heads and dependents of a node can be looked up directly.
///
/// Endpoints are not validated when an edge is added: readers may add
/// an edge before the node it points to.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    id: Option<String>,
    nodes: BTreeMap<usize, Node>,
    edges: BTreeSet<Edge>,
    by_source: HashMap<usize, Adjacency>,
    by_target: HashMap<usize, Adjacency>,

    // Labels of the edges between a pair of nodes, in insertion order.
    labels: HashMap<(usize, usize), IndexSet<String>>,
}

#[allow(clippy::len_without_is_empty)]
impl Graph {
    /// Construct an empty graph.
    pub fn new() -> Self {
        Graph::default()
    }

    /// Construct a graph that only contains the root node.
    ///
    /// ```
    /// use depgraph::graph::Graph;
    ///
    /// let graph = Graph::with_root();
    /// assert!(graph.node(0).unwrap().is_root());
    /// ```
    pub fn with_root() -> Self {
        let mut graph = Graph::new();
        graph.add_node(Node::root());
        graph
    }

    /// Get the sentence identifier, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Set the sentence identifier.
    pub fn set_id<S>(&mut self, id: Option<S>)
    where
        S: Into<String>,
    {
        self.id = id.map(Into::into);
    }

    /// The number of nodes in the graph (including the root).
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// The number of edges in the graph.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Add a node, replacing the node with the same index.
    ///
    /// Returns the replaced node.
    pub fn add_node(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.index(), node)
    }

    /// Get the node with the given index.
    pub fn node(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(&idx)
    }

    /// Get the node with the given index mutably.
    pub fn node_mut(&mut self, idx: usize) -> Option<&mut Node> {
        self.nodes.get_mut(&idx)
    }

    /// Get an iterator over the nodes, in ascending index order.
    pub fn nodes(&self) -> Nodes {
        Nodes {
            inner: self.nodes.values(),
        }
    }

    /// Add an edge.
    ///
    /// Returns `false` if the exact same edge was already present. When
    /// an edge with another label exists between the same nodes, both
    /// edges are kept, but only the edge added last can be retrieved
    /// with [`Graph::edge`].
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        let labels = self.labels.entry((edge.source, edge.target)).or_default();
        labels.shift_remove(edge.label());
        labels.insert(edge.label.clone());

        self.by_source
            .entry(edge.source)
            .or_default()
            .insert(edge.target, edge.clone());
        self.by_target
            .entry(edge.target)
            .or_default()
            .insert(edge.source, edge.clone());
        self.edges.insert(edge)
    }

    /// Get an iterator over the edges, ordered by source, label and target.
    pub fn edges(&self) -> btree_set::Iter<Edge> {
        self.edges.iter()
    }

    /// Returns `true` if the graph contains the exact edge.
    pub fn has_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// Get the edge from `source` to `target`, if any.
    pub fn edge(&self, source: usize, target: usize) -> Option<&Edge> {
        self.by_source.get(&source)?.get(&target)
    }

    /// Get the outgoing edges of `source`, keyed by target.
    ///
    /// Returns `None` when the node has no outgoing edges.
    pub fn targets_of(&self, source: usize) -> Option<&Adjacency> {
        self.by_source.get(&source)
    }

    /// Get the incoming edges of `target`, keyed by source.
    ///
    /// Returns `None` when the node has no incoming edges.
    pub fn sources_of(&self, target: usize) -> Option<&Adjacency> {
        self.by_target.get(&target)
    }

    /// Get all edges that are incident to `node`: first the outgoing
    /// edges, then the incoming edges.
    ///
    /// Unlike the adjacency lookups, parallel edges with different labels
    /// are all returned. Returns `None` when the node has no edges.
    pub fn edges_of(&self, node: usize) -> Option<Vec<&Edge>> {
        let outgoing = self
            .edges
            .range(Edge::new(node, String::new(), 0)..)
            .take_while(|e| e.source == node);
        let incoming = self
            .edges
            .iter()
            .filter(|e| e.target == node && e.source != node);

        let edges: Vec<_> = outgoing.chain(incoming).collect();
        if edges.is_empty() {
            None
        } else {
            Some(edges)
        }
    }

    /// Remove an edge.
    ///
    /// The edge is removed from the edge set and from both adjacency
    /// indices. If parallel edges with other labels remain, the most
    /// recently added one becomes the edge returned by [`Graph::edge`].
    ///
    /// Returns `false` if the edge was not in the graph.
    pub fn remove_edge(&mut self, edge: &Edge) -> bool {
        if !self.edges.remove(edge) {
            return false;
        }

        let pair = (edge.source, edge.target);
        let latest = match self.labels.get_mut(&pair) {
            Some(labels) => {
                labels.shift_remove(edge.label());
                labels.last().cloned()
            }
            None => None,
        };

        match latest {
            Some(label) => {
                let parallel = Edge::new(edge.source, label, edge.target);
                if let Some(adjacency) = self.by_source.get_mut(&edge.source) {
                    adjacency.insert(edge.target, parallel.clone());
                }
                if let Some(adjacency) = self.by_target.get_mut(&edge.target) {
                    adjacency.insert(edge.source, parallel);
                }
            }
            None => {
                self.labels.remove(&pair);
                remove_adjacent(&mut self.by_source, edge.source, edge.target);
                remove_adjacent(&mut self.by_target, edge.target, edge.source);
            }
        }

        true
    }

    /// Get the edges that cross at least one other edge.
    ///
    /// A graph is planar (in the sense of non-crossing) iff this set is
    /// empty.
    pub fn crossing_edges(&self) -> BTreeSet<&Edge> {
        let mut crossings = BTreeSet::new();

        for e1 in &self.edges {
            for e2 in &self.edges {
                if e1.crosses(e2) {
                    crossings.insert(e1);
                    crossings.insert(e2);
                }
            }
        }

        crossings
    }
}

fn remove_adjacent(index: &mut HashMap<usize, Adjacency>, from: usize, to: usize) {
    if let Some(adjacency) = index.get_mut(&from) {
        adjacency.shift_remove(&to);
        if adjacency.is_empty() {
            index.remove(&from);
        }
    }
}

impl Eq for Graph {}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.nodes == other.nodes && self.edges == other.edges
    }
}

impl FromIterator<Node> for Graph {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Node>,
    {
        let mut graph = Graph::new();
        for node in iter {
            graph.add_node(node);
        }
        graph
    }
}

impl Extend<Edge> for Graph {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = Edge>,
    {
        for edge in iter {
            self.add_edge(edge);
        }
    }
}

/// Iterator over the nodes of a graph in ascending index order.
#[derive(Clone)]
pub struct Nodes<'a> {
    inner: btree_map::Values<'a, usize, Node>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> DoubleEndedIterator for Nodes<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<'a> ExactSizeIterator for Nodes<'a> {}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Node;
    type IntoIter = Nodes<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes()
    }
}
