//! Graph algorithms: cycle detection and DFS decomposition.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::error::GraphError;
use crate::graph::{Edge, Graph};

/// Find the strongly connected components of a graph.
///
/// Components are computed with Tarjan's algorithm over the outgoing
/// edges of each node. Only components with more than one node are
/// returned, so a self-loop is not considered to be a cycle. Every
/// component is sorted, as is the list of components.
pub fn strongly_connected_components(graph: &Graph) -> Vec<Vec<usize>> {
    let mut successors = DiGraphMap::<usize, ()>::new();
    for node in graph.nodes() {
        successors.add_node(node.index());
    }
    for edge in graph.edges() {
        successors.add_edge(edge.source(), edge.target(), ());
    }

    let mut components: Vec<_> = tarjan_scc(&successors)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|mut component| {
            component.sort_unstable();
            component
        })
        .collect();

    components.sort_unstable();
    components
}

/// Returns `true` if the graph does not contain a cycle of two or more
/// nodes.
pub fn is_acyclic(graph: &Graph) -> bool {
    strongly_connected_components(graph).is_empty()
}

/// Sort key for the outgoing edges of a node in a DFS decomposition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DfsPriority {
    /// Left-attaching edges (source >= target) first.
    Left,

    /// Right-attaching edges first.
    Right,

    /// Shorter edges first.
    Min,

    /// Order by label.
    Label,
}

impl DfsPriority {
    fn compare(self, a: &Edge, b: &Edge) -> Ordering {
        match self {
            DfsPriority::Left => b.is_left().cmp(&a.is_left()),
            DfsPriority::Right => a.is_left().cmp(&b.is_left()),
            DfsPriority::Min => a.length().cmp(&b.length()),
            DfsPriority::Label => a.label().cmp(b.label()),
        }
    }
}

/// The default priority: left edges first, then short edges, then by label.
pub const DEFAULT_PRIORITY: [DfsPriority; 3] =
    [DfsPriority::Left, DfsPriority::Min, DfsPriority::Label];

impl FromStr for DfsPriority {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LEFT" => Ok(DfsPriority::Left),
            "RIGHT" => Ok(DfsPriority::Right),
            "MIN" => Ok(DfsPriority::Min),
            "LABEL" => Ok(DfsPriority::Label),
            _ => Err(GraphError::UnknownPriority {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for DfsPriority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DfsPriority::Left => "LEFT",
            DfsPriority::Right => "RIGHT",
            DfsPriority::Min => "MIN",
            DfsPriority::Label => "LABEL",
        };

        f.write_str(name)
    }
}

/// A step in a DFS decomposition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DfsStep<'a> {
    /// An edge is traversed for the first time.
    Edge(&'a Edge),

    /// The traversal of an edge is finished.
    Backtrack,
}

/// Decompose a graph into a depth-first sequence of edges.
///
/// Traversal starts at the lowest unvisited node index, until all nodes
/// are visited. The outgoing edges of a node are explored in the order
/// given by `priority`; ties keep the order in which the edges were
/// added. For each explored edge the trace contains the edge itself, the
/// traversal of its target (if that target was not visited before), and
/// finally a [`DfsStep::Backtrack`].
pub fn dfs_decomposition<'a>(graph: &'a Graph, priority: &[DfsPriority]) -> Vec<DfsStep<'a>> {
    let mut dfs = Decomposition {
        graph,
        priority,
        visited: HashSet::new(),
        visited_edges: HashSet::new(),
        steps: Vec::new(),
    };

    for node in graph.nodes() {
        if !dfs.visited.contains(&node.index()) {
            dfs.visit(node.index());
        }
    }

    dfs.steps
}

struct Decomposition<'a, 'p> {
    graph: &'a Graph,
    priority: &'p [DfsPriority],
    visited: HashSet<usize>,
    visited_edges: HashSet<&'a Edge>,
    steps: Vec<DfsStep<'a>>,
}

impl<'a, 'p> Decomposition<'a, 'p> {
    fn visit(&mut self, node: usize) {
        self.visited.insert(node);

        let graph = self.graph;
        let mut edges: Vec<&'a Edge> = graph
            .targets_of(node)
            .map(|targets| targets.values().collect())
            .unwrap_or_default();
        let priority = self.priority;
        edges.sort_by(|a, b| {
            priority
                .iter()
                .fold(Ordering::Equal, |ord, p| ord.then_with(|| p.compare(a, b)))
        });

        for edge in edges {
            if self.visited_edges.insert(edge) {
                self.steps.push(DfsStep::Edge(edge));
            }

            if !self.visited.contains(&edge.target()) {
                self.visit(edge.target());
            }

            self.steps.push(DfsStep::Backtrack);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        dfs_decomposition, is_acyclic, strongly_connected_components, DfsPriority, DfsStep,
        DEFAULT_PRIORITY,
    };
    use crate::error::GraphError;
    use crate::graph::Edge;
    use crate::tests::{graph_with_edges, TEST_GRAPHS};

    fn edges_only<'a>(steps: &[DfsStep<'a>]) -> Vec<&'a Edge> {
        steps
            .iter()
            .filter_map(|step| match step {
                DfsStep::Edge(edge) => Some(*edge),
                DfsStep::Backtrack => None,
            })
            .collect()
    }

    #[test]
    fn trees_have_no_cycles() {
        for graph in TEST_GRAPHS.iter() {
            assert!(strongly_connected_components(graph).is_empty());
            assert!(is_acyclic(graph));
        }
    }

    #[test]
    fn cycles_are_found() {
        let g = graph_with_edges(
            5,
            &[
                (0, "root", 1),
                (1, "a", 2),
                (2, "b", 3),
                (3, "c", 1),
                (4, "d", 5),
                (5, "e", 4),
            ],
        );
        assert_eq!(
            strongly_connected_components(&g),
            vec![vec![1, 2, 3], vec![4, 5]]
        );
        assert!(!is_acyclic(&g));
    }

    #[test]
    fn self_loops_are_not_cycles() {
        let g = graph_with_edges(2, &[(0, "root", 1), (1, "self", 1)]);
        assert!(strongly_connected_components(&g).is_empty());
    }

    #[test]
    fn dfs_decomposition_default_priority() {
        let g = &TEST_GRAPHS[0];
        let steps = dfs_decomposition(g, &DEFAULT_PRIORITY);

        assert_eq!(
            steps,
            vec![
                DfsStep::Edge(g.edge(0, 3).unwrap()),
                DfsStep::Edge(g.edge(3, 2).unwrap()),
                DfsStep::Edge(g.edge(2, 1).unwrap()),
                DfsStep::Backtrack,
                DfsStep::Backtrack,
                DfsStep::Edge(g.edge(3, 4).unwrap()),
                DfsStep::Backtrack,
                DfsStep::Backtrack,
            ]
        );
    }

    #[test]
    fn dfs_decomposition_respects_priority() {
        let g = graph_with_edges(5, &[(3, "b", 5), (3, "a", 4), (3, "c", 1)]);

        let default = dfs_decomposition(&g, &DEFAULT_PRIORITY);
        assert_eq!(
            edges_only(&default),
            vec![
                &Edge::new(3, "c", 1),
                &Edge::new(3, "a", 4),
                &Edge::new(3, "b", 5)
            ]
        );

        let by_label = dfs_decomposition(&g, &[DfsPriority::Label]);
        assert_eq!(
            edges_only(&by_label),
            vec![
                &Edge::new(3, "a", 4),
                &Edge::new(3, "b", 5),
                &Edge::new(3, "c", 1)
            ]
        );

        let right = dfs_decomposition(&g, &[DfsPriority::Right, DfsPriority::Min]);
        assert_eq!(
            edges_only(&right),
            vec![
                &Edge::new(3, "a", 4),
                &Edge::new(3, "b", 5),
                &Edge::new(3, "c", 1)
            ]
        );
    }

    #[test]
    fn dfs_decomposition_visits_each_edge_once() {
        // Node 3 is reachable through both 1 and 2.
        let g = graph_with_edges(
            4,
            &[(0, "root", 1), (1, "a", 3), (0, "x", 2), (2, "b", 3), (3, "c", 4)],
        );
        let steps = dfs_decomposition(&g, &DEFAULT_PRIORITY);
        let edges = edges_only(&steps);

        assert_eq!(edges.len(), g.len());
        assert_eq!(
            steps.iter().filter(|s| **s == DfsStep::Backtrack).count(),
            g.len()
        );

        let pos = |e: &Edge| edges.iter().position(|x| *x == e).unwrap();
        assert!(pos(&Edge::new(3, "c", 4)) < pos(&Edge::new(2, "b", 3)));
    }

    #[test]
    fn priorities_parse_case_insensitively() {
        assert_eq!("left".parse::<DfsPriority>(), Ok(DfsPriority::Left));
        assert_eq!("Label".parse::<DfsPriority>(), Ok(DfsPriority::Label));
        assert_eq!(
            "longest".parse::<DfsPriority>(),
            Err(GraphError::UnknownPriority {
                value: "longest".to_string()
            })
        );
    }
}
