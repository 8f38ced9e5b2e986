use std::collections::{HashSet, VecDeque};

use depgraph::graph::{Edge, Graph};
use depgraph::node::Node;
use tracing::trace;

use crate::action::Action;
use crate::error::EncodeError;

/// Encode a graph as a sequence of transitions.
pub trait Encode {
    /// Encode a graph.
    ///
    /// Returns the actions that rebuild the edges of `graph` when they are
    /// decoded over the nodes of `graph`.
    fn encode(&self, graph: &Graph) -> Result<Vec<Action>, EncodeError>;
}

/// Decode a sequence of transitions into a graph.
pub trait Decode {
    /// Decode actions over the given nodes.
    ///
    /// The decoded graph always has a root node. A node with index 0 in
    /// `nodes` replaces the default root. Actions that cannot be applied
    /// in the current configuration are skipped.
    fn decode<I>(&self, actions: &[Action], nodes: I) -> Graph
    where
        I: IntoIterator<Item = Node>;
}

/// Stack/buffer/pass-list transition system for dependency graphs.
///
/// This is a list-based system in the style of Covington's algorithm:
/// nodes that cannot be attached yet are moved to a pass list and are
/// restored onto the stack by the next shift. This makes it possible to
/// encode non-projective and multi-headed graphs.
///
/// ```
/// use depgraph::graph::{Edge, Graph};
/// use depgraph::node::Node;
/// use depgraph_transition::{format_actions, Decode, Encode, ListTransitionSystem};
///
/// let mut graph = Graph::with_root();
/// graph.add_node(Node::new(1, "sleep"));
/// graph.add_edge(Edge::new(0, "root", 1));
///
/// let actions = ListTransitionSystem.encode(&graph).unwrap();
/// assert_eq!(format_actions(&actions), "RS(root)");
///
/// let decoded = ListTransitionSystem.decode(&actions, graph.nodes().cloned());
/// assert_eq!(decoded, graph);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ListTransitionSystem;

impl Encode for ListTransitionSystem {
    fn encode(&self, graph: &Graph) -> Result<Vec<Action>, EncodeError> {
        if graph.node(0).is_none() {
            return Err(EncodeError::MissingRoot);
        }

        if let Some(edge) = graph.edges().find(|e| e.source() == e.target()) {
            return Err(EncodeError::SelfLoop {
                node: edge.source(),
            });
        }

        let mut config = Configuration::new(graph);
        let mut used = HashSet::new();
        let mut actions = Vec::new();

        while let Some(b0) = config.buffer_front() {
            let s0 = config.stack_top();

            // Attach the stack top to the buffer front.
            if let Some(s0) = s0.filter(|&s0| s0 != 0) {
                if let Some(edge) = unused_edge(graph, b0, s0, &used) {
                    used.insert(edge);
                    if has_unaccounted_edges(graph, s0, &used) {
                        actions.push(Action::LeftPass(edge.label().to_owned()));
                        config.pass();
                    } else {
                        actions.push(Action::LeftReduce(edge.label().to_owned()));
                        config.reduce();
                    }
                    continue;
                }
            }

            // Attach the buffer front to the stack top.
            if let Some(s0) = s0 {
                if let Some(edge) = unused_edge(graph, s0, b0, &used) {
                    used.insert(edge);
                    let below = &config.stack[..config.stack.len() - 1];
                    if stack_has_unaccounted_edges(graph, below, b0, &used) {
                        actions.push(Action::RightPass(edge.label().to_owned()));
                        config.pass();
                    } else {
                        actions.push(Action::RightShift(edge.label().to_owned()));
                        config.shift();
                    }
                    continue;
                }
            }

            if !stack_has_unaccounted_edges(graph, &config.stack, b0, &used) {
                actions.push(Action::Shift);
                config.shift();
                continue;
            }

            match s0 {
                Some(s0) if s0 != 0 => {
                    if has_unaccounted_edges(graph, s0, &used) {
                        actions.push(Action::Pass);
                        config.pass();
                    } else {
                        actions.push(Action::Reduce);
                        config.reduce();
                    }
                }
                _ => {
                    return Err(EncodeError::NoTransition {
                        stack_top: s0,
                        buffer_front: b0,
                    })
                }
            }
        }

        let unaccounted: Vec<Edge> = graph
            .edges()
            .filter(|edge| !used.contains(edge))
            .cloned()
            .collect();
        if !unaccounted.is_empty() {
            return Err(EncodeError::UnaccountedEdges { edges: unaccounted });
        }

        Ok(actions)
    }
}

impl Decode for ListTransitionSystem {
    fn decode<I>(&self, actions: &[Action], nodes: I) -> Graph
    where
        I: IntoIterator<Item = Node>,
    {
        let mut graph = Graph::with_root();
        for node in nodes {
            graph.add_node(node);
        }

        let mut config = Configuration::new(&graph);

        for action in actions {
            let s0 = config.stack_top();
            let b0 = config.buffer_front();

            match (action, s0, b0) {
                (Action::Shift, _, Some(_)) => config.shift(),
                (Action::Reduce, Some(_), _) => config.reduce(),
                (Action::Pass, Some(_), _) => config.pass(),
                (Action::LeftReduce(label), Some(s0), Some(b0)) => {
                    graph.add_edge(Edge::new(b0, label.as_str(), s0));
                    config.reduce();
                }
                (Action::LeftPass(label), Some(s0), Some(b0)) => {
                    graph.add_edge(Edge::new(b0, label.as_str(), s0));
                    config.pass();
                }
                (Action::RightShift(label), Some(s0), Some(b0)) => {
                    graph.add_edge(Edge::new(s0, label.as_str(), b0));
                    config.shift();
                }
                (Action::RightPass(label), Some(s0), Some(b0)) => {
                    graph.add_edge(Edge::new(s0, label.as_str(), b0));
                    config.pass();
                }
                _ => trace!(
                    "Skipping {} (stack top: {:?}, buffer front: {:?})",
                    action,
                    s0,
                    b0
                ),
            }
        }

        graph
    }
}

/// Parser configuration shared by the encoder and the decoder.
struct Configuration {
    stack: Vec<usize>,
    buffer: VecDeque<usize>,
    pass: Vec<usize>,
}

impl Configuration {
    fn new(graph: &Graph) -> Self {
        Configuration {
            stack: vec![0],
            buffer: graph
                .nodes()
                .map(Node::index)
                .filter(|&idx| idx != 0)
                .collect(),
            pass: Vec::new(),
        }
    }

    fn stack_top(&self) -> Option<usize> {
        self.stack.last().copied()
    }

    fn buffer_front(&self) -> Option<usize> {
        self.buffer.front().copied()
    }

    /// Restore the pass list onto the stack, then move the buffer front
    /// to the stack.
    fn shift(&mut self) {
        self.stack.extend(self.pass.drain(..).rev());
        if let Some(b0) = self.buffer.pop_front() {
            self.stack.push(b0);
        }
    }

    fn reduce(&mut self) {
        self.stack.pop();
    }

    fn pass(&mut self) {
        if let Some(s0) = self.stack.pop() {
            self.pass.push(s0);
        }
    }
}

fn unused_edge<'a>(
    graph: &'a Graph,
    source: usize,
    target: usize,
    used: &HashSet<&'a Edge>,
) -> Option<&'a Edge> {
    graph
        .edge(source, target)
        .filter(|edge| !used.contains(edge))
}

/// Returns `true` if `node` has an incident edge that is not used yet.
fn has_unaccounted_edges(graph: &Graph, node: usize, used: &HashSet<&Edge>) -> bool {
    graph
        .edges_of(node)
        .map(|edges| edges.iter().any(|edge| !used.contains(edge)))
        .unwrap_or(false)
}

/// Returns `true` if any of `nodes` has an unused edge to or from `node`.
fn stack_has_unaccounted_edges(
    graph: &Graph,
    nodes: &[usize],
    node: usize,
    used: &HashSet<&Edge>,
) -> bool {
    nodes.iter().any(|&other| {
        graph
            .edge(other, node)
            .into_iter()
            .chain(graph.edge(node, other))
            .any(|edge| !used.contains(edge))
    })
}

#[cfg(test)]
mod tests {
    use depgraph::graph::{Edge, Graph};
    use depgraph::node::Node;
    use proptest::prelude::*;

    use super::{Decode, Encode, ListTransitionSystem};
    use crate::action::{format_actions, parse_actions, Action};
    use crate::error::EncodeError;
    use crate::tests::{arbitrary_graph, graph_with_edges, TEST_GRAPHS, TEST_TRANSITIONS};

    fn edges(graph: &Graph) -> Vec<Edge> {
        graph.edges().cloned().collect()
    }

    #[test]
    fn encode_test_graphs() {
        for (graph, transitions) in TEST_GRAPHS.iter().zip(TEST_TRANSITIONS.iter()) {
            let actions = ListTransitionSystem.encode(graph).unwrap();
            assert_eq!(format_actions(&actions), *transitions);
        }
    }

    #[test]
    fn decode_test_graphs() {
        for (graph, transitions) in TEST_GRAPHS.iter().zip(TEST_TRANSITIONS.iter()) {
            let actions = parse_actions(transitions).unwrap();
            let decoded = ListTransitionSystem.decode(&actions, graph.nodes().cloned());
            assert_eq!(&decoded, graph);
        }
    }

    #[test]
    fn encode_chain() {
        let g = graph_with_edges(2, &[(0, "root", 1), (1, "obj", 2)]);
        let actions = ListTransitionSystem.encode(&g).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::RightShift("root".to_string()),
                Action::RightShift("obj".to_string())
            ]
        );

        let decoded = ListTransitionSystem.decode(&actions, g.nodes().cloned());
        assert_eq!(
            edges(&decoded),
            vec![Edge::new(0, "root", 1), Edge::new(1, "obj", 2)]
        );
    }

    #[test]
    fn encode_rejects_self_loops() {
        let g = graph_with_edges(2, &[(0, "root", 1), (2, "self", 2)]);
        assert_eq!(
            ListTransitionSystem.encode(&g),
            Err(EncodeError::SelfLoop { node: 2 })
        );
    }

    #[test]
    fn encode_rejects_graph_without_root() {
        let g: Graph = vec![Node::new(1, "a"), Node::new(2, "b")]
            .into_iter()
            .collect();
        assert_eq!(
            ListTransitionSystem.encode(&g),
            Err(EncodeError::MissingRoot)
        );
    }

    #[test]
    fn encode_fails_on_edge_into_root() {
        let g = graph_with_edges(1, &[(1, "up", 0)]);
        assert_eq!(
            ListTransitionSystem.encode(&g),
            Err(EncodeError::NoTransition {
                stack_top: Some(0),
                buffer_front: 1
            })
        );
    }

    #[test]
    fn encode_reports_unaccounted_cycle_edges() {
        let g = graph_with_edges(2, &[(0, "root", 1), (1, "a", 2), (2, "b", 1)]);
        assert_eq!(
            ListTransitionSystem.encode(&g),
            Err(EncodeError::UnaccountedEdges {
                edges: vec![Edge::new(1, "a", 2)]
            })
        );
    }

    #[test]
    fn encode_reports_shadowed_parallel_edges() {
        let g = graph_with_edges(2, &[(0, "root", 1), (1, "obj", 2), (1, "iobj", 2)]);
        assert_eq!(
            ListTransitionSystem.encode(&g),
            Err(EncodeError::UnaccountedEdges {
                edges: vec![Edge::new(1, "obj", 2)]
            })
        );
    }

    #[test]
    fn encode_empty_graph() {
        let g = Graph::with_root();
        assert!(ListTransitionSystem.encode(&g).unwrap().is_empty());

        let g = graph_with_edges(2, &[]);
        assert_eq!(
            ListTransitionSystem.encode(&g).unwrap(),
            vec![Action::Shift, Action::Shift]
        );
    }

    #[test]
    fn decode_skips_inapplicable_actions() {
        let g = graph_with_edges(1, &[]);
        let actions = parse_actions("NR NR LR(x) NS NS RS(y) NP NP").unwrap();
        let decoded = ListTransitionSystem.decode(&actions, g.nodes().cloned());
        assert_eq!(decoded.len(), 0);
        assert_eq!(decoded.order(), 2);
    }

    #[test]
    fn decode_adds_default_root() {
        let actions = parse_actions("RS(root)").unwrap();
        let decoded = ListTransitionSystem.decode(&actions, vec![Node::new(1, "dort")]);
        assert!(decoded.node(0).unwrap().is_root());
        assert_eq!(decoded.node(0).unwrap().token(), depgraph::node::ROOT_TOKEN);
        assert_eq!(edges(&decoded), vec![Edge::new(0, "root", 1)]);
    }

    #[test]
    fn decode_keeps_supplied_root() {
        let decoded = ListTransitionSystem.decode(&[], vec![Node::new(0, "ROOT")]);
        assert_eq!(decoded.node(0).unwrap().token(), "ROOT");
    }

    proptest! {
        #[test]
        fn encoded_graphs_roundtrip(graph in arbitrary_graph()) {
            if let Ok(actions) = ListTransitionSystem.encode(&graph) {
                let decoded = ListTransitionSystem.decode(&actions, graph.nodes().cloned());
                prop_assert_eq!(edges(&decoded), edges(&graph));
            }
        }
    }
}
