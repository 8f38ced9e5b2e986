use depgraph::graph::{Edge, Graph};
use depgraph::node::{Node, NodeBuilder};
use lazy_static::lazy_static;
use proptest::prelude::*;

lazy_static! {
    pub static ref TEST_GRAPHS: Vec<Graph> = vec![
        // Le chat dort .
        {
            let mut g = Graph::with_root();
            g.add_node(NodeBuilder::new(1, "Le").lemma("le").pos("DET").into());
            g.add_node(NodeBuilder::new(2, "chat").lemma("chat").pos("NC").into());
            g.add_node(NodeBuilder::new(3, "dort").lemma("dormir").pos("V").into());
            g.add_node(NodeBuilder::new(4, ".").lemma(".").pos("PONCT").into());
            g.extend(vec![
                Edge::new(2, "det", 1),
                Edge::new(3, "suj", 2),
                Edge::new(0, "root", 3),
                Edge::new(3, "ponct", 4),
            ]);
            g
        },
        // Non-projective.
        graph_with_edges(4, &[(0, "root", 1), (1, "b", 2), (1, "a", 3), (2, "c", 4)]),
        // Node 1 has two heads.
        graph_with_edges(3, &[(0, "root", 2), (2, "a", 1), (3, "b", 1)]),
    ];

    pub static ref TEST_TRANSITIONS: Vec<&'static str> = vec![
        "NS LR(det) NS LR(suj) RS(root) RS(ponct)",
        "RS(root) RS(b) NP RS(a) NR RS(c)",
        "NS LP(a) RS(root) NR LR(b) NS",
    ];
}

/// Construct a graph with a root, `n_tokens` tokens, and the given edges.
pub fn graph_with_edges(n_tokens: usize, edges: &[(usize, &str, usize)]) -> Graph {
    let mut g = Graph::with_root();
    for idx in 1..=n_tokens {
        g.add_node(Node::new(idx, format!("w{}", idx)));
    }

    g.extend(
        edges
            .iter()
            .map(|&(source, label, target)| Edge::new(source, label, target)),
    );

    g
}

/// Strategy for small graphs with arbitrary labeled edges between
/// distinct nodes.
pub fn arbitrary_graph() -> impl Strategy<Value = Graph> {
    const LABELS: [&str; 3] = ["a", "b", "c"];

    (1usize..8)
        .prop_flat_map(|n_tokens| {
            (
                Just(n_tokens),
                prop::collection::vec((0..=n_tokens, 0..LABELS.len(), 0..=n_tokens), 0..12),
            )
        })
        .prop_map(|(n_tokens, edges)| {
            let edges: Vec<_> = edges
                .into_iter()
                .filter(|&(source, _, target)| source != target)
                .map(|(source, label, target)| (source, LABELS[label], target))
                .collect();
            graph_with_edges(n_tokens, &edges)
        })
}
