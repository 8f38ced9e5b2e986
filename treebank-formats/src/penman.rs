//! PENMAN-style bracketed graphs.
//!
//! The graph is written as a comment with a bracketed serialization of
//! its depth-first decomposition, followed by the token columns. A node
//! with outgoing edges is written as `( idx_pos :label child ... )`; a
//! node without outgoing edges, or one that was visited before, is
//! written as `idx_pos`.

use std::collections::HashSet;
use std::io;
use std::iter::Peekable;
use std::slice;

use depgraph::algo::{dfs_decomposition, DfsStep, DEFAULT_PRIORITY};
use depgraph::graph::{Edge, Graph};
use depgraph::node::{Node, EMPTY_TOKEN};

use crate::error::{Error, ParseError};
use crate::fields::{is_id_comment, parse_label, parse_node, NodeColumns};
use crate::io::{comment, read_block, Graphs, ReadGraph, WriteGraph};
use crate::linearize::write_id_comment;

/// A reader for bracketed graphs.
pub struct Reader<R> {
    read: R,
    lowercase_labels: bool,
}

impl<R: io::BufRead> Reader<R> {
    /// Construct a new reader from an object that implements the
    /// `io::BufRead` trait.
    pub fn new(read: R) -> Reader<R> {
        Reader {
            read,
            lowercase_labels: false,
        }
    }

    /// Convert edge labels to lowercase while reading.
    pub fn lowercase_labels(mut self, lowercase: bool) -> Self {
        self.lowercase_labels = lowercase;
        self
    }
}

impl<R: io::BufRead> IntoIterator for Reader<R> {
    type Item = Result<Graph, Error>;
    type IntoIter = Graphs<Reader<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.graphs()
    }
}

impl<R: io::BufRead> ReadGraph for Reader<R> {
    fn read_graph(&mut self) -> Result<Option<Graph>, Error> {
        let lines = match read_block(&mut self.read)? {
            Some(lines) => lines,
            None => return Ok(None),
        };

        let mut graph = Graph::with_root();
        let mut bracketed = "";

        for line in &lines {
            if let Some(comment) = comment(line) {
                if is_id_comment(comment) {
                    graph.set_id(Some(comment));
                } else {
                    bracketed = comment;
                }
                continue;
            }

            let fields: Vec<_> = line.split('\t').collect();
            graph.add_node(Node::from(parse_node(&fields, line)?));
        }

        graph.extend(parse_edges(bracketed, self.lowercase_labels)?);

        Ok(Some(graph))
    }
}

/// Parse the edges of a bracketed serialization.
fn parse_edges(bracketed: &str, lowercase: bool) -> Result<Vec<Edge>, ParseError> {
    let mut edges = Vec::new();
    let mut parents = Vec::new();
    let mut open = false;
    let mut label = None;

    for piece in bracketed.split_whitespace() {
        match piece {
            "(" => open = true,
            ")" => {
                parents.pop();
            }
            _ => {
                if let Some(edge_label) = piece.strip_prefix(':') {
                    label = Some(parse_label(&denormalize_label(edge_label), lowercase));
                    continue;
                }

                let idx = node_index(piece)?;
                if let (Some(&parent), Some(label)) = (parents.last(), label.take()) {
                    edges.push(Edge::new(parent, label, idx));
                }

                if open {
                    parents.push(idx);
                    open = false;
                }
            }
        }
    }

    Ok(edges)
}

fn node_index(piece: &str) -> Result<usize, ParseError> {
    let idx = piece.split('_').next().unwrap_or(piece);
    idx.parse().map_err(|_| ParseError::ParseIntField {
        value: piece.to_owned(),
    })
}

fn normalize_pos(pos: &str) -> String {
    pos.replace('(', "-LRB-").replace(')', "-RRB-")
}

fn normalize_label(label: &str) -> String {
    label.replace(':', "-DDOTS-")
}

fn denormalize_label(label: &str) -> String {
    label.replace("-DDOTS-", ":")
}

/// Render the bracketed serialization of a graph.
///
/// Nodes are serialized in ascending index order, skipping the nodes that
/// are part of an earlier serialization.
pub fn bracketed(graph: &Graph) -> String {
    let steps = dfs_decomposition(graph, &DEFAULT_PRIORITY);
    let mut renderer = Renderer {
        graph,
        steps: steps.iter().peekable(),
        visited: HashSet::new(),
        pieces: Vec::new(),
    };

    for node in graph.nodes() {
        if !renderer.visited.contains(&node.index()) {
            renderer.render(node.index());
        }
    }

    renderer.pieces.join(" ")
}

struct Renderer<'a, 's> {
    graph: &'a Graph,
    steps: Peekable<slice::Iter<'s, DfsStep<'a>>>,
    visited: HashSet<usize>,
    pieces: Vec<String>,
}

impl<'a, 's> Renderer<'a, 's> {
    fn render(&mut self, node: usize) {
        self.visited.insert(node);

        let label = self.node_label(node);
        if self.next_edge_from(node).is_none() {
            self.pieces.push(label);
            return;
        }

        self.pieces.push("(".to_owned());
        self.pieces.push(label);

        while let Some(edge) = self.next_edge_from(node) {
            self.steps.next();
            self.pieces
                .push(format!(":{}", normalize_label(edge.label())));

            if self.visited.contains(&edge.target()) {
                let label = self.node_label(edge.target());
                self.pieces.push(label);
            } else {
                self.render(edge.target());
            }

            // Backtrack of the edge.
            self.steps.next();
        }

        self.pieces.push(")".to_owned());
    }

    fn next_edge_from(&mut self, node: usize) -> Option<&'a Edge> {
        match self.steps.peek() {
            Some(DfsStep::Edge(edge)) if edge.source() == node => Some(*edge),
            _ => None,
        }
    }

    fn node_label(&self, node: usize) -> String {
        let pos = self
            .graph
            .node(node)
            .and_then(Node::pos)
            .unwrap_or(EMPTY_TOKEN);
        format!("{}_{}", node, normalize_pos(pos))
    }
}

/// A writer for bracketed graphs.
pub struct Writer<W> {
    write: W,
}

impl<W: io::Write> Writer<W> {
    /// Construct a new writer from an object that implements the `io::Write`
    /// trait.
    pub fn new(write: W) -> Writer<W> {
        Writer { write }
    }

    /// Borrow the embedded writer.
    pub fn get_ref(&self) -> &W {
        &self.write
    }
}

impl<W: io::Write> WriteGraph for Writer<W> {
    fn write_graph(&mut self, graph: &Graph) -> Result<(), Error> {
        write_id_comment(&mut self.write, graph)?;
        writeln!(self.write, "# {}", bracketed(graph))?;
        for node in graph.nodes().filter(|node| !node.is_root()) {
            writeln!(self.write, "{}", NodeColumns(node))?;
        }
        writeln!(self.write)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str;

    use depgraph::graph::{Edge, Graph};
    use depgraph::node::{Node, NodeBuilder};

    use super::{bracketed, parse_edges, Reader, WriteGraph, Writer};
    use crate::tests::{read_file, read_graphs, TEST_GRAPHS};

    static PENMAN: &str = "testdata/penman.conll";

    #[test]
    fn reader() {
        let graphs = read_graphs(Reader::new(read_file(PENMAN)));
        assert_eq!(graphs, *TEST_GRAPHS);
    }

    #[test]
    fn writer() {
        let mut writer = Writer::new(Vec::new());

        for graph in TEST_GRAPHS.iter() {
            writer.write_graph(graph).unwrap();
        }

        assert_eq!(
            read_file(PENMAN).into_inner(),
            str::from_utf8(writer.get_ref()).unwrap()
        );
    }

    #[test]
    fn special_characters_are_normalized() {
        let mut graph = Graph::with_root();
        graph.add_node(NodeBuilder::new(1, "(").pos("PONCT(").into());
        graph.add_node(NodeBuilder::new(2, "x").pos("N").into());
        graph.add_edge(Edge::new(0, "root", 2));
        graph.add_edge(Edge::new(2, "dep:obl", 1));

        let serialized = bracketed(&graph);
        assert_eq!(
            serialized,
            "( 0__ :root ( 2_N :dep-DDOTS-obl 1_PONCT-LRB- ) )"
        );
        assert_eq!(
            parse_edges(&serialized, false).unwrap(),
            vec![Edge::new(0, "root", 2), Edge::new(2, "dep:obl", 1)]
        );
    }

    #[test]
    fn single_component_keeps_outer_brackets() {
        let mut graph = Graph::with_root();
        graph.add_node(Node::new(1, "w"));
        graph.add_edge(Edge::new(0, "root", 1));

        let serialized = bracketed(&graph);
        assert_eq!(serialized, "( 0__ :root 1__ )");
        assert_eq!(
            parse_edges(&serialized, false).unwrap(),
            vec![Edge::new(0, "root", 1)]
        );

        // Without the outer brackets the root has no parent scope.
        assert!(parse_edges("0__ :root 1__", false).unwrap().is_empty());
    }

    #[test]
    fn reentrant_nodes_are_not_expanded() {
        let mut graph = Graph::with_root();
        for idx in 1..=3 {
            graph.add_node(Node::new(idx, "w"));
        }
        graph.extend(vec![
            Edge::new(0, "root", 1),
            Edge::new(1, "a", 2),
            Edge::new(2, "b", 3),
            Edge::new(3, "c", 1),
        ]);

        assert_eq!(
            bracketed(&graph),
            "( 0__ :root ( 1__ :a ( 2__ :b ( 3__ :c 1__ ) ) ) )"
        );
    }
}
