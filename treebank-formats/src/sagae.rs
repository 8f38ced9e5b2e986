//! Sagae format reader and writer.
//!
//! Like the deep-sequoia format, but each token line carries at most one
//! head. A token with several heads is written on several lines.

use std::io;

use depgraph::graph::{Edge, Graph};
use depgraph::node::Node;

use crate::error::Error;
use crate::fields::{parse_head_field, parse_label, parse_node, NodeColumns};
use crate::io::{comment, read_block, Graphs, ReadGraph, WriteGraph};

/// A reader for Sagae graphs.
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
        let mut edges = Vec::new();

        for line in &lines {
            if let Some(comment) = comment(line) {
                graph.set_id(Some(comment));
                continue;
            }

            let fields: Vec<_> = line.split('\t').collect();
            let mut node = parse_node(&fields, line)?;
            if fields.len() > 8 {
                node = node.extra(fields[8..].iter().map(|&s| s.to_owned()).collect());
            }
            let node: Node = node.into();

            if let (Some(head), Some(label)) = (fields.get(6), fields.get(7)) {
                if let Some(head) = parse_head_field(head)? {
                    edges.push(Edge::new(
                        head,
                        parse_label(label, self.lowercase_labels),
                        node.index(),
                    ));
                }
            }

            // Repeated token lines replace the node.
            graph.add_node(node);
        }

        graph.extend(edges);

        Ok(Some(graph))
    }
}

/// A writer for Sagae graphs.
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
        if let Some(id) = graph.id() {
            writeln!(self.write, "# {}", id)?;
        }

        for node in graph.nodes().filter(|node| !node.is_root()) {
            let columns = NodeColumns(node);

            match graph.sources_of(node.index()) {
                Some(heads) => {
                    for (head, edge) in heads {
                        writeln!(self.write, "{}\t{}\t{}", columns, head, edge.label())?;
                    }
                }
                None => writeln!(self.write, "{}", columns)?,
            }
        }

        writeln!(self.write)?;

        Ok(())
    }
}
