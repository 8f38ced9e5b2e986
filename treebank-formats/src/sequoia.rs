//! Deep-sequoia format reader and writer.
//!
//! Each token line has the columns `id token lemma cpos pos feats heads
//! labels`, optionally followed by extra columns. A token with more than
//! one head lists its heads and labels separated by `|`.

use std::io;

use depgraph::graph::{Edge, Graph};
use depgraph::node::Node;
use itertools::Itertools;

use crate::error::Error;
use crate::fields::{parse_head_field, parse_label, parse_node, NodeColumns};
use crate::io::{comment, read_block, Graphs, ReadGraph, WriteGraph};

/// A reader for deep-sequoia graphs.
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

            if fields.len() > 7 {
                for (head, label) in fields[6].split('|').zip(fields[7].split('|')) {
                    if let Some(head) = parse_head_field(head)? {
                        edges.push(Edge::new(
                            head,
                            parse_label(label, self.lowercase_labels),
                            node.index(),
                        ));
                    }
                }
            }

            graph.add_node(node);
        }

        graph.extend(edges);

        Ok(Some(graph))
    }
}

/// A writer for deep-sequoia graphs.
///
/// The heads of a token are written in the order in which they were
/// added to the graph. A token without heads is written with the six
/// token columns only, or with the head `-1` and label `NONE` when it
/// has extra columns.
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
            let extra = node.extra().join("\t");

            match graph.sources_of(node.index()) {
                Some(heads) => {
                    let sources = heads.keys().join("|");
                    let labels = heads.values().map(Edge::label).join("|");
                    if extra.is_empty() {
                        writeln!(self.write, "{}\t{}\t{}", columns, sources, labels)?;
                    } else {
                        writeln!(
                            self.write,
                            "{}\t{}\t{}\t{}",
                            columns, sources, labels, extra
                        )?;
                    }
                }
                None if extra.is_empty() => writeln!(self.write, "{}", columns)?,
                None => writeln!(self.write, "{}\t-1\tNONE\t{}", columns, extra)?,
            }
        }

        writeln!(self.write)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::str;

    use depgraph::graph::Edge;

    use super::{Reader, WriteGraph, Writer};
    use crate::io::ReadGraph;
    use crate::tests::{read_file, read_graphs, TEST_GRAPHS};

    static SEQUOIA: &str = "testdata/sequoia.conll";

    static DOUBLE_NEWLINE: &str = "testdata/double-newline.conll";

    #[test]
    fn reader() {
        let graphs = read_graphs(Reader::new(read_file(SEQUOIA)));
        assert_eq!(graphs, *TEST_GRAPHS);
    }

    #[test]
    fn reader_robust() {
        let graphs = read_graphs(Reader::new(read_file(DOUBLE_NEWLINE)));
        assert_eq!(graphs, *TEST_GRAPHS);
    }

    #[test]
    fn reader_lowercases_labels() {
        let mut reader = Reader::new(Cursor::new("1\tIl\til\tCL\tCLS\t_\t0\tROOT\n"))
            .lowercase_labels(true);
        let graph = reader.read_graph().unwrap().unwrap();
        assert!(graph.has_edge(&Edge::new(0, "root", 1)));
    }

    #[test]
    #[should_panic(expected = "ParseIntField")]
    fn reader_rejects_non_numeric_head() {
        let mut reader = Reader::new(Cursor::new("1\tIl\til\tCL\tCLS\t_\tx\tsuj\n"));
        reader.read_graph().unwrap();
    }

    #[test]
    fn extra_columns() {
        let data = "1\tIl\til\tCL\tCLS\t_\t-1\tNONE\tB-NP\n2\tdort\tdormir\tV\tV\t_\t0\troot\tB-VP\tx\n\n";
        let mut reader = Reader::new(Cursor::new(data));
        let graph = reader.read_graph().unwrap().unwrap();
        assert_eq!(graph.node(1).unwrap().extra(), &["B-NP".to_string()]);
        assert_eq!(graph.len(), 1);

        let mut writer = Writer::new(Vec::new());
        writer.write_graph(&graph).unwrap();
        assert_eq!(str::from_utf8(writer.get_ref()).unwrap(), data);
    }

    #[test]
    fn writer() {
        let mut writer = Writer::new(Vec::new());

        for graph in TEST_GRAPHS.iter() {
            writer.write_graph(graph).unwrap();
        }

        assert_eq!(
            read_file(SEQUOIA).into_inner(),
            str::from_utf8(writer.get_ref()).unwrap()
        );
    }
}
