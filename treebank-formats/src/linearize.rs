//! Linearized graphs.
//!
//! A linearized graph is written as a comment with the transition sequence
//! that builds its edges, followed by the token columns
//! `id token lemma cpos pos feats`. The sentence identifier, if any, is
//! written as a separate comment before the transitions.

use std::io;

use depgraph::graph::Graph;
use depgraph::node::Node;
use depgraph_transition::{
    format_actions, parse_actions, Action, Decode, Encode, ListTransitionSystem,
};

use crate::error::{Error, ParseError};
use crate::fields::{is_id_comment, parse_node, NodeColumns};
use crate::io::{comment, read_block, Graphs, ReadGraph, WriteGraph};

/// A reader for linearized graphs.
///
/// The transitions are replayed over the tokens to rebuild the graph.
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

        let mut id = None;
        let mut actions = Vec::new();
        let mut nodes = Vec::new();

        for line in &lines {
            if let Some(comment) = comment(line) {
                if is_id_comment(comment) {
                    id = Some(comment);
                } else {
                    actions = parse_actions(comment).map_err(ParseError::from)?;
                }
                continue;
            }

            let fields: Vec<_> = line.split('\t').collect();
            nodes.push(Node::from(parse_node(&fields, line)?));
        }

        if self.lowercase_labels {
            actions = actions.into_iter().map(lowercase_label).collect();
        }

        let mut graph = ListTransitionSystem.decode(&actions, nodes);
        graph.set_id(id);

        Ok(Some(graph))
    }
}

fn lowercase_label(action: Action) -> Action {
    match action {
        Action::LeftReduce(label) => Action::LeftReduce(label.to_lowercase()),
        Action::LeftPass(label) => Action::LeftPass(label.to_lowercase()),
        Action::RightShift(label) => Action::RightShift(label.to_lowercase()),
        Action::RightPass(label) => Action::RightPass(label.to_lowercase()),
        action => action,
    }
}

/// A writer for linearized graphs.
///
/// Graphs that cannot be encoded by the transition system result in
/// [`Error::Encode`]; nothing is written for such graphs.
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
        let actions = ListTransitionSystem.encode(graph)?;

        write_id_comment(&mut self.write, graph)?;
        writeln!(self.write, "# {}", format_actions(&actions))?;
        for node in graph.nodes().filter(|node| !node.is_root()) {
            writeln!(self.write, "{}", NodeColumns(node))?;
        }
        writeln!(self.write)?;

        Ok(())
    }
}

/// Write the identifier comment of a graph.
///
/// Identifiers that would be mistaken for the graph serialization are
/// written as `sent_id = <id>`.
pub(crate) fn write_id_comment<W>(write: &mut W, graph: &Graph) -> io::Result<()>
where
    W: io::Write,
{
    match graph.id() {
        Some(id) if is_id_comment(id) => writeln!(write, "# {}", id),
        Some(id) => writeln!(write, "# sent_id = {}", id),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::str;

    use depgraph::graph::{Edge, Graph};
    use depgraph::node::Node;

    use super::{Reader, WriteGraph, Writer};
    use crate::error::{Error, ParseError};
    use crate::io::ReadGraph;
    use crate::tests::{read_file, read_graphs, TEST_GRAPHS};

    static LINEARIZE: &str = "testdata/linearize.conll";

    #[test]
    fn reader() {
        let graphs = read_graphs(Reader::new(read_file(LINEARIZE)));
        assert_eq!(graphs, *TEST_GRAPHS);
    }

    #[test]
    fn writer() {
        let mut writer = Writer::new(Vec::new());

        for graph in TEST_GRAPHS.iter() {
            writer.write_graph(graph).unwrap();
        }

        assert_eq!(
            read_file(LINEARIZE).into_inner(),
            str::from_utf8(writer.get_ref()).unwrap()
        );
    }

    #[test]
    fn reader_lowercases_labels() {
        let mut reader =
            Reader::new(Cursor::new("# NS LR(DET)\n1\tLe\n2\tchat\n")).lowercase_labels(true);
        let graph = reader.read_graph().unwrap().unwrap();
        assert_eq!(
            graph.edges().cloned().collect::<Vec<_>>(),
            vec![Edge::new(2, "det", 1)]
        );
    }

    #[test]
    fn reader_rejects_malformed_actions() {
        let mut reader = Reader::new(Cursor::new("# NS XX\n1\tLe\n"));
        assert!(matches!(
            reader.read_graph(),
            Err(Error::Parse(ParseError::Action(_)))
        ));
    }

    #[test]
    fn writer_rejects_cycles() {
        let mut graph = Graph::with_root();
        graph.add_node(Node::new(1, "a"));
        graph.add_node(Node::new(2, "b"));
        graph.extend(vec![
            Edge::new(0, "root", 1),
            Edge::new(1, "x", 2),
            Edge::new(2, "y", 1),
        ]);

        let mut writer = Writer::new(Vec::new());
        assert!(matches!(writer.write_graph(&graph), Err(Error::Encode(_))));
        assert!(writer.get_ref().is_empty());
    }

    #[test]
    fn non_numeric_ids_are_marked() {
        let mut graph = Graph::with_root();
        graph.set_id(Some("frwiki_50.1000_00907"));

        let mut writer = Writer::new(Vec::new());
        writer.write_graph(&graph).unwrap();
        assert_eq!(
            str::from_utf8(writer.get_ref()).unwrap(),
            "# sent_id = frwiki_50.1000_00907\n# \n\n"
        );
    }
}
