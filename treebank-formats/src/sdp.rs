//! Semantic dependency parsing (SDP) format readers.
//!
//! Token lines have the columns `id form lemma pos top pred`, followed by
//! a frame column in the 2015 edition, followed by one argument column per
//! predicate of the sentence. Argument column *i* holds the label of the
//! edge from the *i*-th predicate to the token, or `_`.

use std::io;

use depgraph::graph::{Edge, Graph};
use depgraph::node::NodeBuilder;

use crate::error::{Error, ParseError};
use crate::fields::{parse_index_field, parse_label, parse_string_field};
use crate::io::{comment, read_block, Graphs, ReadGraph};

/// Label of the edge from the root to a top node.
pub const TOP_LABEL: &str = "root";

/// Edition of the SDP format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Edition {
    /// SemEval 2014.
    Sdp2014,

    /// SemEval 2015, which adds a frame column.
    Sdp2015,
}

impl Edition {
    fn first_argument_column(self) -> usize {
        match self {
            Edition::Sdp2014 => 6,
            Edition::Sdp2015 => 7,
        }
    }
}

/// A reader for SDP graphs.
pub struct Reader<R> {
    read: R,
    edition: Edition,
    lowercase_labels: bool,
}

impl<R: io::BufRead> Reader<R> {
    /// Construct a new reader for the given edition of the format.
    pub fn new(read: R, edition: Edition) -> Reader<R> {
        Reader {
            read,
            edition,
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
        let mut predicates = Vec::new();
        let mut arguments = Vec::new();

        for line in &lines {
            if let Some(comment) = comment(line) {
                graph.set_id(Some(comment));
                continue;
            }

            let fields: Vec<_> = line.split('\t').collect();
            if fields.len() < 6 {
                return Err(ParseError::MissingField {
                    field: "pred",
                    line: line.to_owned(),
                }
                .into());
            }

            let idx = parse_index_field(Some(fields[0]), line)?;
            let mut node = NodeBuilder::new(idx, fields[1]);
            if let Some(lemma) = parse_string_field(Some(fields[2])) {
                node = node.lemma(lemma);
            }
            if let Some(pos) = parse_string_field(Some(fields[3])) {
                node = node.cpos(pos.clone()).pos(pos);
            }
            graph.add_node(node.into());

            if fields[4] == "+" {
                graph.add_edge(Edge::new(0, TOP_LABEL, idx));
            }

            if fields[5] == "+" {
                predicates.push(idx);
            }

            let first = self.edition.first_argument_column();
            for (column, &label) in fields.iter().skip(first).enumerate() {
                if label != "_" {
                    arguments.push((column, parse_label(label, self.lowercase_labels), idx));
                }
            }
        }

        for (column, label, target) in arguments {
            let source = *predicates
                .get(column)
                .ok_or(ParseError::UnknownPredicate { column })?;
            graph.add_edge(Edge::new(source, label, target));
        }

        Ok(Some(graph))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use depgraph::graph::{Edge, Graph};

    use super::{Edition, Reader};
    use crate::error::{Error, ParseError};
    use crate::io::ReadGraph;
    use crate::tests::{read_file, read_graphs};

    static SDP2014: &str = "testdata/sdp2014.sdp";

    static SDP2015: &str = "testdata/sdp2015.sdp";

    fn check_graph(graph: &Graph) {
        assert_eq!(graph.id(), Some("22000001"));
        assert_eq!(graph.order(), 5);
        assert_eq!(
            graph.edges().cloned().collect::<Vec<_>>(),
            vec![
                Edge::new(0, "root", 3),
                Edge::new(2, "det", 1),
                Edge::new(3, "suj", 2)
            ]
        );

        let node = graph.node(2).unwrap();
        assert_eq!(node.token(), "chat");
        assert_eq!(node.cpos(), Some("NC"));
        assert_eq!(node.pos(), Some("NC"));
    }

    #[test]
    fn reader_2014() {
        let graphs = read_graphs(Reader::new(read_file(SDP2014), Edition::Sdp2014));
        assert_eq!(graphs.len(), 2);
        check_graph(&graphs[0]);
        assert_eq!(graphs[1].len(), 0);
    }

    #[test]
    fn reader_2015() {
        let graphs = read_graphs(Reader::new(read_file(SDP2015), Edition::Sdp2015));
        assert_eq!(graphs.len(), 1);
        check_graph(&graphs[0]);
    }

    #[test]
    fn argument_without_predicate_is_rejected() {
        let mut reader = Reader::new(
            Cursor::new("1\tIl\til\tCLS\t-\t-\tARG1\n"),
            Edition::Sdp2014,
        );
        match reader.read_graph() {
            Err(Error::Parse(err)) => {
                assert_eq!(err, ParseError::UnknownPredicate { column: 0 })
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
