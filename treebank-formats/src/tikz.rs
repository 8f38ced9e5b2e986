//! TikZ-dependency writer.

use std::io;

use depgraph::graph::Graph;
use depgraph::node::EMPTY_TOKEN;
use itertools::Itertools;

use crate::error::Error;
use crate::io::WriteGraph;

/// A writer for `tikz-dependency` environments.
///
/// Each graph is written as a `dependency` environment with a row of
/// tokens and a row of part-of-speech tags. Edges from the root are
/// written with `\deproot`, other edges with `\depedge`.
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
        let tokens = graph.nodes().filter(|node| !node.is_root());

        if let Some(id) = graph.id() {
            writeln!(self.write, "% {}", id)?;
        }
        writeln!(self.write, "\\begin{{dependency}}")?;
        writeln!(self.write, "\t\\begin{{deptext}}")?;
        writeln!(
            self.write,
            "\t\t{} \\\\",
            tokens.clone().map(|node| escape(node.token())).join(" \\& ")
        )?;
        writeln!(
            self.write,
            "\t\t{} \\\\",
            tokens
                .map(|node| escape(node.pos().unwrap_or(EMPTY_TOKEN)))
                .join(" \\& ")
        )?;
        writeln!(self.write, "\t\\end{{deptext}}")?;

        for edge in graph.edges() {
            if edge.source() == 0 {
                writeln!(
                    self.write,
                    "\t\\deproot{{{}}}{{{}}}",
                    edge.target(),
                    escape(edge.label())
                )?;
            } else {
                writeln!(
                    self.write,
                    "\t\\depedge{{{}}}{{{}}}{{{}}}",
                    edge.source(),
                    edge.target(),
                    escape(edge.label())
                )?;
            }
        }

        writeln!(self.write, "\\end{{dependency}}")?;
        writeln!(self.write)?;

        Ok(())
    }
}

/// Escape characters that have a special meaning in LaTeX.
pub(crate) fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            '\\' => escaped.push_str("\\textbackslash{}"),
            _ => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use std::str;

    use super::{escape, WriteGraph, Writer};
    use crate::tests::TEST_GRAPHS;

    #[test]
    fn writer() {
        let mut writer = Writer::new(Vec::new());
        writer.write_graph(&TEST_GRAPHS[0]).unwrap();

        assert_eq!(
            str::from_utf8(writer.get_ref()).unwrap(),
            "% sent_id = 1
\\begin{dependency}
\t\\begin{deptext}
\t\tLe \\& chat \\& dort \\& . \\\\
\t\tDET \\& NC \\& V \\& PONCT \\\\
\t\\end{deptext}
\t\\deproot{3}{root}
\t\\depedge{2}{1}{det}
\t\\depedge{3}{4}{ponct}
\t\\depedge{3}{2}{suj}
\\end{dependency}

"
        );
    }

    #[test]
    fn special_characters_are_escaped() {
        assert_eq!(escape("a_b & 50%"), "a\\_b \\& 50\\%");
        assert_eq!(escape("~\\"), "\\textasciitilde{}\\textbackslash{}");
    }
}
