//! Reader and writer traits shared by all formats.

use std::io;

use depgraph::graph::Graph;

use crate::error::Error;

/// A trait for objects that can read dependency `Graph`s.
pub trait ReadGraph {
    /// Read a `Graph` from this object.
    ///
    /// Returns `None` when there are no graphs left.
    ///
    /// # Errors
    ///
    /// A call to `read_graph` may generate an error to indicate that
    /// the operation could not be completed.
    fn read_graph(&mut self) -> Result<Option<Graph>, Error>;

    /// Get an iterator over the graphs in this reader.
    fn graphs(self) -> Graphs<Self>
    where
        Self: Sized,
    {
        Graphs { reader: self }
    }
}

impl<R> ReadGraph for Box<R>
where
    R: ReadGraph + ?Sized,
{
    fn read_graph(&mut self) -> Result<Option<Graph>, Error> {
        (**self).read_graph()
    }
}

/// An iterator over the graphs in a reader.
pub struct Graphs<R>
where
    R: ReadGraph,
{
    reader: R,
}

impl<R> Iterator for Graphs<R>
where
    R: ReadGraph,
{
    type Item = Result<Graph, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_graph().transpose()
    }
}

/// A trait for objects that can write dependency `Graph`s.
pub trait WriteGraph {
    /// Write a graph into this object.
    ///
    /// # Errors
    ///
    /// A call to `write_graph` may generate an error to indicate that
    /// the operation could not be completed.
    fn write_graph(&mut self, graph: &Graph) -> Result<(), Error>;
}

impl<W> WriteGraph for Box<W>
where
    W: WriteGraph + ?Sized,
{
    fn write_graph(&mut self, graph: &Graph) -> Result<(), Error> {
        (**self).write_graph(graph)
    }
}

/// Read the next blank-line separated block of trimmed lines.
///
/// Consecutive blank lines are treated as a single separator. Returns
/// `None` at the end of the input.
pub(crate) fn read_block<R>(read: &mut R) -> io::Result<Option<Vec<String>>>
where
    R: io::BufRead,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    loop {
        line.clear();

        // End of reader.
        if read.read_line(&mut line)? == 0 {
            if lines.is_empty() {
                return Ok(None);
            }

            return Ok(Some(lines));
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            if lines.is_empty() {
                continue;
            }

            return Ok(Some(lines));
        }

        lines.push(trimmed.to_owned());
    }
}

/// Get the text of a comment line, or `None` if the line is not a
/// comment.
pub(crate) fn comment(line: &str) -> Option<&str> {
    line.strip_prefix('#').map(str::trim)
}
