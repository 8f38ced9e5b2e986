//! Format registry.

use std::fmt;
use std::io;
use std::str::FromStr;

use crate::error::Error;
use crate::io::{ReadGraph, WriteGraph};
use crate::sdp::Edition;
use crate::{linearize, penman, sagae, sdp, sequoia, tikz};

/// Treebank formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    Sequoia,
    Sagae,
    Sdp,
    Sdp2015,
    Linearize,
    Penman,
    Tikz,
}

impl Format {
    /// All known formats.
    pub const ALL: [Format; 7] = [
        Format::Sequoia,
        Format::Sagae,
        Format::Sdp,
        Format::Sdp2015,
        Format::Linearize,
        Format::Penman,
        Format::Tikz,
    ];

    /// The name of the format.
    pub fn name(self) -> &'static str {
        match self {
            Format::Sequoia => "sequoia",
            Format::Sagae => "sagae",
            Format::Sdp => "sdp",
            Format::Sdp2015 => "sdp2015",
            Format::Linearize => "linearize",
            Format::Penman => "penman",
            Format::Tikz => "tikz",
        }
    }

    /// Returns `true` if graphs can be read in this format.
    pub fn can_read(self) -> bool {
        !matches!(self, Format::Tikz)
    }

    /// Returns `true` if graphs can be written in this format.
    pub fn can_write(self) -> bool {
        !matches!(self, Format::Sdp | Format::Sdp2015)
    }

    /// Construct a reader for this format.
    pub fn reader<'a, R>(
        self,
        read: R,
        lowercase_labels: bool,
    ) -> Result<Box<dyn ReadGraph + 'a>, Error>
    where
        R: io::BufRead + 'a,
    {
        let reader: Box<dyn ReadGraph + 'a> = match self {
            Format::Sequoia => {
                Box::new(sequoia::Reader::new(read).lowercase_labels(lowercase_labels))
            }
            Format::Sagae => Box::new(sagae::Reader::new(read).lowercase_labels(lowercase_labels)),
            Format::Sdp => Box::new(
                sdp::Reader::new(read, Edition::Sdp2014).lowercase_labels(lowercase_labels),
            ),
            Format::Sdp2015 => Box::new(
                sdp::Reader::new(read, Edition::Sdp2015).lowercase_labels(lowercase_labels),
            ),
            Format::Linearize => {
                Box::new(linearize::Reader::new(read).lowercase_labels(lowercase_labels))
            }
            Format::Penman => {
                Box::new(penman::Reader::new(read).lowercase_labels(lowercase_labels))
            }
            Format::Tikz => {
                return Err(Error::UnsupportedReader {
                    format: self.to_string(),
                })
            }
        };

        Ok(reader)
    }

    /// Construct a writer for this format.
    pub fn writer<'a, W>(self, write: W) -> Result<Box<dyn WriteGraph + 'a>, Error>
    where
        W: io::Write + 'a,
    {
        let writer: Box<dyn WriteGraph + 'a> = match self {
            Format::Sequoia => Box::new(sequoia::Writer::new(write)),
            Format::Sagae => Box::new(sagae::Writer::new(write)),
            Format::Linearize => Box::new(linearize::Writer::new(write)),
            Format::Penman => Box::new(penman::Writer::new(write)),
            Format::Tikz => Box::new(tikz::Writer::new(write)),
            Format::Sdp | Format::Sdp2015 => {
                return Err(Error::UnsupportedWriter {
                    format: self.to_string(),
                })
            }
        };

        Ok(writer)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownFormat {
                value: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::Format;
    use crate::error::Error;
    use crate::io::{ReadGraph, WriteGraph};
    use crate::tests::{read_file, TEST_GRAPHS};

    #[test]
    fn formats_parse_by_name() {
        for format in Format::ALL.iter() {
            assert_eq!(format.name().parse::<Format>().unwrap(), *format);
        }
        assert_eq!("SDP2015".parse::<Format>().unwrap(), Format::Sdp2015);
        assert!(matches!(
            "conllu".parse::<Format>(),
            Err(Error::UnknownFormat { .. })
        ));
    }

    #[test]
    fn capabilities() {
        assert!(!Format::Tikz.can_read());
        assert!(Format::Tikz.can_write());
        assert!(Format::Sdp.can_read());
        assert!(!Format::Sdp2015.can_write());

        assert!(matches!(
            Format::Tikz.reader(Cursor::new(""), false),
            Err(Error::UnsupportedReader { .. })
        ));
        assert!(matches!(
            Format::Sdp.writer(Vec::new()),
            Err(Error::UnsupportedWriter { .. })
        ));
    }

    #[test]
    fn convert_through_registry() {
        let reader = Format::Sequoia
            .reader(read_file("testdata/sequoia.conll"), false)
            .unwrap();
        let mut output = Vec::new();
        {
            let mut writer = Format::Linearize.writer(&mut output).unwrap();
            for graph in reader.graphs() {
                writer.write_graph(&graph.unwrap()).unwrap();
            }
        }

        let converted = Format::Linearize
            .reader(Cursor::new(output), false)
            .unwrap()
            .graphs()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(converted, *TEST_GRAPHS);
    }
}
