//! Result tables and their output formats.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::error::ConfigError;

/// A table of results with a header row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Construct an empty table with the given column names.
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// The percentage of `part` in `total`, zero for an empty total.
pub(crate) fn percentage(part: f64, total: f64) -> f64 {
    if total > 0. {
        part / total * 100.
    } else {
        0.
    }
}

/// Format a number with two decimals.
pub(crate) fn decimal(value: f64) -> String {
    format!("{:.2}", value)
}

/// Table output formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TableFormat {
    /// Tab-separated rows.
    Csv,

    /// A booktabs `tabular` environment.
    Latex,
}

impl TableFormat {
    /// All known table formats.
    pub const ALL: [TableFormat; 2] = [TableFormat::Csv, TableFormat::Latex];

    /// The name of the table format.
    pub fn name(self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Latex => "latex",
        }
    }

    /// Render a table.
    ///
    /// Every line of the output, including the last, ends with a newline.
    pub fn format(self, table: &Table) -> String {
        match self {
            TableFormat::Csv => format_csv(table),
            TableFormat::Latex => format_latex(table),
        }
    }
}

fn format_csv(table: &Table) -> String {
    let mut output = String::new();
    for row in std::iter::once(&table.header).chain(&table.rows) {
        output.push_str(&row.join("\t"));
        output.push('\n');
    }
    output
}

fn format_latex(table: &Table) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\\begin{{tabular}}{{{}}}\n",
        "c".repeat(table.header.len())
    ));
    output.push_str("\t\\toprule\n");
    output.push_str(&format!("\t{}\\\\\n", table.header.iter().join(" & ")));
    output.push_str("\t\\midrule\n");
    for row in &table.rows {
        output.push_str(&format!("\t{}\\\\\n", row.iter().join(" & ")));
    }
    output.push_str("\t\\bottomrule\n");
    output.push_str("\\end{tabular}\n");
    output
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TableFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableFormat::ALL
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownTable {
                value: s.to_owned(),
            })
    }
}
