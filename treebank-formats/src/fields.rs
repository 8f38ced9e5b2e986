//! Column parsing and formatting shared by the formats.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;
use std::ops::Deref;

use depgraph::node::{Features, Node, NodeBuilder, EMPTY_TOKEN};
use itertools::Itertools;

use crate::error::ParseError;

/// Morphological features in `k=v|k=v` notation.
#[derive(Debug, Eq, PartialEq)]
pub struct FeaturesField<'a>(pub Cow<'a, Features>);

impl<'a> FeaturesField<'a> {
    pub fn borrowed(features: &'a Features) -> Self {
        FeaturesField(Cow::Borrowed(features))
    }

    pub fn into_owned(self) -> Features {
        self.0.into_owned()
    }
}

impl FeaturesField<'static> {
    pub fn owned(features: Features) -> Self {
        FeaturesField(Cow::Owned(features))
    }

    fn parse_features(feature_string: impl AsRef<str>) -> Result<Self, ParseError> {
        let mut features = BTreeMap::new();

        if feature_string.as_ref() == EMPTY_TOKEN {
            return Ok(FeaturesField::owned(Features::new()));
        }

        for fv in feature_string.as_ref().split('|') {
            let idx = fv.find('=').ok_or(ParseError::IncorrectFeatureField {
                value: fv.to_owned(),
            })?;

            features.insert(fv[..idx].to_owned(), fv[idx + 1..].to_owned());
        }

        Ok(FeaturesField::owned(features.into()))
    }
}

impl<'a> Deref for FeaturesField<'a> {
    type Target = BTreeMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &**self.0
    }
}

impl<'a> fmt::Display for FeaturesField<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str(EMPTY_TOKEN)
        } else {
            let features_str = self.0.iter().map(|(k, v)| format!("{}={}", k, v)).join("|");
            f.write_str(&features_str)
        }
    }
}

impl TryFrom<&str> for FeaturesField<'static> {
    type Error = ParseError;

    fn try_from(feature_string: &str) -> Result<Self, Self::Error> {
        Self::parse_features(feature_string)
    }
}

/// The six token columns of a node: `id token lemma cpos pos feats`.
pub struct NodeColumns<'a>(pub &'a Node);

impl<'a> fmt::Display for NodeColumns<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let node = self.0;
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            node.index(),
            node.token(),
            node.lemma().unwrap_or(EMPTY_TOKEN),
            node.cpos().unwrap_or(EMPTY_TOKEN),
            node.pos().unwrap_or(EMPTY_TOKEN),
            FeaturesField::borrowed(node.features()),
        )
    }
}

/// Parse the token columns `id token lemma cpos pos feats` of a line.
///
/// Only the index and the token are required.
pub fn parse_node(fields: &[&str], line: &str) -> Result<NodeBuilder, ParseError> {
    let idx = parse_index_field(fields.get(0).copied(), line)?;
    let token = fields.get(1).ok_or_else(|| ParseError::MissingField {
        field: "token",
        line: line.to_owned(),
    })?;

    let mut builder = NodeBuilder::new(idx, *token);
    if let Some(lemma) = parse_string_field(fields.get(2).copied()) {
        builder = builder.lemma(lemma);
    }
    if let Some(cpos) = parse_string_field(fields.get(3).copied()) {
        builder = builder.cpos(cpos);
    }
    if let Some(pos) = parse_string_field(fields.get(4).copied()) {
        builder = builder.pos(pos);
    }
    if let Some(features) = fields.get(5) {
        builder = builder.features(FeaturesField::try_from(*features)?.into_owned());
    }

    Ok(builder)
}

pub fn parse_index_field(field: Option<&str>, line: &str) -> Result<usize, ParseError> {
    let field = field.ok_or_else(|| ParseError::MissingField {
        field: "id",
        line: line.to_owned(),
    })?;

    field.parse().map_err(|_| ParseError::ParseIntField {
        value: field.to_owned(),
    })
}

/// Parse a head column; `-1`, `_` and the empty string mean no head.
pub fn parse_head_field(field: &str) -> Result<Option<usize>, ParseError> {
    match field {
        "-1" | EMPTY_TOKEN | "" => Ok(None),
        _ => field
            .parse()
            .map(Some)
            .map_err(|_| ParseError::ParseIntField {
                value: field.to_owned(),
            }),
    }
}

pub fn parse_string_field(field: Option<&str>) -> Option<String> {
    field.and_then(|s| {
        if s == EMPTY_TOKEN {
            None
        } else {
            Some(s.to_string())
        }
    })
}

pub fn parse_label(label: &str, lowercase: bool) -> String {
    if lowercase {
        label.to_lowercase()
    } else {
        label.to_owned()
    }
}

/// Returns `true` if a comment holds a sentence identifier: it is either
/// numeric or has the form `attr = value`.
pub fn is_id_comment(comment: &str) -> bool {
    (!comment.is_empty() && comment.chars().all(|c| c.is_ascii_digit())) || comment.contains(" = ")
}
