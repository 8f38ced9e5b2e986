use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::error::ParseActionError;

/// Transition system action.
///
/// The textual form of an action is its tag, followed by the label in
/// parentheses for the actions that add an edge, e.g. `NS` or
/// `LR(nsubj)`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    /// Move the buffer front to the stack (`NS`).
    Shift,

    /// Pop the stack (`NR`).
    Reduce,

    /// Move the stack top to the pass list (`NP`).
    Pass,

    /// Add an edge buffer front -> stack top and pop the stack (`LR`).
    LeftReduce(String),

    /// Add an edge buffer front -> stack top and pass the stack top (`LP`).
    LeftPass(String),

    /// Add an edge stack top -> buffer front and shift (`RS`).
    RightShift(String),

    /// Add an edge stack top -> buffer front and pass the stack top (`RP`).
    RightPass(String),
}

impl Action {
    /// The tag of the action.
    pub fn tag(&self) -> &'static str {
        match self {
            Action::Shift => "NS",
            Action::Reduce => "NR",
            Action::Pass => "NP",
            Action::LeftReduce(_) => "LR",
            Action::LeftPass(_) => "LP",
            Action::RightShift(_) => "RS",
            Action::RightPass(_) => "RP",
        }
    }

    /// The label of the edge that the action adds, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Action::Shift | Action::Reduce | Action::Pass => None,
            Action::LeftReduce(label)
            | Action::LeftPass(label)
            | Action::RightShift(label)
            | Action::RightPass(label) => Some(label),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.label() {
            Some(label) => write!(f, "{}({})", self.tag(), label),
            None => f.write_str(self.tag()),
        }
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, label) = match s.find('(') {
            Some(idx) if s.ends_with(')') => (&s[..idx], Some(&s[idx + 1..s.len() - 1])),
            Some(_) => {
                return Err(ParseActionError::UnknownAction {
                    value: s.to_owned(),
                })
            }
            None => (s, None),
        };

        let tag = tag.to_ascii_uppercase();
        match (tag.as_str(), label) {
            ("NS", None) => Ok(Action::Shift),
            ("NR", None) => Ok(Action::Reduce),
            ("NP", None) => Ok(Action::Pass),
            ("NS", Some(_)) | ("NR", Some(_)) | ("NP", Some(_)) => {
                Err(ParseActionError::UnexpectedLabel {
                    value: s.to_owned(),
                })
            }
            ("LR", Some(label)) => Ok(Action::LeftReduce(label.to_owned())),
            ("LP", Some(label)) => Ok(Action::LeftPass(label.to_owned())),
            ("RS", Some(label)) => Ok(Action::RightShift(label.to_owned())),
            ("RP", Some(label)) => Ok(Action::RightPass(label.to_owned())),
            ("LR", None) | ("LP", None) | ("RS", None) | ("RP", None) => {
                Err(ParseActionError::MissingLabel {
                    value: s.to_owned(),
                })
            }
            _ => Err(ParseActionError::UnknownAction {
                value: s.to_owned(),
            }),
        }
    }
}

/// Parse a whitespace-separated sequence of actions.
pub fn parse_actions(s: &str) -> Result<Vec<Action>, ParseActionError> {
    s.split_whitespace().map(str::parse).collect()
}

/// Format actions as a space-separated string.
pub fn format_actions(actions: &[Action]) -> String {
    actions.iter().join(" ")
}
