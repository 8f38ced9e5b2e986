//! Linearization of dependency graphs with a list-based transition system.
//!
//! The transition system (Choi and McCallum, 2013; Sun et al., 2018)
//! operates on a stack, a buffer and a list of nodes that were passed
//! over. An encoder turns a graph into the unique sequence of actions
//! that rebuilds it, a decoder replays actions to recover the graph.

mod action;
pub use action::{format_actions, parse_actions, Action};

mod error;
pub use error::{EncodeError, ParseActionError};

mod transition;
pub use transition::{Decode, Encode, ListTransitionSystem};

#[cfg(test)]
mod tests;
