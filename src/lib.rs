#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod alphabet;
pub mod automaton;
pub mod matcher;

pub use automaton::{MatchKind, Nfa, ParseMatchKindError, StateID};
pub use matcher::{AhoCorasick, AhoCorasickBuilder, FindIter, Match, PatternID};
