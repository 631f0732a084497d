//! Core Aho-Corasick automaton.
//!
//! The automaton is an arena of [`State`]s addressed by [`StateID`]s. Forward
//! trie edges, failure links and the self-loops of the start and dead states
//! form a cyclic graph; all of it is owned by the [`Nfa`] and dropped as a
//! unit.
//!
//! Construction inserts the patterns into a prefix tree, closes the start and
//! dead states and then adds failure links. Queries run the automaton with an
//! [`NfaTraverser`].

mod builder;
mod failure;
mod traversal;
mod view;

use std::fmt::{self, Debug};
use std::str::FromStr;

use derive_more::{Display, From, Into};
use smallvec::SmallVec;
use thiserror::Error;

use crate::alphabet::{Alphabet, ALPHABET_LEN};
use crate::PatternID;

pub(crate) use builder::NfaBuilder;
pub use traversal::{NfaTraverser, PatternMatch};

/// How matches are reported when several patterns overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MatchKind {
    /// Report every occurrence of every pattern, overlaps included.
    #[default]
    #[display(fmt = "standard")]
    Standard,
    /// Earlier patterns take priority; matching stops at the dead state.
    #[display(fmt = "leftmost-first")]
    LeftmostFirst,
    /// Accepted for compatibility. Currently behaves exactly like
    /// [`MatchKind::LeftmostFirst`]; no longest-match comparison is made.
    #[display(fmt = "leftmost-longest")]
    LeftmostLongest,
}

impl MatchKind {
    /// Whether the priority-based (non-overlapping) semantics apply.
    pub fn is_leftmost(self) -> bool {
        matches!(self, MatchKind::LeftmostFirst | MatchKind::LeftmostLongest)
    }
}

/// Error returned when parsing an unknown [`MatchKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown match kind {0:?}, expected one of: standard, leftmost-first, leftmost-longest")]
pub struct ParseMatchKindError(pub String);

impl FromStr for MatchKind {
    type Err = ParseMatchKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "standard" => Ok(MatchKind::Standard),
            "leftmost-first" => Ok(MatchKind::LeftmostFirst),
            "leftmost-longest" => Ok(MatchKind::LeftmostLongest),
            _ => Err(ParseMatchKindError(s.to_string())),
        }
    }
}

/// A state ID in an Aho-Corasick automaton
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, From, Into, Hash, Debug, Display)]
#[display(fmt = "{}", _0)]
pub struct StateID(usize);

impl StateID {
    /// The start state of every automaton.
    pub const START: StateID = StateID(0);
    /// The dead (sink) state of every automaton.
    pub const DEAD: StateID = StateID(1);

    /// The arena index of the state.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the automaton
///
/// Nodes have zero, one or many matches that are reported when the state is
/// entered.
#[derive(Clone)]
pub struct State {
    /// Direct transitions, one per byte value.
    transitions: [Option<StateID>; ALPHABET_LEN],
    /// Patterns recognised at this state, sorted and without duplicates.
    matches: SmallVec<[PatternID; 2]>,
    /// The state of the longest proper suffix that is also a trie prefix.
    failed: StateID,
    /// Distance from the start state along trie edges.
    depth: usize,
}

impl State {
    fn new(failed: StateID, depth: usize) -> Self {
        Self {
            transitions: [None; ALPHABET_LEN],
            matches: SmallVec::new(),
            failed,
            depth,
        }
    }

    /// Whether entering this state reports at least one pattern.
    pub fn is_match(&self) -> bool {
        !self.matches.is_empty()
    }

    /// The state reached directly by `byte`, without following failure links.
    pub fn next_state(&self, byte: u8) -> Option<StateID> {
        self.transitions[byte as usize]
    }

    /// The patterns recognised at this state, in ascending [`PatternID`] order.
    pub fn matches(&self) -> &[PatternID] {
        &self.matches
    }

    /// The failure link.
    pub fn failure(&self) -> StateID {
        self.failed
    }

    /// Distance from the start state along trie edges.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// All defined transitions, in byte order.
    pub fn transitions(&self) -> impl Iterator<Item = (u8, StateID)> + '_ {
        (0..=u8::MAX).filter_map(move |b| Some((b, self.next_state(b)?)))
    }

    fn set_transition(&mut self, byte: u8, next: StateID) {
        self.transitions[byte as usize] = Some(next);
    }

    fn add_match(&mut self, pattern: PatternID) {
        if let Err(pos) = self.matches.binary_search(&pattern) {
            self.matches.insert(pos, pattern);
        }
    }
}

impl Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("transitions", &self.transitions().collect::<Vec<_>>())
            .field("matches", &self.matches)
            .field("failed", &self.failed)
            .field("depth", &self.depth)
            .finish()
    }
}

/// A compiled Aho-Corasick automaton over raw bytes.
///
/// Built once from a pattern set with [`crate::AhoCorasickBuilder`] (or
/// [`Nfa::new`]) and read-only afterwards: any number of threads may run
/// queries on it concurrently.
///
/// The automaton does not hold the patterns themselves, only their
/// [`PatternID`] and length.
#[derive(Clone)]
pub struct Nfa {
    /// The state arena. Index 0 is the start state, index 1 the dead state.
    states: Vec<State>,
    match_kind: MatchKind,
    ascii_case_insensitive: bool,
    /// Length of each pattern, indexed by [`PatternID`].
    pattern_lens: Vec<usize>,
    min_pattern_len: usize,
    max_pattern_len: usize,
    /// Bytes occurring in the patterns.
    alphabet: Alphabet,
}

impl Nfa {
    /// Compile `patterns` into an automaton.
    ///
    /// The `n`-th pattern is identified by `PatternID(n)`.
    pub fn new<I>(patterns: I, match_kind: MatchKind, ascii_case_insensitive: bool) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        NfaBuilder::from_patterns(patterns, match_kind, ascii_case_insensitive).finish()
    }

    /// An automaton with only the start and dead states.
    fn empty(match_kind: MatchKind, ascii_case_insensitive: bool) -> Self {
        let start = State::new(StateID::START, 0);
        let dead = State::new(StateID::START, 0);
        Self {
            states: vec![start, dead],
            match_kind,
            ascii_case_insensitive,
            pattern_lens: Vec::new(),
            min_pattern_len: 0,
            max_pattern_len: 0,
            alphabet: Alphabet::new(ascii_case_insensitive),
        }
    }

    /// The start state ID
    pub fn start(&self) -> StateID {
        StateID::START
    }

    /// The dead state ID
    pub fn dead(&self) -> StateID {
        StateID::DEAD
    }

    /// Get the state with the given ID.
    ///
    /// # Panics
    ///
    /// If `id` does not belong to this automaton.
    pub fn state(&self, id: StateID) -> &State {
        &self.states[id.0]
    }

    fn state_mut(&mut self, id: StateID) -> &mut State {
        &mut self.states[id.0]
    }

    /// Iterate over all states, start and dead states first.
    pub fn states(&self) -> impl Iterator<Item = (StateID, &State)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| (StateID(i), state))
    }

    /// Get the number of states in the automaton
    pub fn n_states(&self) -> usize {
        self.states.len()
    }

    /// The match semantics the automaton was compiled for.
    pub fn match_kind(&self) -> MatchKind {
        self.match_kind
    }

    /// Whether ASCII letters match regardless of case.
    pub fn is_ascii_case_insensitive(&self) -> bool {
        self.ascii_case_insensitive
    }

    /// Number of patterns the automaton was compiled from, pruned ones
    /// included.
    pub fn pattern_count(&self) -> usize {
        self.pattern_lens.len()
    }

    /// Length in bytes of a pattern.
    pub fn pattern_len(&self, pattern: PatternID) -> usize {
        self.pattern_lens[pattern.0]
    }

    /// Length of the shortest pattern, 0 if there are none.
    pub fn min_pattern_len(&self) -> usize {
        self.min_pattern_len
    }

    /// Length of the longest pattern, 0 if there are none.
    pub fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }

    /// The compacted alphabet of the pattern bytes.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
}

impl Debug for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dot_string())
    }
}
