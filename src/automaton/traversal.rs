use std::slice;

use crate::PatternID;

use super::{MatchKind, Nfa, StateID};

/// A pattern occurrence found by the automaton.
///
/// Only the end position is tracked while scanning; the start is derived from
/// the pattern length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternMatch {
    /// The matching pattern ID.
    pub pattern: PatternID,
    /// Offset of the last matched byte (inclusive).
    pub end: usize,
}

impl Nfa {
    /// Run the automaton on the `haystack` input data.
    pub fn run<'a, 'h>(&'a self, haystack: &'h [u8]) -> NfaTraverser<'a, 'h> {
        NfaTraverser::new(self, haystack)
    }
}

/// An iterator for scanning a haystack with an [`Nfa`].
///
/// Reads one byte at a time. On a missing transition the cursor follows the
/// failure link and the same byte is tried again. Matches are yielded in
/// ascending end offset; within one position, in ascending [`PatternID`]
/// order.
///
/// Entering the dead state ends the scan: no further byte is read, even if
/// patterns occur later in the haystack.
#[derive(Debug, Clone)]
pub struct NfaTraverser<'a, 'h> {
    automaton: &'a Nfa,
    haystack: &'h [u8],
    /// Position of the next byte to read
    pos: usize,
    state: StateID,
    /// Matches of the current state that are still to be yielded
    pending: slice::Iter<'a, PatternID>,
    pending_end: usize,
    dead: bool,
}

impl<'a, 'h> NfaTraverser<'a, 'h> {
    fn new(automaton: &'a Nfa, haystack: &'h [u8]) -> Self {
        Self {
            automaton,
            haystack,
            pos: 0,
            state: automaton.start(),
            pending: [].iter(),
            pending_end: 0,
            dead: false,
        }
    }

    /// Whether the scan was stopped by the dead state.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Enter `next` after reading the byte at `end`.
    fn enter(&mut self, next: StateID, end: usize) {
        let automaton: &'a Nfa = self.automaton;
        self.state = next;
        let state = automaton.state(next);
        if !state.is_match() {
            return;
        }
        let matches = state.matches();
        self.pending = match automaton.match_kind() {
            MatchKind::Standard => matches.iter(),
            // Leftmost-longest is not distinguished from leftmost-first
            MatchKind::LeftmostFirst | MatchKind::LeftmostLongest => matches[..1].iter(),
        };
        self.pending_end = end;
    }
}

impl Iterator for NfaTraverser<'_, '_> {
    type Item = PatternMatch;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(&pattern) = self.pending.next() {
                return Some(PatternMatch {
                    pattern,
                    end: self.pending_end,
                });
            }
            if self.dead {
                return None;
            }
            let &byte = self.haystack.get(self.pos)?;
            let automaton = self.automaton;
            let state = automaton.state(self.state);
            match state.next_state(byte) {
                None => {
                    // Retry the same byte from the failure state
                    self.state = state.failure();
                }
                Some(StateID::DEAD) => {
                    self.dead = true;
                    return None;
                }
                Some(next) => {
                    let end = self.pos;
                    self.pos += 1;
                    self.enter(next, end);
                }
            }
        }
    }
}
