use tracing::{debug, trace};

use crate::alphabet::{opposite_ascii_case, ALPHABET_LEN};
use crate::PatternID;

use super::{MatchKind, Nfa, State, StateID};

/// Create Aho-Corasick automata from lists of patterns.
///
/// Patterns are first inserted into a prefix tree rooted at the start state.
/// [`NfaBuilder::finish`] then closes the start and dead states, computes the
/// failure links and returns the read-only [`Nfa`].
pub(crate) struct NfaBuilder {
    /// The automaton being built
    nfa: Nfa,
    /// Number of patterns that were not inserted because a prefix of theirs
    /// already matches (leftmost semantics only).
    n_pruned: usize,
}

impl NfaBuilder {
    /// Construct an empty automaton builder.
    pub(crate) fn new(match_kind: MatchKind, ascii_case_insensitive: bool) -> Self {
        Self {
            nfa: Nfa::empty(match_kind, ascii_case_insensitive),
            n_pruned: 0,
        }
    }

    /// Construct an automaton builder from a list of patterns.
    pub(crate) fn from_patterns<I>(
        patterns: I,
        match_kind: MatchKind,
        ascii_case_insensitive: bool,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        patterns.into_iter().fold(
            Self::new(match_kind, ascii_case_insensitive),
            |mut builder, pattern| {
                builder.add_pattern(pattern.as_ref());
                builder
            },
        )
    }

    /// Insert a pattern into the trie and return its ID.
    ///
    /// With leftmost semantics, insertion stops as soon as the walk reaches a
    /// state that already matches: the shorter pattern always wins at that
    /// position, so the rest of this one could never be reported. The pattern
    /// keeps its ID but is never registered as a match.
    pub(crate) fn add_pattern(&mut self, pattern: &[u8]) -> PatternID {
        let id = PatternID(self.nfa.pattern_lens.len());
        self.record_len(pattern.len());

        let is_leftmost = self.nfa.match_kind.is_leftmost();
        let mut state = StateID::START;
        for &byte in pattern {
            if is_leftmost && self.nfa.state(state).is_match() {
                trace!(pattern = id.0, depth = self.nfa.state(state).depth, "pruned pattern");
                self.n_pruned += 1;
                return id;
            }
            self.nfa.alphabet.add_byte(byte);
            state = match self.nfa.state(state).next_state(byte) {
                Some(next) => next,
                None => self.add_child(state, byte),
            };
        }
        self.nfa.state_mut(state).add_match(id);
        id
    }

    /// Construct the automaton.
    ///
    /// The returned automaton satisfies:
    ///  - every byte has a transition at the start and dead states,
    ///  - every trie state has a failure link,
    ///  - with [`MatchKind::Standard`], every state matches all patterns that
    ///    are a suffix of its path.
    pub(crate) fn finish(mut self) -> Nfa {
        self.add_start_state_loop();
        self.add_dead_state_loop();
        self.add_failure_transitions();
        self.close_start_state_loop_for_leftmost();

        let nfa = self.nfa;
        debug!(
            patterns = nfa.pattern_count(),
            pruned = self.n_pruned,
            states = nfa.n_states(),
            alphabet = nfa.alphabet.len(),
            match_kind = %nfa.match_kind,
            ascii_case_insensitive = nfa.ascii_case_insensitive,
            "compiled aho-corasick automaton"
        );
        nfa
    }

    fn record_len(&mut self, len: usize) {
        let nfa = &mut self.nfa;
        if nfa.pattern_lens.is_empty() {
            nfa.min_pattern_len = len;
            nfa.max_pattern_len = len;
        } else {
            nfa.min_pattern_len = nfa.min_pattern_len.min(len);
            nfa.max_pattern_len = nfa.max_pattern_len.max(len);
        }
        nfa.pattern_lens.push(len);
    }

    /// Add a new trie state below `parent` for `byte` (and its opposite
    /// case, if folding).
    fn add_child(&mut self, parent: StateID, byte: u8) -> StateID {
        let depth = self.nfa.state(parent).depth + 1;
        let child = StateID(self.nfa.states.len());
        self.nfa.states.push(State::new(StateID::START, depth));

        let ascii_case_insensitive = self.nfa.ascii_case_insensitive;
        let parent = self.nfa.state_mut(parent);
        parent.set_transition(byte, child);
        if ascii_case_insensitive {
            parent.set_transition(opposite_ascii_case(byte), child);
        }
        child
    }

    /// Bytes that do not start any pattern restart the search at the start
    /// state.
    fn add_start_state_loop(&mut self) {
        let start = self.nfa.state_mut(StateID::START);
        for next in start.transitions.iter_mut() {
            next.get_or_insert(StateID::START);
        }
    }

    fn add_dead_state_loop(&mut self) {
        let dead = self.nfa.state_mut(StateID::DEAD);
        dead.transitions = [Some(StateID::DEAD); ALPHABET_LEN];
    }

    /// If the start state matches under leftmost semantics, a match is
    /// committed before any byte is read: redirect the start self-loops to the
    /// dead state so the search never restarts.
    fn close_start_state_loop_for_leftmost(&mut self) {
        if !self.nfa.match_kind.is_leftmost() || !self.nfa.state(StateID::START).is_match() {
            return;
        }
        let start = self.nfa.state_mut(StateID::START);
        for next in start.transitions.iter_mut() {
            if *next == Some(StateID::START) {
                *next = Some(StateID::DEAD);
            }
        }
    }

    pub(super) fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub(super) fn nfa_mut(&mut self) -> &mut Nfa {
        &mut self.nfa
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn trie(patterns: &[&str], kind: MatchKind, fold: bool) -> Nfa {
        // Trie only, without loops or failure links
        NfaBuilder::from_patterns(patterns, kind, fold).nfa
    }

    fn walk(nfa: &Nfa, path: &[u8]) -> Option<StateID> {
        path.iter()
            .try_fold(StateID::START, |s, &b| nfa.state(s).next_state(b))
    }

    #[test]
    fn shared_prefixes() {
        let nfa = trie(&["he", "hers", "his"], MatchKind::Standard, false);
        // start, dead, h, he, her, hers, hi, his
        assert_eq!(nfa.n_states(), 8);
        let he = walk(&nfa, b"he").unwrap();
        assert_eq!(nfa.state(he).matches(), &[PatternID(0)]);
        assert_eq!(nfa.state(he).depth(), 2);
        let his = walk(&nfa, b"his").unwrap();
        assert_eq!(nfa.state(his).matches(), &[PatternID(2)]);
        assert_eq!(nfa.state(his).failure(), StateID::START);
        assert!(walk(&nfa, b"x").is_none());
    }

    #[test]
    fn case_folding_duplicates_edges() {
        let nfa = trie(&["Go"], MatchKind::Standard, true);
        assert_eq!(nfa.n_states(), 4);
        let go = walk(&nfa, b"Go").unwrap();
        for path in [b"go", b"GO", b"gO"] {
            assert_eq!(walk(&nfa, path), Some(go));
        }
        assert_eq!(nfa.alphabet().len(), 2);
    }

    #[test]
    fn duplicate_patterns_share_terminal() {
        let nfa = trie(&["ab", "ab"], MatchKind::Standard, false);
        let ab = walk(&nfa, b"ab").unwrap();
        assert_eq!(nfa.state(ab).matches(), &[PatternID(0), PatternID(1)]);
    }

    #[rstest]
    #[case(MatchKind::LeftmostFirst)]
    #[case(MatchKind::LeftmostLongest)]
    fn leftmost_prunes_extensions(#[case] kind: MatchKind) {
        let nfa = trie(&["a", "ab", "abc", "b"], kind, false);
        // start, dead, a, b
        assert_eq!(nfa.n_states(), 4);
        assert!(walk(&nfa, b"ab").is_none());
        assert_eq!(nfa.pattern_count(), 4);
    }

    #[test]
    fn leftmost_keeps_shorter_later_patterns() {
        // A shorter pattern inserted after a longer one is not pruned
        let nfa = trie(&["ab", "a"], MatchKind::LeftmostFirst, false);
        let a = walk(&nfa, b"a").unwrap();
        let ab = walk(&nfa, b"ab").unwrap();
        assert_eq!(nfa.state(a).matches(), &[PatternID(1)]);
        assert_eq!(nfa.state(ab).matches(), &[PatternID(0)]);
    }

    #[test]
    fn pattern_lengths() {
        let nfa = trie(&["abc", "", "abcdef"], MatchKind::Standard, false);
        assert_eq!(nfa.min_pattern_len(), 0);
        assert_eq!(nfa.max_pattern_len(), 6);
        assert_eq!(nfa.pattern_len(PatternID(2)), 6);
        assert_eq!(nfa.state(StateID::START).matches(), &[PatternID(1)]);
    }

    #[test]
    fn start_and_dead_loops() {
        let nfa = Nfa::new(["ab"], MatchKind::Standard, false);
        let start = nfa.state(nfa.start());
        let dead = nfa.state(nfa.dead());
        for b in 0..=u8::MAX {
            assert_eq!(dead.next_state(b), Some(nfa.dead()));
            let expected = if b == b'a' { StateID(2) } else { nfa.start() };
            assert_eq!(start.next_state(b), Some(expected));
        }
        assert_eq!(start.failure(), nfa.start());
    }

    #[test]
    fn leftmost_matching_start_closes_loops() {
        let nfa = Nfa::new(["a", ""], MatchKind::LeftmostFirst, false);
        let start = nfa.state(nfa.start());
        assert!(start.is_match());
        assert_eq!(start.next_state(b'a'), Some(StateID(2)));
        assert_eq!(start.next_state(b'b'), Some(nfa.dead()));
        assert_eq!(start.next_state(0xFF), Some(nfa.dead()));
    }

    #[test]
    fn standard_matching_start_keeps_loops() {
        let nfa = Nfa::new([""], MatchKind::Standard, false);
        assert_eq!(nfa.state(nfa.start()).next_state(b'b'), Some(nfa.start()));
    }
}
