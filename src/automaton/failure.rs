//! Failure links: turning the prefix tree into an Aho-Corasick automaton.

use std::collections::VecDeque;

use bitvec::vec::BitVec;
use tracing::trace;

use super::{MatchKind, NfaBuilder, StateID};

impl NfaBuilder {
    /// Compute the failure link of every trie state.
    ///
    /// States are visited breadth-first, so the failure target of a state (always
    /// shallower) is final by the time its matches are copied. Requires the
    /// start state to be complete, which stops every failure walk.
    ///
    /// With leftmost semantics a matching state fails to the dead state and
    /// inherits nothing: once a higher-priority pattern has matched on this
    /// path, no longer or overlapping pattern may be reported.
    pub(super) fn add_failure_transitions(&mut self) {
        let is_leftmost = self.nfa().match_kind.is_leftmost();
        let mut queue = VecDeque::new();
        let mut visited: BitVec = BitVec::repeat(false, self.nfa().n_states());
        visited.set(StateID::START.0, true);

        let seeds = self.nfa().state(StateID::START).transitions().collect::<Vec<_>>();
        for (_, child) in seeds {
            if visited.replace(child.0, true) {
                continue;
            }
            queue.push_back(child);
            if is_leftmost && self.nfa().state(child).is_match() {
                self.fail_to_dead(child);
            }
        }

        while let Some(state) = queue.pop_front() {
            let children = self.nfa().state(state).transitions().collect::<Vec<_>>();
            for (byte, child) in children {
                if visited.replace(child.0, true) {
                    continue;
                }
                queue.push_back(child);
                if is_leftmost && self.nfa().state(child).is_match() {
                    self.fail_to_dead(child);
                    continue;
                }
                let failed = self.failure_target(state, byte);
                self.nfa_mut().state_mut(child).failed = failed;
                self.copy_matches(failed, child);
            }
            if self.nfa().match_kind == MatchKind::Standard {
                self.copy_matches(StateID::START, state);
            }
        }
    }

    /// The state reached on `byte` from the longest proper suffix of `parent`
    /// that has a transition on `byte`.
    fn failure_target(&self, parent: StateID, byte: u8) -> StateID {
        let nfa = self.nfa();
        let mut fail = nfa.state(parent).failed;
        loop {
            if let Some(next) = nfa.state(fail).next_state(byte) {
                return next;
            }
            fail = nfa.state(fail).failed;
        }
    }

    fn fail_to_dead(&mut self, state: StateID) {
        trace!(state = state.0, "failure link to dead state");
        self.nfa_mut().state_mut(state).failed = StateID::DEAD;
    }

    /// Add all matches of `src` to `dst`.
    fn copy_matches(&mut self, src: StateID, dst: StateID) {
        if src == dst || !self.nfa().state(src).is_match() {
            return;
        }
        let matches = self.nfa().state(src).matches.clone();
        let dst = self.nfa_mut().state_mut(dst);
        for pattern in matches {
            dst.add_match(pattern);
        }
    }
}
