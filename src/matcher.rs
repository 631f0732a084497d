//! The pattern matcher.
//!
//! [`AhoCorasick`] owns a pattern collection and the [`Nfa`] compiled from it.
//! It is configured through [`AhoCorasickBuilder`] and answers queries with
//! [`AhoCorasick::find_all`] or the lazy [`AhoCorasick::find_iter`].

use std::fmt::{self, Debug};
use std::ops::Range;

use derive_more::{Display, From, Into};
use derive_where::derive_where;

use crate::automaton::{MatchKind, Nfa, NfaTraverser, PatternMatch};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identify patterns with IDs.
///
/// The ID of a pattern is its position in the collection the matcher was
/// built from.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, From, Into, Hash, Debug, Display,
)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[display(fmt = "{}", _0)]
pub struct PatternID(pub usize);

/// Configuration for building an [`AhoCorasick`] matcher.
///
/// Defaults to [`MatchKind::Standard`] and case-sensitive matching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AhoCorasickBuilder {
    match_kind: MatchKind,
    ascii_case_insensitive: bool,
}

impl AhoCorasickBuilder {
    /// A builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the match semantics.
    pub fn match_kind(self, match_kind: MatchKind) -> Self {
        Self { match_kind, ..self }
    }

    /// Match ASCII letters regardless of case.
    ///
    /// Folding is done at construction by duplicating trie edges; the
    /// haystack is never normalised. Non-ASCII bytes always match exactly.
    pub fn ascii_case_insensitive(self, yes: bool) -> Self {
        Self {
            ascii_case_insensitive: yes,
            ..self
        }
    }

    /// Compile `patterns` into a matcher.
    pub fn build<I, P>(&self, patterns: I) -> AhoCorasick<P>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let patterns: Vec<P> = patterns.into_iter().collect();
        let automaton = Nfa::new(&patterns, self.match_kind, self.ascii_case_insensitive);
        AhoCorasick {
            patterns,
            automaton,
        }
    }
}

/// A multi-pattern matcher based on the Aho-Corasick automaton.
///
/// Patterns are any byte strings (`P: AsRef<[u8]>`). The matcher owns the
/// collection; to keep patterns in caller-owned storage, build it from
/// references (e.g. `&str`), and the borrow checker will keep that storage
/// alive for as long as the matcher.
///
/// Once built, the matcher is immutable and all queries take `&self`.
///
/// # Example
///
/// ```
/// use acmatch::AhoCorasick;
///
/// let ac = AhoCorasick::new(["he", "she"]);
/// let found: Vec<_> = ac
///     .find_all("ushers")
///     .iter()
///     .map(|m| (m.pattern.0, m.start, m.end))
///     .collect();
/// assert_eq!(found, vec![(0, 2, 3), (1, 1, 3)]);
/// ```
#[derive(Clone)]
pub struct AhoCorasick<P> {
    patterns: Vec<P>,
    automaton: Nfa,
}

impl<P: AsRef<[u8]>> AhoCorasick<P> {
    /// A matcher with [`MatchKind::Standard`] semantics, case-sensitive.
    pub fn new<I: IntoIterator<Item = P>>(patterns: I) -> Self {
        AhoCorasickBuilder::new().build(patterns)
    }

    /// A case-sensitive matcher with the given semantics.
    pub fn with_match_kind<I: IntoIterator<Item = P>>(patterns: I, match_kind: MatchKind) -> Self {
        AhoCorasickBuilder::new().match_kind(match_kind).build(patterns)
    }

    /// Find all matches in `haystack`, in ascending end offset.
    ///
    /// With [`MatchKind::Standard`], every occurrence of every pattern is
    /// reported, ordered by pattern ID at equal end offsets. With the
    /// leftmost kinds, at most one pattern is reported per position and the
    /// scan stops once no further match is allowed.
    pub fn find_all<H: AsRef<[u8]> + ?Sized>(&self, haystack: &H) -> Vec<Match<'_>> {
        self.find_iter(haystack).collect()
    }

    /// Iterate lazily over the matches of [`AhoCorasick::find_all`].
    pub fn find_iter<'a, 'h, H: AsRef<[u8]> + ?Sized>(
        &'a self,
        haystack: &'h H,
    ) -> FindIter<'a, 'h, P> {
        FindIter {
            matcher: self,
            traverser: self.automaton.run(haystack.as_ref()),
        }
    }

    /// Whether any pattern matches in `haystack`.
    pub fn is_match<H: AsRef<[u8]> + ?Sized>(&self, haystack: &H) -> bool {
        self.find_iter(haystack).next().is_some()
    }

    /// The pattern with the given ID.
    ///
    /// # Panics
    ///
    /// If `id` is not a pattern of this matcher.
    pub fn pattern(&self, id: PatternID) -> &P {
        &self.patterns[id.0]
    }

    fn to_match(&self, m: PatternMatch) -> Match<'_> {
        let bytes = self.patterns[m.pattern.0].as_ref();
        Match {
            pattern: m.pattern,
            bytes,
            start: m.end + 1 - bytes.len(),
            end: m.end,
        }
    }
}

impl AhoCorasick<Vec<u8>> {
    /// A builder to configure the matcher.
    ///
    /// The pattern type is chosen by [`AhoCorasickBuilder::build`], not by
    /// this call.
    pub fn builder() -> AhoCorasickBuilder {
        AhoCorasickBuilder::new()
    }
}

impl<P> AhoCorasick<P> {
    /// The patterns, in ID order.
    pub fn patterns(&self) -> &[P] {
        &self.patterns
    }

    /// Number of patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// The match semantics.
    pub fn match_kind(&self) -> MatchKind {
        self.automaton.match_kind()
    }

    /// Whether ASCII letters match regardless of case.
    pub fn is_ascii_case_insensitive(&self) -> bool {
        self.automaton.is_ascii_case_insensitive()
    }

    /// Length of the shortest pattern, 0 if there are none.
    pub fn min_pattern_len(&self) -> usize {
        self.automaton.min_pattern_len()
    }

    /// Length of the longest pattern, 0 if there are none.
    pub fn max_pattern_len(&self) -> usize {
        self.automaton.max_pattern_len()
    }

    /// The compiled automaton.
    pub fn automaton(&self) -> &Nfa {
        &self.automaton
    }
}

impl<P: Debug> Debug for AhoCorasick<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AhoCorasick")
            .field("patterns", &self.patterns)
            .field("match_kind", &self.match_kind())
            .field("ascii_case_insensitive", &self.is_ascii_case_insensitive())
            .field("n_states", &self.automaton.n_states())
            .finish()
    }
}

/// A match returned by an [`AhoCorasick`] matcher.
///
/// Offsets are byte positions in the haystack; `end` is inclusive. A match
/// of an empty pattern has `start == end + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match<'a> {
    /// The matching pattern ID.
    pub pattern: PatternID,
    /// The matched pattern, borrowed from the matcher's collection.
    pub bytes: &'a [u8],
    /// Offset of the first matched byte.
    pub start: usize,
    /// Offset of the last matched byte.
    pub end: usize,
}

impl Match<'_> {
    /// Length of the match in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the match is of an empty pattern.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The matched range as a half-open range, to index the haystack.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end + 1
    }
}

impl fmt::Display for Match<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}]",
            String::from_utf8_lossy(self.bytes),
            self.start,
            self.end
        )
    }
}

/// An iterator over the matches of an [`AhoCorasick`] matcher.
///
/// Created by [`AhoCorasick::find_iter`].
#[derive(Debug)]
#[derive_where(Clone)]
pub struct FindIter<'a, 'h, P> {
    matcher: &'a AhoCorasick<P>,
    traverser: NfaTraverser<'a, 'h>,
}

impl<'a, P: AsRef<[u8]>> Iterator for FindIter<'a, '_, P> {
    type Item = Match<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.traverser.next()?;
        Some(self.matcher.to_match(m))
    }
}
