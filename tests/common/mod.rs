//! A naive reference matcher to check the automaton against.

#![allow(dead_code)]

/// All occurrences of non-empty `patterns` in `haystack`, as
/// `(end, pattern, start)` sorted by end offset then pattern index.
pub fn naive_find_all<P: AsRef<[u8]>>(
    patterns: &[P],
    haystack: &[u8],
    ascii_case_insensitive: bool,
) -> Vec<(usize, usize, usize)> {
    let mut found = Vec::new();
    for (id, pattern) in patterns.iter().enumerate() {
        let pattern = pattern.as_ref();
        if pattern.is_empty() || pattern.len() > haystack.len() {
            continue;
        }
        for (start, window) in haystack.windows(pattern.len()).enumerate() {
            let is_eq = if ascii_case_insensitive {
                window.eq_ignore_ascii_case(pattern)
            } else {
                window == pattern
            };
            if is_eq {
                found.push((start + pattern.len() - 1, id, start));
            }
        }
    }
    found.sort_unstable();
    found
}

/// Matches of an [`acmatch::AhoCorasick`] in the same format as
/// [`naive_find_all`].
pub fn find_all<P: AsRef<[u8]>>(
    ac: &acmatch::AhoCorasick<P>,
    haystack: &[u8],
) -> Vec<(usize, usize, usize)> {
    ac.find_all(haystack)
        .iter()
        .map(|m| (m.end, m.pattern.0, m.start))
        .collect()
}
