//! Byte alphabet helpers.
//!
//! The automaton works on raw byte values: every transition table spans the
//! full range `0..=255`. This module provides the ASCII case flip used for
//! case-insensitive construction, and [`Alphabet`], a compacted mapping of the
//! bytes that actually occur in a pattern set to dense code points.

use std::fmt::{self, Debug};

/// Number of distinct byte values, and the size of every transition table.
pub const ALPHABET_LEN: usize = 256;

/// The ASCII letter of opposite case, or `byte` itself if it is not an ASCII
/// letter.
///
/// Non-ASCII bytes are never folded.
pub fn opposite_ascii_case(byte: u8) -> u8 {
    if byte.is_ascii_uppercase() {
        byte.to_ascii_lowercase()
    } else if byte.is_ascii_lowercase() {
        byte.to_ascii_uppercase()
    } else {
        byte
    }
}

/// A code point in a compacted [`Alphabet`].
///
/// Code point `0` is reserved for bytes that were never added.
pub type CodePoint = u16;

/// A compacted mapping from bytes to dense code points.
///
/// Bytes are assigned code points `1..=len()` in the order they are first
/// added. With ASCII case folding, both cases of a letter share a code point
/// and [`Alphabet::byte`] returns the lower-case representative.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    /// Code point of each byte, `0` if unseen.
    code_points: [CodePoint; ALPHABET_LEN],
    /// Representative byte of code point `i + 1`.
    bytes: Vec<u8>,
    ascii_case_insensitive: bool,
}

impl Alphabet {
    /// An empty alphabet.
    pub fn new(ascii_case_insensitive: bool) -> Self {
        Self {
            code_points: [0; ALPHABET_LEN],
            bytes: Vec::new(),
            ascii_case_insensitive,
        }
    }

    /// Add a byte to the alphabet and return its code point.
    ///
    /// Adding a byte twice returns the code point assigned the first time.
    pub fn add_byte(&mut self, byte: u8) -> CodePoint {
        let byte = self.normalise(byte);
        let existing = self.code_points[byte as usize];
        if existing != 0 {
            return existing;
        }
        self.bytes.push(byte);
        // At most 256 distinct bytes, so this fits in a u16
        let code_point = self.bytes.len() as CodePoint;
        self.code_points[byte as usize] = code_point;
        if self.ascii_case_insensitive {
            self.code_points[opposite_ascii_case(byte) as usize] = code_point;
        }
        code_point
    }

    /// The code point of `byte`, or `0` if it was never added.
    pub fn code_point(&self, byte: u8) -> CodePoint {
        self.code_points[byte as usize]
    }

    /// The byte represented by `code_point`, if any.
    pub fn byte(&self, code_point: CodePoint) -> Option<u8> {
        let index = usize::from(code_point).checked_sub(1)?;
        self.bytes.get(index).copied()
    }

    /// Whether `byte` was added (in either case, when folding).
    pub fn contains(&self, byte: u8) -> bool {
        self.code_point(byte) != 0
    }

    /// Number of code points assigned.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether no byte was added.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether both cases of an ASCII letter share a code point.
    pub fn is_ascii_case_insensitive(&self) -> bool {
        self.ascii_case_insensitive
    }

    fn normalise(&self, byte: u8) -> u8 {
        if self.ascii_case_insensitive {
            byte.to_ascii_lowercase()
        } else {
            byte
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.bytes.iter().map(|&b| std::ascii::escape_default(b).to_string()))
            .finish()
    }
}
