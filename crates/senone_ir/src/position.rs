//! Word position of a phone instance.

use std::fmt;

/// Position of a phone within its word.
///
/// `Undefined` is used by CI units, which carry no context.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum WordPosition {
    Begin,
    End,
    Internal,
    Single,
    #[default]
    Undefined,
}

impl WordPosition {
    /// Positions a word-boundary question can name.
    pub const DEFINED: [WordPosition; 4] = [
        WordPosition::Begin,
        WordPosition::End,
        WordPosition::Internal,
        WordPosition::Single,
    ];

    /// Parse the single-letter code used by model definitions (`b e i s -`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "b" | "B" => Some(WordPosition::Begin),
            "e" | "E" => Some(WordPosition::End),
            "i" | "I" => Some(WordPosition::Internal),
            "s" | "S" => Some(WordPosition::Single),
            "-" => Some(WordPosition::Undefined),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            WordPosition::Begin => 'b',
            WordPosition::End => 'e',
            WordPosition::Internal => 'i',
            WordPosition::Single => 's',
            WordPosition::Undefined => '-',
        }
    }

    /// Dense index for lookup tables; `Undefined` maps to 4.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            WordPosition::Begin => 0,
            WordPosition::End => 1,
            WordPosition::Internal => 2,
            WordPosition::Single => 3,
            WordPosition::Undefined => 4,
        }
    }
}

impl fmt::Display for WordPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
