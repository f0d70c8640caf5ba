//! `Word`: an immutable dictionary token plus its reverse-partner handle.
//!
//! Words live in the arena owned by [`WordIndex`](crate::word_index::WordIndex) and refer to
//! each other through [`WordId`] handles, so the mutual partner relation never forms an
//! ownership cycle.

use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::normalize::{normalize, reverse};

/// Handle of a [`Word`] inside its owning index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(pub(crate) usize);

impl WordId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A dictionary word.
///
/// Equality compares the normalized forms. Two words with different spellings that fold to
/// the same letters (`papa` / `pápa`) are equal, but keep distinct [`WordId`]s.
#[derive(Debug, Clone)]
pub struct Word {
    id: WordId,
    original: String,
    normalized: String,
    reversed: String,
    len: usize,
    symmetrical: bool,
    partner: Option<WordId>,
}

impl Word {
    /// Build a word. A palindromic word is its own reverse partner from the start.
    pub(crate) fn new(id: WordId, original: &str) -> Self {
        let normalized = normalize(original);
        let reversed = reverse(&normalized);
        let symmetrical = normalized == reversed;
        let len = normalized.chars().count();

        Word {
            id,
            original: original.to_string(),
            normalized,
            reversed,
            len,
            symmetrical,
            partner: symmetrical.then_some(id),
        }
    }

    #[must_use]
    pub fn id(&self) -> WordId {
        self.id
    }

    /// The word as supplied (case and accents preserved).
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Character-wise reversal of the normalized form.
    #[must_use]
    pub fn reversed(&self) -> &str {
        &self.reversed
    }

    /// Length in characters of the normalized form.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True iff the normalized form is a palindrome.
    #[must_use]
    pub fn is_symmetrical(&self) -> bool {
        self.symmetrical
    }

    #[must_use]
    pub fn partner(&self) -> Option<WordId> {
        self.partner
    }

    #[must_use]
    pub fn has_partner(&self) -> bool {
        self.partner.is_some()
    }

    pub(crate) fn set_partner(&mut self, other: WordId) {
        self.partner = Some(other);
    }

    /// Normalized letter at `position`, if the word is long enough.
    #[must_use]
    pub fn letter_at(&self, position: usize) -> Option<char> {
        self.normalized.chars().nth(position)
    }

    /// Whether `pattern` occurs in the normalized form starting at char `position`.
    ///
    /// A pattern running past the end of the word does not match.
    #[must_use]
    pub fn matches_at(&self, pattern: &str, position: usize) -> bool {
        let mut letters = self.normalized.chars().skip(position);
        pattern.chars().all(|c| letters.next() == Some(c))
    }

    /// Display ordering: by original spelling, not by normalized form.
    #[must_use]
    pub fn cmp_original(&self, other: &Word) -> Ordering {
        self.original.cmp(&other.original)
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for Word {}

/// Raw strings are normalized before comparing.
impl PartialEq<str> for Word {
    fn eq(&self, other: &str) -> bool {
        self.normalized == normalize(other)
    }
}

impl PartialEq<&str> for Word {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
