//! `WordIndex`: the dictionary the generator searches.
//!
//! Built once per target length, read-only afterwards. It owns every [`Word`] in an arena
//! and keeps two lookups:
//!
//! - **by normalized form**: one entry per distinct normalized key. When two raw words fold to
//!   the same key, the later one (in sorted order) replaces the earlier one, but the entry keeps
//!   its original insertion position.
//! - **by (letter, position)**: the set of entries having `letter` at zero-based char `position`.
//!   Entries are stored as handles into the first lookup, so a positional hit always resolves to
//!   the word currently registered for that key.
//!
//! Reverse partners are discovered while inserting: a new word whose reversed form is already
//! present gets that word as its partner (and the older word gets the new one, if it had none).

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::normalize::normalize;
use crate::word::{Word, WordId};

/// Position of an entry in insertion order.
type Slot = usize;

#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    /// Length the input was filtered to, if any.
    length: Option<usize>,
    /// Arena of every constructed word, including ones later shadowed by a collision.
    words: Vec<Word>,
    /// Current word for each distinct normalized form, in first-insertion order.
    entries: Vec<WordId>,
    by_normalized: HashMap<String, Slot>,
    by_letter_position: HashMap<(char, usize), BTreeSet<Slot>>,
}

impl WordIndex {
    /// Build an index from raw words.
    ///
    /// # Behavior
    /// 1. Keeps only words of `fixed_length` chars when a length is given.
    /// 2. Sorts the survivors so insertion order is deterministic.
    /// 3. Inserts each word, registering its letters by position and linking it with its
    ///    reverse partner when the reversed form has already been inserted.
    pub fn build<S: AsRef<str>>(words: &[S], fixed_length: Option<usize>) -> WordIndex {
        let mut raw: Vec<&str> = words
            .iter()
            .map(AsRef::as_ref)
            .filter(|w| fixed_length.map_or(true, |n| w.chars().count() == n))
            .collect();
        raw.sort_unstable();

        let mut index = WordIndex {
            length: fixed_length,
            words: Vec::with_capacity(raw.len()),
            entries: Vec::with_capacity(raw.len()),
            ..WordIndex::default()
        };

        for word_str in raw {
            index.insert(word_str);
        }

        debug!(
            "indexed {} words ({} distinct, {} partnered) for length {:?}",
            index.words.len(),
            index.entries.len(),
            index.iter().filter(|w| w.has_partner()).count(),
            index.length
        );

        index
    }

    fn insert(&mut self, word_str: &str) {
        let id = WordId(self.words.len());
        let word = Word::new(id, word_str);
        let key = word.normalized().to_string();
        let reversed = word.reversed().to_string();
        self.words.push(word);

        let slot = match self.by_normalized.entry(key) {
            Entry::Occupied(e) => {
                // last write wins, first position is kept
                let slot = *e.get();
                debug!("'{word_str}' replaces '{}' in the index", self.words[self.entries[slot].0]);
                self.entries[slot] = id;
                slot
            }
            Entry::Vacant(e) => {
                let slot = self.entries.len();
                self.entries.push(id);
                e.insert(slot);
                slot
            }
        };

        for (pos, letter) in self.words[id.0].normalized().chars().enumerate() {
            self.by_letter_position
                .entry((letter, pos))
                .or_default()
                .insert(slot);
        }

        if let Some(&other_slot) = self.by_normalized.get(&reversed) {
            let other = self.entries[other_slot];
            self.establish_partnership(id, other);
        }
    }

    /// Make `b` the partner of `a`, and `a` the partner of `b` unless `b` already has one.
    fn establish_partnership(&mut self, a: WordId, b: WordId) {
        self.words[a.0].set_partner(b);
        if !self.words[b.0].has_partner() {
            self.words[b.0].set_partner(a);
        }
    }

    /// The length the index was built for, if any.
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        self.length
    }

    /// Number of distinct normalized forms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a handle.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this index.
    #[must_use]
    pub fn word(&self, id: WordId) -> &Word {
        &self.words[id.0]
    }

    /// The reverse partner of `word`, if one was found.
    #[must_use]
    pub fn partner_of(&self, word: &Word) -> Option<&Word> {
        word.partner().map(|id| self.word(id))
    }

    /// Look up a word by its spelling; the input is normalized first.
    #[must_use]
    pub fn get(&self, raw: &str) -> Option<&Word> {
        self.by_normalized
            .get(&normalize(raw))
            .map(|&slot| self.word(self.entries[slot]))
    }

    /// Every current entry, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Word> + '_ {
        self.entries.iter().map(|&id| self.word(id))
    }

    /// Words of `length` chars that have a reverse partner, in insertion order.
    ///
    /// Words without a partner can never complete a square, so they are skipped here.
    pub fn words_of_length(&self, length: usize) -> impl Iterator<Item = &Word> + '_ {
        self.iter()
            .filter(move |w| w.len() == length && w.has_partner())
    }

    /// Words containing `pattern` starting at char `position`, optionally of total `length`.
    ///
    /// The positional index only guarantees the first letter, so every candidate is checked
    /// against the whole pattern. An empty pattern matches nothing.
    pub fn words_matching_at<'a>(
        &'a self,
        pattern: &'a str,
        position: usize,
        length: Option<usize>,
    ) -> impl Iterator<Item = &'a Word> + 'a {
        pattern
            .chars()
            .next()
            .and_then(|first| self.by_letter_position.get(&(first, position)))
            .into_iter()
            .flatten()
            .map(move |&slot| self.word(self.entries[slot]))
            .filter(move |w| length.map_or(true, |n| w.len() == n))
            .filter(move |w| w.matches_at(pattern, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SATOR: [&str; 5] = ["sator", "arepo", "tenet", "opera", "rotas"];

    fn originals<'a>(words: impl Iterator<Item = &'a Word>) -> Vec<&'a str> {
        words.map(Word::original).collect()
    }

    #[test]
    fn test_build_sorts_and_filters_by_length() {
        let index = WordIndex::build(&["rotas", "abc", "sator", "tenet", "ab"], Some(5));
        assert_eq!(index.len(), 3);
        assert_eq!(originals(index.iter()), vec!["rotas", "sator", "tenet"]);
        assert_eq!(index.length(), Some(5));
    }

    #[test]
    fn test_build_without_length_keeps_everything() {
        let index = WordIndex::build(&["ab", "abc", "ba"], None);
        assert_eq!(index.len(), 3);
        assert_eq!(index.length(), None);
    }

    #[test]
    fn test_length_filter_counts_chars_not_bytes() {
        let index = WordIndex::build(&["pápa", "papas"], Some(4));
        assert_eq!(originals(index.iter()), vec!["pápa"]);
    }

    #[test]
    fn test_reverse_partners_are_mutual() {
        let index = WordIndex::build(&SATOR, Some(5));
        for raw in SATOR {
            let w = index.get(raw).unwrap();
            let p = index.partner_of(w).expect("every SATOR word has a partner");
            assert_eq!(p.normalized(), w.reversed());
            assert_eq!(p.partner(), Some(w.id()));
        }
    }

    #[test]
    fn test_tenet_is_self_symmetrical() {
        let index = WordIndex::build(&SATOR, Some(5));
        let tenet = index.get("tenet").unwrap();
        assert!(tenet.is_symmetrical());
        assert_eq!(tenet.partner(), Some(tenet.id()));
    }

    #[test]
    fn test_accented_partner_is_found() {
        let index = WordIndex::build(&["rómA", "Amor"], Some(4));
        let roma = index.get("romA").unwrap();
        let amor = index.partner_of(roma).unwrap();
        assert_eq!(amor.original(), "Amor");
        assert_eq!(index.partner_of(amor).unwrap().original(), "rómA");
    }

    #[test]
    fn test_words_of_length_skips_unpartnered() {
        let index = WordIndex::build(&["sator", "rotas", "lemon", "level"], None);
        assert_eq!(
            originals(index.words_of_length(5)),
            vec!["level", "rotas", "sator"]
        );
        assert_eq!(index.words_of_length(4).count(), 0);
    }

    #[test]
    fn test_words_of_length_is_restartable() {
        let index = WordIndex::build(&SATOR, Some(5));
        let first: Vec<_> = originals(index.words_of_length(5));
        let second: Vec<_> = originals(index.words_of_length(5));
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_words_matching_at_checks_whole_pattern() {
        let index = WordIndex::build(&SATOR, Some(5));
        // 'a' at position 1 is shared by "sator" only, 'ato' too
        assert_eq!(originals(index.words_matching_at("ato", 1, Some(5))), vec!["sator"]);
        // 'o' at position 1 is "rotas"; "ota" confirms, "otx" does not
        assert_eq!(originals(index.words_matching_at("ota", 1, Some(5))), vec!["rotas"]);
        assert_eq!(index.words_matching_at("otx", 1, Some(5)).count(), 0);
    }

    #[test]
    fn test_words_matching_at_in_insertion_order() {
        let index = WordIndex::build(&SATOR, Some(5));
        assert_eq!(
            originals(index.words_matching_at("e", 2, Some(5))),
            vec!["arepo", "opera"]
        );
    }

    #[test]
    fn test_words_matching_at_length_filter() {
        let index = WordIndex::build(&["ante", "antes", "anti"], None);
        assert_eq!(
            originals(index.words_matching_at("nt", 1, Some(4))),
            vec!["ante", "anti"]
        );
        assert_eq!(
            originals(index.words_matching_at("nt", 1, None)),
            vec!["ante", "antes", "anti"]
        );
    }

    #[test]
    fn test_words_matching_at_empty_pattern_matches_nothing() {
        let index = WordIndex::build(&SATOR, Some(5));
        assert_eq!(index.words_matching_at("", 0, None).count(), 0);
    }

    #[test]
    fn test_words_matching_at_normalized_letters() {
        let index = WordIndex::build(&["árbol"], None);
        assert_eq!(originals(index.words_matching_at("ar", 0, None)), vec!["árbol"]);
        assert_eq!(index.words_matching_at("ár", 0, None).count(), 0);
    }

    #[test]
    fn test_collision_is_last_write_wins() {
        // "papa" < "pápa" in code-point order, so "pápa" is inserted last
        let index = WordIndex::build(&["pápa", "papa"], Some(4));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("papa").unwrap().original(), "pápa");

        // the positional index resolves to the surviving word, once
        let hits = originals(index.words_matching_at("pa", 0, Some(4)));
        assert_eq!(hits, vec!["pápa"]);
    }

    #[test]
    fn test_collision_keeps_first_position() {
        let index = WordIndex::build(&["papa", "mama", "pápa"], Some(4));
        // sorted: mama, papa, pápa -> "papa" slot is second and now holds "pápa"
        assert_eq!(originals(index.iter()), vec!["mama", "pápa"]);
    }

    #[test]
    fn test_collision_partner_may_be_shadowed_word() {
        // "roma" is linked to "amor" first; "rómá" then takes over the "roma" key and links
        // itself to "amor", which keeps its original (now shadowed) partner.
        let index = WordIndex::build(&["rómá", "amor", "roma"], Some(4));
        let amor = index.get("amor").unwrap();
        assert_eq!(index.partner_of(amor).unwrap().original(), "roma");

        let current = index.get("roma").unwrap();
        assert_eq!(current.original(), "rómá");
        assert_eq!(current.partner(), Some(amor.id()));
    }

    #[test]
    fn test_empty_input() {
        let words: Vec<&str> = vec![];
        let index = WordIndex::build(&words, Some(3));
        assert!(index.is_empty());
        assert_eq!(index.words_of_length(3).count(), 0);
    }
}
